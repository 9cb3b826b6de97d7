//! Read-only course catalog backed by `content/courses.json`.
//!
//! Courses are written by the setup binary and served as-is; inactive
//! entries stay on disk but are never listed or resolved.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use std::path::{Path, PathBuf};

use crate::enrichment::Program;
use crate::records::storage::{read_record, write_record, RecordWriteOutcome};
use crate::records::StoreError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CourseModule {
    pub title: String,
    #[serde(default)]
    pub topics: Vec<String>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Course {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub short_description: String,
    pub description: String,
    pub duration: String,
    #[serde(default)]
    pub modules: Vec<CourseModule>,
    #[serde(default)]
    pub highlights: Vec<String>,
    pub certification: String,
    pub price: Option<String>,
    pub featured_image: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone)]
pub struct CourseCatalog {
    path: PathBuf,
}

impl CourseCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Active courses in catalog order. A missing catalog file reads as empty.
    pub fn list(&self) -> Result<Vec<Course>, StoreError> {
        let courses: Vec<Course> = read_record(&self.path)?.unwrap_or_default();
        Ok(courses.into_iter().filter(|course| course.active).collect())
    }

    pub fn get_by_slug(&self, slug: &str) -> Result<Option<Course>, StoreError> {
        Ok(self.list()?.into_iter().find(|course| course.slug == slug))
    }

    pub fn replace_all(&self, courses: &[Course]) -> Result<RecordWriteOutcome, StoreError> {
        write_record(&self.path, &courses)
    }
}

fn module(title: &str, topics: &[&str]) -> CourseModule {
    CourseModule {
        title: title.to_string(),
        topics: topics.iter().map(|t| t.to_string()).collect(),
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// One course per recommendable program, written by the setup binary.
pub fn sample_courses() -> Vec<Course> {
    let now = Utc::now();
    Program::ALL
        .iter()
        .map(|program| {
            let (short_description, description, modules, highlights, certification) =
                program_outline(*program);
            Course {
                id: uuid::Uuid::new_v4().to_string(),
                title: program.title().to_string(),
                slug: program.slug().to_string(),
                short_description: short_description.to_string(),
                description: description.to_string(),
                duration: program.duration().to_string(),
                modules,
                highlights: strings(highlights),
                certification: certification.to_string(),
                price: Some("Contact for pricing".to_string()),
                featured_image: None,
                active: true,
                created_at: now,
            }
        })
        .collect()
}

type Outline = (
    &'static str,
    &'static str,
    Vec<CourseModule>,
    &'static [&'static str],
    &'static str,
);

fn program_outline(program: Program) -> Outline {
    match program {
        Program::ProfessionalDigitalMarketing => (
            "Complete digital marketing training with AI tools, live projects and an internship at an Infopark IT company.",
            "Our flagship program covers SEO, paid search, social media, content, email and analytics, with hands-on client work and a guaranteed internship in Infopark, Kochi.",
            vec![
                module("Digital Marketing Fundamentals", &["Marketing Basics", "Digital Channels", "Customer Journey"]),
                module("Search Engine Optimization", &["On-Page SEO", "Technical SEO", "Link Building", "Local SEO"]),
                module("Search Engine Marketing", &["Google Ads", "Campaign Setup", "Bidding Strategies"]),
                module("Social Media Marketing", &["Facebook", "Instagram", "LinkedIn", "Content Strategy"]),
                module("Content & Email Marketing", &["Copywriting", "Email Campaigns", "Automation"]),
                module("Analytics & Reporting", &["Google Analytics", "Looker Studio", "ROI Tracking"]),
                module("Internship at Infopark", &["Live Projects", "Client Work", "Portfolio Building"]),
            ],
            &[
                "SEO, SEM, SMM and Email Marketing",
                "AI Tools: ChatGPT, Midjourney, Canva AI",
                "Live Client Projects",
                "Guaranteed Internship at Infopark",
                "100% Placement Assistance",
            ],
            "Google Ads + Google Analytics + Meta Blueprint + Skillax Pro Certificate",
        ),
        Program::AdvancedSeoPerformance => (
            "Deep search and performance marketing for marketers who already know the basics.",
            "An advanced track on technical SEO, paid search and conversion measurement, built around audits and campaigns on real accounts.",
            vec![
                module("Technical SEO", &["Site Architecture", "Core Web Vitals", "Structured Data"]),
                module("Content & Authority", &["Topic Clusters", "Digital PR", "Link Acquisition"]),
                module("Performance Campaigns", &["Google Ads", "Shopping Campaigns", "Smart Bidding"]),
                module("Measurement", &["GA4", "Conversion Tracking", "Attribution"]),
            ],
            &[
                "Full Technical SEO Audits",
                "Google Ads Performance Campaigns",
                "GA4 Measurement Plans",
                "Weekend Batches Available",
            ],
            "Google Ads Search + Google Analytics + Skillax SEO Specialist Certificate",
        ),
        Program::SocialMediaAdsMastery => (
            "Social media strategy and paid social advertising across Meta, LinkedIn and YouTube.",
            "A hands-on program on organic social growth and paid social campaigns, from creative briefs to audience targeting and reporting.",
            vec![
                module("Social Strategy", &["Platform Selection", "Content Calendars", "Community Management"]),
                module("Meta Ads", &["Campaign Structure", "Audiences", "Creative Testing"]),
                module("LinkedIn & YouTube Ads", &["B2B Targeting", "Video Campaigns"]),
                module("Reporting", &["Ads Manager", "Dashboards", "Budget Optimization"]),
            ],
            &[
                "Meta Ads Campaign Management",
                "Creative Testing Frameworks",
                "Influencer Collaborations",
                "Weekend Batches Available",
            ],
            "Meta Blueprint + Skillax Social Media Certificate",
        ),
        Program::AiPoweredMarketing => (
            "Cutting-edge AI marketing tools and automation for working professionals.",
            "An intensive program on AI-powered marketing: content generation, image and video tools, prompt engineering and marketing automation. Weekend batches available.",
            vec![
                module("AI Fundamentals for Marketers", &["Understanding AI", "AI in Marketing", "Responsible Use"]),
                module("ChatGPT & Content Creation", &["Prompt Engineering", "Content Writing", "Ad Copy"]),
                module("AI Image & Video Generation", &["Midjourney", "DALL-E", "Canva AI"]),
                module("Marketing Automation", &["HubSpot", "Mailchimp", "Social Schedulers"]),
                module("AI-Powered Analytics", &["Predictive Analytics", "AI Reporting"]),
            ],
            &[
                "ChatGPT for Marketing",
                "AI Content Generation",
                "Prompt Engineering Mastery",
                "Weekend Batches Available",
            ],
            "Skillax AI Expert + HubSpot Automation Certificate",
        ),
    }
}
