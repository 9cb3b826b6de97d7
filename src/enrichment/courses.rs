//! Program recommendation from career stage and interests.
//!
//! Chosen by rule, never by the model. The prompt names the program so the
//! generated roadmap lines up with it.

use serde::Serialize;

use crate::records::CareerStage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Program {
    ProfessionalDigitalMarketing,
    AdvancedSeoPerformance,
    SocialMediaAdsMastery,
    AiPoweredMarketing,
}

impl Program {
    pub const ALL: [Self; 4] = [
        Self::ProfessionalDigitalMarketing,
        Self::AdvancedSeoPerformance,
        Self::SocialMediaAdsMastery,
        Self::AiPoweredMarketing,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Self::ProfessionalDigitalMarketing => "Professional Digital Marketing",
            Self::AdvancedSeoPerformance => "Advanced SEO & Performance",
            Self::SocialMediaAdsMastery => "Social Media & Ads Mastery",
            Self::AiPoweredMarketing => "Advanced AI-Powered Marketing",
        }
    }

    pub fn duration(&self) -> &'static str {
        match self {
            Self::ProfessionalDigitalMarketing => "4 Months",
            Self::AdvancedSeoPerformance
            | Self::SocialMediaAdsMastery
            | Self::AiPoweredMarketing => "2 Months",
        }
    }

    /// Catalog slug of the program's course page.
    pub fn slug(&self) -> &'static str {
        match self {
            Self::ProfessionalDigitalMarketing => "professional-digital-marketing",
            Self::AdvancedSeoPerformance => "advanced-seo-performance",
            Self::SocialMediaAdsMastery => "social-media-ads-mastery",
            Self::AiPoweredMarketing => "ai-powered-marketing",
        }
    }

    /// Text stored in `ai_course_recommendation`.
    pub fn recommendation(&self) -> String {
        format!("{} ({})", self.title(), self.duration())
    }
}

#[derive(Debug, Clone, Copy)]
enum StageMatch {
    Any,
    EarlyCareer,
}

struct CourseRule {
    stage: StageMatch,
    /// Empty means any interests.
    keywords: &'static [&'static str],
    program: Program,
}

/// First match wins.
const RULES: &[CourseRule] = &[
    CourseRule {
        stage: StageMatch::EarlyCareer,
        keywords: &[],
        program: Program::ProfessionalDigitalMarketing,
    },
    CourseRule {
        stage: StageMatch::Any,
        keywords: &["ai", "artificial intelligence", "automation", "chatgpt", "prompt"],
        program: Program::AiPoweredMarketing,
    },
    CourseRule {
        stage: StageMatch::Any,
        keywords: &["seo", "search engine", "sem", "performance"],
        program: Program::AdvancedSeoPerformance,
    },
    CourseRule {
        stage: StageMatch::Any,
        keywords: &["social", "ads", "paid", "meta", "instagram", "facebook"],
        program: Program::SocialMediaAdsMastery,
    },
];

const DEFAULT_PROGRAM: Program = Program::ProfessionalDigitalMarketing;

pub fn recommend_course(stage: CareerStage, interests: &[String]) -> Program {
    let interests: Vec<String> = interests.iter().map(|i| i.to_lowercase()).collect();
    RULES
        .iter()
        .find(|rule| {
            let stage_ok = match rule.stage {
                StageMatch::Any => true,
                StageMatch::EarlyCareer => stage.is_early_career(),
            };
            stage_ok
                && (rule.keywords.is_empty()
                    || rule
                        .keywords
                        .iter()
                        .any(|keyword| interests.iter().any(|i| mentions(i, keyword))))
        })
        .map(|rule| rule.program)
        .unwrap_or(DEFAULT_PROGRAM)
}

/// Single words must match a whole word; phrases match as substrings.
fn mentions(text: &str, keyword: &str) -> bool {
    if keyword.contains(' ') {
        text.contains(keyword)
    } else {
        text.split(|c: char| !c.is_alphanumeric())
            .any(|word| word == keyword)
    }
}
