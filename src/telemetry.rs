//! Page-view telemetry and admin analytics.
//!
//! Page views are appended to a JSONL log, one event per line. Analytics are
//! computed on demand from the log and the record store.

use anyhow::{Context, Result};
use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::warn;
use uuid::Uuid;

use crate::intake::{CONTACT_FORM_SOURCE, DEFAULT_LEAD_SOURCE};
use crate::records::{Choice, Lead, LeadStatus, Profile};

const CHATBOT_SOURCE: &str = "chatbot";
const TOP_TARGET_ROLES: usize = 10;
const RECENT_PROFILES: usize = 5;
const TOP_PAGES: usize = 10;
const LEAD_TREND_DAYS: u32 = 7;

pub const DEFAULT_TREND_DAYS: u32 = 7;
pub const MAX_TREND_DAYS: u32 = 90;

/// Tracking beacon body; every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PageViewInput {
    pub path: Option<String>,
    pub referrer: Option<String>,
    pub user_agent: Option<String>,
    pub session_id: Option<String>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageView {
    pub id: Uuid,
    pub path: String,
    pub referrer: Option<String>,
    pub user_agent: Option<String>,
    pub session_id: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl PageView {
    pub fn from_input(input: PageViewInput) -> Self {
        let clean = |value: Option<String>| {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        Self {
            id: Uuid::new_v4(),
            path: clean(input.path).unwrap_or_else(|| "/".to_string()),
            referrer: clean(input.referrer),
            user_agent: clean(input.user_agent),
            session_id: clean(input.session_id),
            timestamp: Utc::now(),
        }
    }
}

/// Append-only page-view log.
#[derive(Debug, Clone)]
pub struct PageViewLog {
    path: PathBuf,
    append_lock: Arc<Mutex<()>>,
}

impl PageViewLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            append_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn record(&self, view: &PageView) -> Result<()> {
        let _guard = self
            .append_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut line = serde_json::to_string(view)?;
        line.push('\n');
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open page-view log {:?}", self.path))?;
        file.write_all(line.as_bytes())?;
        Ok(())
    }

    /// Every readable event. Torn or corrupt lines are skipped.
    pub fn load(&self) -> Result<Vec<PageView>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let data = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read page-view log {:?}", self.path))?;
        let mut views = Vec::new();
        for (index, line) in data.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<PageView>(line) {
                Ok(view) => views.push(view),
                Err(err) => warn!(line = index + 1, error = %err, "skipping unreadable page view"),
            }
        }
        Ok(views)
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SourceCount {
    pub source: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct InterestCount {
    pub interest: String,
    pub count: usize,
}

/// Tallies keys, most frequent first; ties break alphabetically.
fn ranked<'a>(keys: impl Iterator<Item = &'a str>) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for key in keys {
        *counts.entry(key).or_default() += 1;
    }
    let mut ranked: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(key, count)| (key.to_string(), count))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked
}

pub fn leads_by_source(leads: &[Lead]) -> Vec<SourceCount> {
    ranked(leads.iter().map(|lead| lead.source.as_str()))
        .into_iter()
        .map(|(source, count)| SourceCount { source, count })
        .collect()
}

pub fn leads_by_interest(leads: &[Lead]) -> Vec<InterestCount> {
    ranked(leads.iter().map(|lead| lead.interest.as_str()))
        .into_iter()
        .map(|(interest, count)| InterestCount { interest, count })
        .collect()
}

/// Published catalog sizes reported next to the lead counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogTotals {
    pub courses: usize,
    pub blogs: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AnalyticsSummary {
    pub total_leads: usize,
    pub new_leads: usize,
    pub website_leads: usize,
    pub chatbot_leads: usize,
    pub leads_by_source: Vec<SourceCount>,
    pub total_profiles: usize,
    pub total_courses: usize,
    pub total_blogs: usize,
    pub total_page_views: usize,
    pub unique_visitors: usize,
}

impl AnalyticsSummary {
    pub fn compute(
        leads: &[Lead],
        profiles: &[Profile],
        views: &[PageView],
        catalogs: CatalogTotals,
    ) -> Self {
        let unique_visitors: HashSet<&str> = views
            .iter()
            .filter_map(|view| view.session_id.as_deref())
            .collect();

        Self {
            total_leads: leads.len(),
            new_leads: leads
                .iter()
                .filter(|lead| lead.status == LeadStatus::New)
                .count(),
            website_leads: leads
                .iter()
                .filter(|lead| {
                    lead.source == DEFAULT_LEAD_SOURCE || lead.source == CONTACT_FORM_SOURCE
                })
                .count(),
            chatbot_leads: leads
                .iter()
                .filter(|lead| lead.source == CHATBOT_SOURCE)
                .count(),
            leads_by_source: leads_by_source(leads),
            total_profiles: profiles.len(),
            total_courses: catalogs.courses,
            total_blogs: catalogs.blogs,
            total_page_views: views.len(),
            unique_visitors: unique_visitors.len(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct StatusCount {
    pub status: LeadStatus,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DailyLeads {
    pub date: NaiveDate,
    pub count: usize,
}

/// How far leads have moved through the admin pipeline.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LeadConversion {
    pub total_leads: usize,
    pub converted_leads: usize,
    /// Leads still `new` or `contacted`.
    pub pending_leads: usize,
    /// Percentage of all leads that converted, one decimal place.
    pub conversion_rate: f64,
    pub leads_by_status: Vec<StatusCount>,
    /// Leads created per day over the last week, oldest day first.
    pub leads_trend: Vec<DailyLeads>,
}

impl LeadConversion {
    pub fn compute(leads: &[Lead], today: NaiveDate) -> Self {
        let count = |status: LeadStatus| leads.iter().filter(|lead| lead.status == status).count();
        let converted_leads = count(LeadStatus::Converted);
        let conversion_rate = if leads.is_empty() {
            0.0
        } else {
            (converted_leads as f64 * 1000.0 / leads.len() as f64).round() / 10.0
        };
        let leads_trend = daily_counts(
            leads.iter().map(|lead| lead.created_at.date_naive()),
            LEAD_TREND_DAYS,
            today,
        )
        .into_iter()
        .map(|(date, count)| DailyLeads { date, count })
        .collect();

        Self {
            total_leads: leads.len(),
            converted_leads,
            pending_leads: count(LeadStatus::New) + count(LeadStatus::Contacted),
            conversion_rate,
            leads_by_status: LeadStatus::ALL
                .iter()
                .map(|&status| StatusCount {
                    status,
                    count: count(status),
                })
                .collect(),
            leads_trend,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PageCount {
    pub path: String,
    pub views: usize,
}

/// Most visited paths, at most ten.
pub fn top_pages(views: &[PageView]) -> Vec<PageCount> {
    ranked(views.iter().map(|view| view.path.as_str()))
        .into_iter()
        .take(TOP_PAGES)
        .map(|(path, views)| PageCount { path, views })
        .collect()
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DailyViews {
    pub date: NaiveDate,
    pub views: usize,
}

/// Requested trend window, defaulted and clamped to `1..=MAX_TREND_DAYS`.
pub fn trend_days(requested: Option<u32>) -> u32 {
    requested.unwrap_or(DEFAULT_TREND_DAYS).clamp(1, MAX_TREND_DAYS)
}

/// Page views per day for the `days` days ending `today`, oldest first.
/// Days without traffic are reported as zero.
pub fn page_view_trend(views: &[PageView], days: u32, today: NaiveDate) -> Vec<DailyViews> {
    daily_counts(
        views.iter().map(|view| view.timestamp.date_naive()),
        days,
        today,
    )
    .into_iter()
    .map(|(date, views)| DailyViews { date, views })
    .collect()
}

fn daily_counts(
    dates: impl Iterator<Item = NaiveDate>,
    days: u32,
    today: NaiveDate,
) -> Vec<(NaiveDate, usize)> {
    let mut buckets: BTreeMap<NaiveDate, usize> = (0..days)
        .filter_map(|back| today.checked_sub_days(Days::new(back.into())))
        .map(|date| (date, 0))
        .collect();
    for date in dates {
        if let Some(count) = buckets.get_mut(&date) {
            *count += 1;
        }
    }
    buckets.into_iter().collect()
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RoleCount {
    pub target_role: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RecentProfile {
    pub profile_code: String,
    pub full_name: String,
    pub target_role: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ProfileAnalytics {
    pub total_profiles: usize,
    pub by_career_stage: BTreeMap<String, usize>,
    pub by_education_level: BTreeMap<String, usize>,
    pub top_target_roles: Vec<RoleCount>,
    pub recent_profiles: Vec<RecentProfile>,
}

impl ProfileAnalytics {
    /// Expects `profiles` newest first, as the store lists them.
    pub fn compute(profiles: &[Profile]) -> Self {
        let mut by_career_stage = BTreeMap::new();
        let mut by_education_level = BTreeMap::new();
        let mut roles: HashMap<&str, usize> = HashMap::new();
        for profile in profiles {
            let input = &profile.input;
            *by_career_stage
                .entry(input.career_stage.as_str().to_string())
                .or_default() += 1;
            *by_education_level
                .entry(input.education_level.as_str().to_string())
                .or_default() += 1;
            *roles.entry(input.target_role.as_str()).or_default() += 1;
        }
        let mut top_target_roles: Vec<RoleCount> = roles
            .into_iter()
            .map(|(role, count)| RoleCount {
                target_role: role.to_string(),
                count,
            })
            .collect();
        top_target_roles.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.target_role.cmp(&b.target_role))
        });
        top_target_roles.truncate(TOP_TARGET_ROLES);

        let recent_profiles = profiles
            .iter()
            .take(RECENT_PROFILES)
            .map(|profile| RecentProfile {
                profile_code: profile.profile_code.clone(),
                full_name: profile.input.full_name.clone(),
                target_role: profile.input.target_role.clone(),
                created_at: profile.created_at,
            })
            .collect();

        Self {
            total_profiles: profiles.len(),
            by_career_stage,
            by_education_level,
            top_target_roles,
            recent_profiles,
        }
    }
}
