//! Data structures persisted by the record store.
//!
//! Wire names mirror the JSON the web front-end already speaks, so the same
//! types serve storage, HTTP responses and enrichment prompts.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use serde_with::skip_serializing_none;
use std::fmt;

use super::StoreError;

/// A closed set of wire values accepted for an enum-like form field.
pub trait Choice: Sized + Copy + 'static {
    const ALL: &'static [Self];

    fn as_str(&self) -> &'static str;

    /// Exact match against the declared wire values; nothing is coerced.
    fn parse(raw: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|choice| choice.as_str() == raw)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EducationLevel {
    HighSchool,
    Bachelors,
    Masters,
    WorkingProfessional,
}

impl Choice for EducationLevel {
    const ALL: &'static [Self] = &[
        Self::HighSchool,
        Self::Bachelors,
        Self::Masters,
        Self::WorkingProfessional,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Self::HighSchool => "high_school",
            Self::Bachelors => "bachelors",
            Self::Masters => "masters",
            Self::WorkingProfessional => "working_professional",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum CareerStage {
    #[serde(rename = "student")]
    Student,
    #[serde(rename = "fresher")]
    Fresher,
    #[serde(rename = "1-3_years")]
    OneToThreeYears,
    #[serde(rename = "3-5_years")]
    ThreeToFiveYears,
    #[serde(rename = "5+_years")]
    FivePlusYears,
}

impl Choice for CareerStage {
    const ALL: &'static [Self] = &[
        Self::Student,
        Self::Fresher,
        Self::OneToThreeYears,
        Self::ThreeToFiveYears,
        Self::FivePlusYears,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Fresher => "fresher",
            Self::OneToThreeYears => "1-3_years",
            Self::ThreeToFiveYears => "3-5_years",
            Self::FivePlusYears => "5+_years",
        }
    }
}

impl CareerStage {
    pub fn is_early_career(&self) -> bool {
        matches!(self, Self::Student | Self::Fresher)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Fresher => "fresher with under a year of experience",
            Self::OneToThreeYears => "early-career professional (1-3 years)",
            Self::ThreeToFiveYears => "mid-level professional (3-5 years)",
            Self::FivePlusYears => "experienced professional (5+ years)",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum LearningStyle {
    SelfPaced,
    InstructorLed,
    Hybrid,
}

impl Choice for LearningStyle {
    const ALL: &'static [Self] = &[Self::SelfPaced, Self::InstructorLed, Self::Hybrid];

    fn as_str(&self) -> &'static str {
        match self {
            Self::SelfPaced => "self_paced",
            Self::InstructorLed => "instructor_led",
            Self::Hybrid => "hybrid",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    FullTime,
    PartTime,
    Weekends,
}

impl Choice for Availability {
    const ALL: &'static [Self] = &[Self::FullTime, Self::PartTime, Self::Weekends];

    fn as_str(&self) -> &'static str {
        match self {
            Self::FullTime => "full_time",
            Self::PartTime => "part_time",
            Self::Weekends => "weekends",
        }
    }
}

/// Which family of records a file belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Lead,
    Profile,
}

impl RecordKind {
    pub fn dir_name(&self) -> &'static str {
        match self {
            Self::Lead => "leads",
            Self::Profile => "profiles",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lead => f.write_str("lead"),
            Self::Profile => f.write_str("profile"),
        }
    }
}

/// Anything the store can persist under its own identifier.
pub trait Record: Serialize + DeserializeOwned + Send + 'static {
    const KIND: RecordKind;

    fn id(&self) -> &str;

    fn created_at(&self) -> DateTime<Utc>;
}

/// Admin-side pipeline state. Intake writes `New`; later states are set by
/// an administrator.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    #[default]
    New,
    Contacted,
    Converted,
    Lost,
}

impl Choice for LeadStatus {
    const ALL: &'static [Self] = &[Self::New, Self::Contacted, Self::Converted, Self::Lost];

    fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Contacted => "contacted",
            Self::Converted => "converted",
            Self::Lost => "lost",
        }
    }
}

/// Lead fields after validation, before identity is assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadInput {
    pub name: String,
    pub email: String,
    pub email_synthesized: bool,
    pub phone: String,
    pub interest: String,
    pub source: String,
    pub message: Option<String>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Lead {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub email_synthesized: bool,
    pub phone: String,
    pub interest: String,
    pub source: String,
    pub message: Option<String>,
    #[serde(default)]
    pub status: LeadStatus,
    pub created_at: DateTime<Utc>,
}

impl Record for Lead {
    const KIND: RecordKind = RecordKind::Lead;

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// User-supplied career profile fields after validation.
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProfileInput {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub linkedin_url: Option<String>,
    pub portfolio_url: Option<String>,
    pub education_level: EducationLevel,
    pub field_of_study: Option<String>,
    pub institution: Option<String>,
    pub graduation_year: Option<String>,
    pub career_stage: CareerStage,
    pub current_role: Option<String>,
    pub target_role: String,
    pub career_goals: String,
    #[serde(default)]
    pub current_skills: Vec<String>,
    pub interests: Vec<String>,
    pub preferred_learning_style: LearningStyle,
    pub why_digital_marketing: String,
    pub availability: Availability,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoadmapPhase {
    pub phase: String,
    pub title: String,
    pub goals: Vec<String>,
}

/// AI-derived profile fields; each stays `None` until extracted from a response.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EnrichmentFields {
    pub ai_bio: Option<String>,
    pub ai_linkedin_headline: Option<String>,
    pub ai_strengths: Option<Vec<String>>,
    pub ai_skill_gaps: Option<Vec<String>>,
    pub ai_course_recommendation: Option<String>,
    pub ai_career_roadmap: Option<Vec<RoadmapPhase>>,
}

impl EnrichmentFields {
    pub const FIELD_COUNT: usize = 6;

    pub fn populated(&self) -> usize {
        [
            self.ai_bio.is_some(),
            self.ai_linkedin_headline.is_some(),
            self.ai_strengths.is_some(),
            self.ai_skill_gaps.is_some(),
            self.ai_course_recommendation.is_some(),
            self.ai_career_roadmap.is_some(),
        ]
        .iter()
        .filter(|present| **present)
        .count()
    }

    pub fn status(&self) -> EnrichmentStatus {
        match self.populated() {
            0 => EnrichmentStatus::Failed,
            Self::FIELD_COUNT => EnrichmentStatus::Completed,
            _ => EnrichmentStatus::Partial,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum EnrichmentStatus {
    /// Stored, enrichment not attempted yet.
    #[default]
    Pending,
    Completed,
    /// Some derived fields could not be extracted; the rest are absent.
    Partial,
    Failed,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EnrichmentFailureKind {
    Timeout,
    NetworkError,
    UpstreamError,
    ParseError,
    NotConfigured,
}

#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    pub id: String,
    pub profile_code: String,
    #[serde(flatten)]
    pub input: ProfileInput,
    #[serde(flatten)]
    pub enrichment: EnrichmentFields,
    #[serde(default)]
    pub enrichment_status: EnrichmentStatus,
    pub enrichment_error: Option<EnrichmentFailureKind>,
    #[serde(default)]
    pub profile_views: u64,
    #[serde(default = "default_is_public")]
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_is_public() -> bool {
    true
}

impl Record for Profile {
    const KIND: RecordKind = RecordKind::Profile;

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Partial profile update applied as a shallow merge by the store.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfilePatch {
    #[serde(flatten)]
    pub enrichment: EnrichmentFields,
    pub enrichment_status: Option<EnrichmentStatus>,
    pub enrichment_error: Option<EnrichmentFailureKind>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl ProfilePatch {
    pub fn enriched(fields: EnrichmentFields) -> Self {
        Self {
            enrichment_status: Some(fields.status()),
            enrichment: fields,
            enrichment_error: None,
            updated_at: Some(Utc::now()),
        }
    }

    pub fn failed(kind: EnrichmentFailureKind) -> Self {
        Self {
            enrichment: EnrichmentFields::default(),
            enrichment_status: Some(EnrichmentStatus::Failed),
            enrichment_error: Some(kind),
            updated_at: Some(Utc::now()),
        }
    }

    pub fn into_fields(self) -> Result<Map<String, Value>, StoreError> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            _ => Err(StoreError::Unavailable(
                "profile patch did not serialize to an object".into(),
            )),
        }
    }
}
