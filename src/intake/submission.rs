//! Raw form payloads as they arrive over HTTP.
//!
//! Every field is an optional, untyped JSON value so that an omitted or
//! wrongly typed field surfaces as a named validation violation instead of
//! an opaque decoding error.

use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawLeadSubmission {
    pub name: Option<Value>,
    pub email: Option<Value>,
    pub phone: Option<Value>,
    pub interest: Option<Value>,
    pub source: Option<Value>,
    pub message: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawContactSubmission {
    pub name: Option<Value>,
    pub email: Option<Value>,
    pub phone: Option<Value>,
    pub subject: Option<Value>,
    pub message: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawProfileSubmission {
    pub full_name: Option<Value>,
    pub email: Option<Value>,
    pub phone: Option<Value>,
    pub location: Option<Value>,
    pub linkedin_url: Option<Value>,
    pub portfolio_url: Option<Value>,
    pub education_level: Option<Value>,
    pub field_of_study: Option<Value>,
    pub institution: Option<Value>,
    pub graduation_year: Option<Value>,
    pub career_stage: Option<Value>,
    pub current_role: Option<Value>,
    pub target_role: Option<Value>,
    pub career_goals: Option<Value>,
    pub current_skills: Option<Value>,
    pub interests: Option<Value>,
    pub preferred_learning_style: Option<Value>,
    pub why_digital_marketing: Option<Value>,
    pub availability: Option<Value>,
}

impl RawProfileSubmission {
    /// Whether a named field holds something other than blanks.
    ///
    /// Unknown names read as unfilled.
    pub fn is_filled(&self, field: &str) -> bool {
        let text = |value: &Option<Value>| {
            matches!(value, Some(Value::String(v)) if !v.trim().is_empty())
        };
        let list = |value: &Option<Value>| match value {
            Some(Value::Array(items)) => items
                .iter()
                .any(|item| matches!(item, Value::String(v) if !v.trim().is_empty())),
            _ => false,
        };
        match field {
            "full_name" => text(&self.full_name),
            "email" => text(&self.email),
            "phone" => text(&self.phone),
            "location" => text(&self.location),
            "linkedin_url" => text(&self.linkedin_url),
            "portfolio_url" => text(&self.portfolio_url),
            "education_level" => text(&self.education_level),
            "field_of_study" => text(&self.field_of_study),
            "institution" => text(&self.institution),
            "graduation_year" => text(&self.graduation_year),
            "career_stage" => text(&self.career_stage),
            "current_role" => text(&self.current_role),
            "target_role" => text(&self.target_role),
            "career_goals" => text(&self.career_goals),
            "current_skills" => list(&self.current_skills),
            "interests" => list(&self.interests),
            "preferred_learning_style" => text(&self.preferred_learning_style),
            "why_digital_marketing" => text(&self.why_digital_marketing),
            "availability" => text(&self.availability),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawChatMessage {
    pub message: Option<Value>,
    pub session_id: Option<Value>,
}
