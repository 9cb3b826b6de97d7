//! Intake validation for leads, contact requests, career profiles and chat.
//!
//! Validation is a pure function of the submitted payload. It either yields
//! normalized input ready for the record store or a `ValidationFailed`
//! listing every offending field in schema order.

pub mod submission;
pub mod wizard;

pub use submission::{
    RawChatMessage, RawContactSubmission, RawLeadSubmission, RawProfileSubmission,
};

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::records::{
    Availability, CareerStage, Choice, EducationLevel, LeadInput, LeadStatus, LearningStyle,
    ProfileInput,
};

pub const DEFAULT_LEAD_SOURCE: &str = "website";
pub const CONTACT_FORM_SOURCE: &str = "contact_form";
pub const MAX_CHAT_MESSAGE_LEN: usize = 2_000;

const MAX_TEXT_LEN: usize = 4_000;
const MAX_SESSION_ID_LEN: usize = 128;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ViolationReason {
    Missing,
    InvalidFormat,
    InvalidChoice,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: &'static str,
    pub reason: ViolationReason,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("validation failed for: {}", self.fields().join(", "))]
pub struct ValidationFailed {
    pub violations: Vec<FieldViolation>,
}

impl ValidationFailed {
    pub fn fields(&self) -> Vec<&'static str> {
        self.violations.iter().map(|v| v.field).collect()
    }
}

/// Chat input after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    pub message: String,
    pub session_id: Option<String>,
}

pub fn validate_lead(
    raw: &RawLeadSubmission,
    synthetic_email_domain: &str,
) -> Result<LeadInput, ValidationFailed> {
    let mut check = Checker::default();
    let name = check.required("name", &raw.name);
    // Omitted email is allowed; a malformed one is not.
    let email = check
        .text("email", &raw.email)
        .and_then(|email| check.email_shape("email", email));
    let phone = check.required_phone("phone", &raw.phone);
    let interest = check.required("interest", &raw.interest);
    let source = check
        .text("source", &raw.source)
        .unwrap_or_else(|| DEFAULT_LEAD_SOURCE.to_string());
    let message = check.optional("message", &raw.message);

    match (name, phone, interest) {
        (Some(name), Some(phone), Some(interest)) if check.is_clean() => {
            let (email, email_synthesized) = match email {
                Some(email) => (email, false),
                None => (synthesize_lead_email(&phone, synthetic_email_domain), true),
            };
            Ok(LeadInput {
                name,
                email,
                email_synthesized,
                phone,
                interest,
                source,
                message,
            })
        }
        _ => Err(check.into_failure()),
    }
}

/// Contact requests are stored as leads tagged with the contact-form source.
pub fn validate_contact(raw: &RawContactSubmission) -> Result<LeadInput, ValidationFailed> {
    let mut check = Checker::default();
    let name = check.required("name", &raw.name);
    let email = check.required_email("email", &raw.email);
    let phone = check.required_phone("phone", &raw.phone);
    let subject = check.required("subject", &raw.subject);
    let message = check.optional("message", &raw.message);

    match (name, email, phone, subject) {
        (Some(name), Some(email), Some(phone), Some(subject)) if check.is_clean() => {
            Ok(LeadInput {
                name,
                email,
                email_synthesized: false,
                phone,
                interest: subject,
                source: CONTACT_FORM_SOURCE.to_string(),
                message,
            })
        }
        _ => Err(check.into_failure()),
    }
}

pub fn validate_profile(raw: &RawProfileSubmission) -> Result<ProfileInput, ValidationFailed> {
    let mut check = Checker::default();
    let full_name = check.required("full_name", &raw.full_name);
    let email = check.required_email("email", &raw.email);
    let phone = check.required_phone("phone", &raw.phone);
    let location = check.required("location", &raw.location);
    let linkedin_url = check.optional_url("linkedin_url", &raw.linkedin_url);
    let portfolio_url = check.optional_url("portfolio_url", &raw.portfolio_url);
    let education_level = check.choice::<EducationLevel>("education_level", &raw.education_level);
    let field_of_study = check.optional("field_of_study", &raw.field_of_study);
    let institution = check.optional("institution", &raw.institution);
    let graduation_year = check.optional("graduation_year", &raw.graduation_year);
    let career_stage = check.choice::<CareerStage>("career_stage", &raw.career_stage);
    let current_role = check.optional("current_role", &raw.current_role);
    let target_role = check.required("target_role", &raw.target_role);
    let career_goals = check.required("career_goals", &raw.career_goals);
    let current_skills = check.string_set("current_skills", &raw.current_skills, false);
    let interests = check.string_set("interests", &raw.interests, true);
    let preferred_learning_style =
        check.choice::<LearningStyle>("preferred_learning_style", &raw.preferred_learning_style);
    let why_digital_marketing =
        check.required("why_digital_marketing", &raw.why_digital_marketing);
    let availability = check.choice::<Availability>("availability", &raw.availability);

    match (
        full_name,
        email,
        phone,
        location,
        education_level,
        career_stage,
        target_role,
        career_goals,
        preferred_learning_style,
        why_digital_marketing,
        availability,
    ) {
        (
            Some(full_name),
            Some(email),
            Some(phone),
            Some(location),
            Some(education_level),
            Some(career_stage),
            Some(target_role),
            Some(career_goals),
            Some(preferred_learning_style),
            Some(why_digital_marketing),
            Some(availability),
        ) if check.is_clean() => Ok(ProfileInput {
            full_name,
            email,
            phone,
            location,
            linkedin_url,
            portfolio_url,
            education_level,
            field_of_study,
            institution,
            graduation_year,
            career_stage,
            current_role,
            target_role,
            career_goals,
            current_skills,
            interests,
            preferred_learning_style,
            why_digital_marketing,
            availability,
        }),
        _ => Err(check.into_failure()),
    }
}

pub fn validate_chat(raw: &RawChatMessage) -> Result<ChatRequest, ValidationFailed> {
    let mut check = Checker::default();
    let message = check.required("message", &raw.message);
    if message
        .as_ref()
        .is_some_and(|m| m.chars().count() > MAX_CHAT_MESSAGE_LEN)
    {
        check.flag("message", ViolationReason::InvalidFormat);
    }
    let session_id = check.text("session_id", &raw.session_id);
    if session_id
        .as_ref()
        .is_some_and(|id| id.len() > MAX_SESSION_ID_LEN)
    {
        check.flag("session_id", ViolationReason::InvalidFormat);
    }
    match message {
        Some(message) if check.is_clean() => Ok(ChatRequest {
            message,
            session_id,
        }),
        _ => Err(check.into_failure()),
    }
}

/// Admin status change; only the declared lead states are accepted.
pub fn validate_lead_status(raw: &Option<Value>) -> Result<LeadStatus, ValidationFailed> {
    let mut check = Checker::default();
    match check.choice::<LeadStatus>("status", raw) {
        Some(status) if check.is_clean() => Ok(status),
        _ => Err(check.into_failure()),
    }
}

/// One `@`, something on both sides, no whitespace. Deliberately loose.
pub fn is_loose_email(candidate: &str) -> bool {
    let mut parts = candidate.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty()
                && !domain.is_empty()
                && !candidate.chars().any(char::is_whitespace)
        }
        _ => false,
    }
}

pub fn has_digit(candidate: &str) -> bool {
    candidate.chars().any(|c| c.is_ascii_digit())
}

/// Placeholder address for leads that only left a phone number.
///
/// Derived from the phone's digits alone, so formatting differences such as
/// `+91 98765-43210` and `919876543210` map to the same address.
pub fn synthesize_lead_email(phone: &str, domain: &str) -> String {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    format!("{digits}@{}", domain.trim_start_matches('@'))
}

pub fn is_http_url(candidate: &str) -> bool {
    let lower = candidate.to_ascii_lowercase();
    let rest = lower
        .strip_prefix("https://")
        .or_else(|| lower.strip_prefix("http://"));
    match rest {
        Some(rest) => {
            let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
            !host.is_empty() && !candidate.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

/// Accumulates violations in the order fields are checked.
#[derive(Debug, Default)]
struct Checker {
    violations: Vec<FieldViolation>,
}

impl Checker {
    fn flag(&mut self, field: &'static str, reason: ViolationReason) {
        if !self.violations.iter().any(|v| v.field == field) {
            self.violations.push(FieldViolation { field, reason });
        }
    }

    fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    fn into_failure(self) -> ValidationFailed {
        ValidationFailed {
            violations: self.violations,
        }
    }

    fn bounded(&mut self, field: &'static str, value: String) -> Option<String> {
        if value.chars().count() > MAX_TEXT_LEN {
            self.flag(field, ViolationReason::InvalidFormat);
            return None;
        }
        Some(value)
    }

    /// Trimmed, non-blank text. Any JSON type other than a string or null is
    /// flagged as `invalid_format`.
    fn text(&mut self, field: &'static str, value: &Option<Value>) -> Option<String> {
        match value {
            None | Some(Value::Null) => None,
            Some(Value::String(text)) => {
                let text = text.trim();
                (!text.is_empty()).then(|| text.to_string())
            }
            Some(_) => {
                self.flag(field, ViolationReason::InvalidFormat);
                None
            }
        }
    }

    fn required(&mut self, field: &'static str, value: &Option<Value>) -> Option<String> {
        match self.text(field, value) {
            Some(value) => self.bounded(field, value),
            None => {
                self.flag(field, ViolationReason::Missing);
                None
            }
        }
    }

    fn optional(&mut self, field: &'static str, value: &Option<Value>) -> Option<String> {
        self.text(field, value)
            .and_then(|value| self.bounded(field, value))
    }

    fn email_shape(&mut self, field: &'static str, email: String) -> Option<String> {
        if is_loose_email(&email) {
            Some(email)
        } else {
            self.flag(field, ViolationReason::InvalidFormat);
            None
        }
    }

    fn required_email(&mut self, field: &'static str, value: &Option<Value>) -> Option<String> {
        let email = self.required(field, value)?;
        self.email_shape(field, email)
    }

    fn required_phone(&mut self, field: &'static str, value: &Option<Value>) -> Option<String> {
        let phone = self.required(field, value)?;
        if has_digit(&phone) {
            Some(phone)
        } else {
            self.flag(field, ViolationReason::InvalidFormat);
            None
        }
    }

    fn optional_url(&mut self, field: &'static str, value: &Option<Value>) -> Option<String> {
        let url = self.optional(field, value)?;
        if is_http_url(&url) {
            Some(url)
        } else {
            self.flag(field, ViolationReason::InvalidFormat);
            None
        }
    }

    fn choice<C: Choice>(&mut self, field: &'static str, value: &Option<Value>) -> Option<C> {
        let raw = self.required(field, value)?;
        match C::parse(&raw) {
            Some(choice) => Some(choice),
            None => {
                self.flag(field, ViolationReason::InvalidChoice);
                None
            }
        }
    }

    /// Trims entries, drops blanks and duplicates, keeps first-seen order.
    ///
    /// Anything but an array of strings is flagged as `invalid_format`.
    fn string_set(
        &mut self,
        field: &'static str,
        value: &Option<Value>,
        required: bool,
    ) -> Vec<String> {
        let entries = match value {
            None | Some(Value::Null) => &[] as &[Value],
            Some(Value::Array(entries)) => entries.as_slice(),
            Some(_) => {
                self.flag(field, ViolationReason::InvalidFormat);
                return Vec::new();
            }
        };
        let mut items: Vec<String> = Vec::new();
        for entry in entries {
            let Value::String(item) = entry else {
                self.flag(field, ViolationReason::InvalidFormat);
                return Vec::new();
            };
            let item = item.trim();
            if !item.is_empty() && !items.iter().any(|existing| existing == item) {
                items.push(item.to_string());
            }
        }
        if required && items.is_empty() {
            self.flag(field, ViolationReason::Missing);
        }
        items
    }
}
