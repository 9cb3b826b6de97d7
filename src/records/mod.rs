//! Durable storage for leads and career profiles.
//!
//! The store owns every write. Callers hand it validated input and get back
//! the persisted record with its identity (and, for profiles, the public
//! share code) assigned.

#[cfg(test)]
pub(crate) mod fixtures;
pub mod layout;
pub mod model;
pub mod storage;
pub mod store;

pub use model::{
    Availability, CareerStage, Choice, EducationLevel, EnrichmentFailureKind, EnrichmentFields,
    EnrichmentStatus, LearningStyle, Lead, LeadInput, LeadStatus, Profile, ProfileInput,
    ProfilePatch, Record, RecordKind, RoadmapPhase,
};
pub use store::{is_profile_code, RecordStore};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{kind} `{key}` not found")]
    NotFound { kind: RecordKind, key: String },

    #[error("a profile already exists for this email address")]
    DuplicateEmail,

    /// Storage unreachable or corrupt. The failed write left nothing behind.
    #[error("record store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn not_found(kind: RecordKind, key: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            key: key.into(),
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Unavailable(format!("record serialization failed: {err}"))
    }
}
