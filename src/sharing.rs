//! Public share links and the contact-free profile projection.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_with::skip_serializing_none;

use crate::records::{
    Availability, CareerStage, EducationLevel, EnrichmentStatus, LearningStyle, Profile,
    RecordStore, RoadmapPhase, StoreError,
};

/// What an anonymous visitor may see of a profile.
///
/// Contact details and the internal id are not fields of this type, so they
/// cannot leak through serialization.
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PublicProfile {
    pub profile_code: String,
    pub full_name: String,
    pub location: String,
    pub linkedin_url: Option<String>,
    pub portfolio_url: Option<String>,
    pub education_level: EducationLevel,
    pub field_of_study: Option<String>,
    pub institution: Option<String>,
    pub career_stage: CareerStage,
    pub current_role: Option<String>,
    pub target_role: String,
    pub current_skills: Vec<String>,
    pub interests: Vec<String>,
    pub availability: Availability,
    pub preferred_learning_style: LearningStyle,
    pub ai_bio: Option<String>,
    pub ai_linkedin_headline: Option<String>,
    pub ai_strengths: Option<Vec<String>>,
    pub ai_skill_gaps: Option<Vec<String>>,
    pub ai_course_recommendation: Option<String>,
    pub ai_career_roadmap: Option<Vec<RoadmapPhase>>,
    pub enrichment_status: EnrichmentStatus,
    pub profile_views: u64,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Profile> for PublicProfile {
    fn from(profile: Profile) -> Self {
        let Profile {
            profile_code,
            input,
            enrichment,
            enrichment_status,
            profile_views,
            is_public,
            created_at,
            ..
        } = profile;
        Self {
            profile_code,
            full_name: input.full_name,
            location: input.location,
            linkedin_url: input.linkedin_url,
            portfolio_url: input.portfolio_url,
            education_level: input.education_level,
            field_of_study: input.field_of_study,
            institution: input.institution,
            career_stage: input.career_stage,
            current_role: input.current_role,
            target_role: input.target_role,
            current_skills: input.current_skills,
            interests: input.interests,
            availability: input.availability,
            preferred_learning_style: input.preferred_learning_style,
            ai_bio: enrichment.ai_bio,
            ai_linkedin_headline: enrichment.ai_linkedin_headline,
            ai_strengths: enrichment.ai_strengths,
            ai_skill_gaps: enrichment.ai_skill_gaps,
            ai_course_recommendation: enrichment.ai_course_recommendation,
            ai_career_roadmap: enrichment.ai_career_roadmap,
            enrichment_status,
            profile_views,
            is_public,
            created_at,
        }
    }
}

#[derive(Clone)]
pub struct ProfileSharing {
    store: Arc<RecordStore>,
    public_base_url: String,
}

impl ProfileSharing {
    pub fn new(store: Arc<RecordStore>, public_base_url: impl Into<String>) -> Self {
        let public_base_url = public_base_url.into().trim_end_matches('/').to_string();
        Self {
            store,
            public_base_url,
        }
    }

    /// Share URL on the front-end origin. The code, never the id, appears in it.
    pub fn publish(&self, profile: &Profile) -> String {
        format!("{}/profile/{}", self.public_base_url, profile.profile_code)
    }

    /// Returns the public view and counts the hit. Every successful call
    /// increments `profile_views` by exactly one; hidden profiles read as
    /// not found and are not counted.
    pub async fn fetch_public(&self, code: &str) -> Result<PublicProfile, StoreError> {
        let code = code.to_string();
        let profile = self
            .store
            .call(move |store| store.record_profile_view(&code))
            .await?;
        Ok(PublicProfile::from(profile))
    }
}
