//! Intake pipeline: validate, persist, enrich, update.
//!
//! Each request runs its steps strictly in order. A failed enrichment never
//! undoes the stored profile; it is recorded on the profile instead.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::enrichment::Enricher;
use crate::intake::{
    self, RawContactSubmission, RawLeadSubmission, RawProfileSubmission, ValidationFailed,
};
use crate::records::{Lead, Profile, ProfilePatch, RecordStore, StoreError};
use crate::sharing::ProfileSharing;

#[derive(Debug, Error)]
pub enum IntakeError {
    #[error(transparent)]
    Validation(#[from] ValidationFailed),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A freshly created profile with its public link.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileCreated {
    #[serde(flatten)]
    pub profile: Profile,
    pub share_url: String,
}

#[derive(Clone)]
pub struct IntakePipeline {
    store: Arc<RecordStore>,
    enricher: Enricher,
    sharing: ProfileSharing,
    synthetic_email_domain: String,
}

impl IntakePipeline {
    pub fn new(
        store: Arc<RecordStore>,
        enricher: Enricher,
        sharing: ProfileSharing,
        synthetic_email_domain: impl Into<String>,
    ) -> Self {
        Self {
            store,
            enricher,
            sharing,
            synthetic_email_domain: synthetic_email_domain.into(),
        }
    }

    pub async fn submit_lead(&self, raw: RawLeadSubmission) -> Result<Lead, IntakeError> {
        let input = intake::validate_lead(&raw, &self.synthetic_email_domain)?;
        let lead = self.store.call(move |store| store.create_lead(input)).await?;
        info!(
            lead_id = %lead.id,
            source = %lead.source,
            email_synthesized = lead.email_synthesized,
            "lead captured"
        );
        Ok(lead)
    }

    pub async fn submit_contact(&self, raw: RawContactSubmission) -> Result<Lead, IntakeError> {
        let input = intake::validate_contact(&raw)?;
        let lead = self.store.call(move |store| store.create_lead(input)).await?;
        info!(lead_id = %lead.id, "contact request captured");
        Ok(lead)
    }

    /// Creates the profile, then makes exactly one enrichment attempt.
    ///
    /// Once the profile is stored, creation succeeds regardless of how
    /// enrichment goes. If recording the outcome fails, the profile is
    /// returned as stored with its status still `pending`.
    pub async fn create_profile(
        &self,
        raw: RawProfileSubmission,
    ) -> Result<ProfileCreated, IntakeError> {
        let input = intake::validate_profile(&raw)?;
        let stored = self
            .store
            .call(move |store| store.create_profile(input))
            .await?;
        info!(
            profile_id = %stored.id,
            profile_code = %stored.profile_code,
            "profile stored"
        );

        let patch = match self.enricher.enrich(&stored).await {
            Ok(fields) => ProfilePatch::enriched(fields),
            Err(err) => ProfilePatch::failed(err.kind()),
        };
        let profile = match self.apply_patch(&stored.id, patch).await {
            Ok(updated) => updated,
            Err(err) => {
                warn!(profile_id = %stored.id, error = %err, "enrichment result not recorded");
                stored
            }
        };

        let share_url = self.sharing.publish(&profile);
        info!(
            profile_id = %profile.id,
            enrichment_status = ?profile.enrichment_status,
            "profile created"
        );
        Ok(ProfileCreated { profile, share_url })
    }

    async fn apply_patch(&self, id: &str, patch: ProfilePatch) -> Result<Profile, StoreError> {
        let fields = patch.into_fields()?;
        let id = id.to_string();
        self.store
            .call(move |store| store.update::<Profile>(&id, fields))
            .await
    }
}
