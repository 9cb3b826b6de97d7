//! Profile enrichment through one external text-generation call.
//!
//! The invoker never touches the store. It turns a stored profile into
//! derived fields or a typed failure, and the pipeline decides what to
//! persist.

pub mod client;
pub mod courses;
pub mod parse;
pub mod prompt;

pub use client::{
    generator_from_settings, ChatCompletionsClient, ChatRole, ChatTurn, DisabledGenerator,
    GenerationRequest, TextGenerator,
};
pub use courses::{recommend_course, Program};

use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{info, warn};

use crate::records::{EnrichmentFailureKind, EnrichmentFields, Profile};

#[derive(Debug, Clone, Error)]
pub enum EnrichmentFailed {
    #[error("text generation timed out after {0:?}")]
    Timeout(Duration),

    #[error("text generation unreachable: {0}")]
    Network(String),

    #[error("text generation returned HTTP {0}")]
    UpstreamStatus(u16),

    #[error("generated text could not be parsed: {0}")]
    Parse(String),

    #[error("no text generation API key configured")]
    NotConfigured,
}

impl EnrichmentFailed {
    pub fn kind(&self) -> EnrichmentFailureKind {
        match self {
            Self::Timeout(_) => EnrichmentFailureKind::Timeout,
            Self::Network(_) => EnrichmentFailureKind::NetworkError,
            Self::UpstreamStatus(_) => EnrichmentFailureKind::UpstreamError,
            Self::Parse(_) => EnrichmentFailureKind::ParseError,
            Self::NotConfigured => EnrichmentFailureKind::NotConfigured,
        }
    }
}

/// Runs one bounded generation call per profile. No retries.
#[derive(Clone)]
pub struct Enricher {
    generator: Arc<dyn TextGenerator>,
    timeout: Duration,
}

impl Enricher {
    pub fn new(generator: Arc<dyn TextGenerator>, timeout: Duration) -> Self {
        Self { generator, timeout }
    }

    pub fn generator(&self) -> Arc<dyn TextGenerator> {
        Arc::clone(&self.generator)
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn enrich(&self, profile: &Profile) -> Result<EnrichmentFields, EnrichmentFailed> {
        let program = recommend_course(profile.input.career_stage, &profile.input.interests);
        let request = prompt::build_instruction(profile, program);
        let started = Instant::now();

        let outcome = tokio::time::timeout(self.timeout, self.generator.generate(&request))
            .await
            .unwrap_or(Err(EnrichmentFailed::Timeout(self.timeout)))
            .and_then(|text| parse::parse_enrichment(&text));

        match outcome {
            Ok(mut fields) => {
                fields.ai_course_recommendation = Some(program.recommendation());
                info!(
                    profile_id = %profile.id,
                    populated = fields.populated(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "profile enriched"
                );
                Ok(fields)
            }
            Err(err) => {
                warn!(
                    profile_id = %profile.id,
                    failure = ?err.kind(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    error = %err,
                    "profile enrichment failed"
                );
                Err(err)
            }
        }
    }
}
