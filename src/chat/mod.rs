//! Chat proxy for the site assistant widget.
//!
//! Messages are forwarded with the session's recent history to the text
//! generator. Any failure degrades to a fixed fallback reply; the widget
//! never sees an error status.

pub mod rules;
pub mod sessions;

pub use rules::{classify, Topic};
pub use sessions::SessionCache;

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::enrichment::prompt::CHAT_SYSTEM_PROMPT;
use crate::enrichment::{ChatTurn, EnrichmentFailed, GenerationRequest, TextGenerator};
use crate::intake::ChatRequest;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ChatReply {
    pub response: String,
    pub session_id: String,
    pub topic: Topic,
    pub error: bool,
}

pub struct ChatService {
    generator: Arc<dyn TextGenerator>,
    sessions: Arc<SessionCache>,
    timeout: Duration,
    fallback_message: String,
}

impl ChatService {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        sessions: Arc<SessionCache>,
        timeout: Duration,
        fallback_message: impl Into<String>,
    ) -> Self {
        Self {
            generator,
            sessions,
            timeout,
            fallback_message: fallback_message.into(),
        }
    }

    pub async fn respond(&self, request: ChatRequest) -> ChatReply {
        let session_id = request
            .session_id
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let topic = classify(&request.message);
        let user_turn = ChatTurn::user(request.message);

        let mut turns = self.sessions.history(&session_id);
        turns.push(user_turn.clone());
        let generation = GenerationRequest {
            system: CHAT_SYSTEM_PROMPT.to_string(),
            turns,
        };

        let outcome = tokio::time::timeout(self.timeout, self.generator.generate(&generation))
            .await
            .unwrap_or(Err(EnrichmentFailed::Timeout(self.timeout)));
        match outcome {
            Ok(text) => {
                self.sessions
                    .append(&session_id, [user_turn, ChatTurn::assistant(text.clone())]);
                debug!(session_id = %session_id, topic = ?topic, "chat reply generated");
                ChatReply {
                    response: text,
                    session_id,
                    topic,
                    error: false,
                }
            }
            Err(err) => {
                warn!(
                    session_id = %session_id,
                    failure = ?err.kind(),
                    error = %err,
                    "chat generation failed; sending fallback"
                );
                ChatReply {
                    response: self.fallback_message.clone(),
                    session_id,
                    topic,
                    error: true,
                }
            }
        }
    }
}
