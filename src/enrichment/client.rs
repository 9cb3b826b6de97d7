//! Text generation backends.
//!
//! `ChatCompletionsClient` speaks the OpenAI-compatible chat-completions
//! protocol. Tests swap in their own `TextGenerator`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::EnrichmentFailed;
use crate::config::EnrichmentSettings;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// One upstream call: a system prompt followed by conversation turns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationRequest {
    pub system: String,
    pub turns: Vec<ChatTurn>,
}

impl GenerationRequest {
    /// Flattens into the `messages` array sent upstream.
    pub fn messages(&self) -> Vec<ChatTurn> {
        let mut messages = Vec::with_capacity(self.turns.len() + 1);
        messages.push(ChatTurn {
            role: ChatRole::System,
            content: self.system.clone(),
        });
        messages.extend(self.turns.iter().cloned());
        messages
    }
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Returns the generated text of the first choice.
    async fn generate(&self, request: &GenerationRequest) -> Result<String, EnrichmentFailed>;
}

#[derive(Debug, Serialize)]
struct CompletionBody<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatTurn>,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    #[serde(default)]
    content: Option<String>,
}

pub struct ChatCompletionsClient {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    temperature: f32,
    api_key: String,
    timeout: Duration,
}

impl ChatCompletionsClient {
    pub fn new(settings: &EnrichmentSettings, api_key: String) -> Result<Self, EnrichmentFailed> {
        let timeout = settings.timeout();
        let http = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT.min(timeout))
            .timeout(timeout)
            .build()
            .map_err(|err| EnrichmentFailed::Network(err.to_string()))?;
        Ok(Self {
            http,
            endpoint: settings.endpoint.clone(),
            model: settings.model.clone(),
            temperature: settings.temperature,
            api_key,
            timeout,
        })
    }

    fn classify(&self, err: reqwest::Error) -> EnrichmentFailed {
        if err.is_timeout() {
            EnrichmentFailed::Timeout(self.timeout)
        } else {
            EnrichmentFailed::Network(err.to_string())
        }
    }
}

#[async_trait]
impl TextGenerator for ChatCompletionsClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, EnrichmentFailed> {
        let body = CompletionBody {
            model: &self.model,
            temperature: self.temperature,
            messages: request.messages(),
        };
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|err| self.classify(err))?;

        let status = response.status();
        if !status.is_success() {
            warn!(upstream_status = status.as_u16(), "text generation rejected");
            return Err(EnrichmentFailed::UpstreamStatus(status.as_u16()));
        }

        let text = response.text().await.map_err(|err| self.classify(err))?;
        let payload: CompletionResponse = serde_json::from_str(&text)
            .map_err(|err| EnrichmentFailed::Parse(format!("completion envelope: {err}")))?;
        let content = payload
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| EnrichmentFailed::Parse("completion had no content".into()))?;
        debug!(chars = content.len(), "text generation succeeded");
        Ok(content)
    }
}

/// Stand-in when no API key is configured. Every call fails fast.
#[derive(Debug, Default)]
pub struct DisabledGenerator;

#[async_trait]
impl TextGenerator for DisabledGenerator {
    async fn generate(&self, _request: &GenerationRequest) -> Result<String, EnrichmentFailed> {
        Err(EnrichmentFailed::NotConfigured)
    }
}

/// Builds the production generator, or the disabled one without a key.
pub fn generator_from_settings(
    settings: &EnrichmentSettings,
) -> Result<Arc<dyn TextGenerator>, EnrichmentFailed> {
    match settings.api_key() {
        Some(key) => Ok(Arc::new(ChatCompletionsClient::new(settings, key)?)),
        None => {
            warn!(
                api_key_env = %settings.api_key_env,
                "no text generation key configured; enrichment and chat will fall back"
            );
            Ok(Arc::new(DisabledGenerator))
        }
    }
}
