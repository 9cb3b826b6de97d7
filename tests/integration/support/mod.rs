//! Spins up the API on an ephemeral port, wired to a scripted upstream.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use skillax::config::{AppConfig, WorkspacePaths};
use skillax::enrichment::ChatCompletionsClient;
use skillax::{router, AppState};
use tempfile::TempDir;

pub const ADMIN_TOKEN: &str = "admin-secret";
pub const UPSTREAM_TIMEOUT_MS: u64 = 400;

pub const ENRICHED_REPLY: &str = r#"{
    "bio": "Asha Kumar is a Kochi graduate building a career in search marketing.",
    "linkedin_headline": "Aspiring SEO Specialist | Search & Content",
    "strengths": ["Analytical thinking", "Clear writing"],
    "skill_gaps": ["Technical SEO", "Google Analytics 4"],
    "career_roadmap": [
        {"phase": "Phase 1", "title": "Foundations", "goals": ["Learn keyword research", "Audit one local business site"]},
        {"phase": "Phase 2", "title": "Practice", "goals": ["Ship an on-page SEO project"]}
    ]
}"#;

pub const SECTIONED_REPLY: &str = "\
Bio: Asha is a commerce graduate who loves data-driven storytelling.

Headline: Aspiring SEO Specialist
";

/// How the fake chat-completions service answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upstream {
    Valid,
    Sections,
    Status500,
    Slow,
    Malformed,
}

pub struct FakeUpstream {
    behaviour: Mutex<Upstream>,
    calls: AtomicUsize,
    last_message_count: AtomicUsize,
}

impl FakeUpstream {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Length of the `messages` array in the most recent request.
    pub fn last_message_count(&self) -> usize {
        self.last_message_count.load(Ordering::SeqCst)
    }

    pub fn set(&self, behaviour: Upstream) {
        *self.behaviour.lock().unwrap() = behaviour;
    }

    fn current(&self) -> Upstream {
        *self.behaviour.lock().unwrap()
    }
}

fn completion(content: &str) -> Json<Value> {
    Json(json!({
        "id": "chatcmpl-test",
        "choices": [{"index": 0, "message": {"role": "assistant", "content": content}}]
    }))
}

async fn completions(
    State(upstream): State<Arc<FakeUpstream>>,
    Json(request): Json<Value>,
) -> Response {
    upstream.calls.fetch_add(1, Ordering::SeqCst);
    let messages = request["messages"].as_array().map_or(0, Vec::len);
    upstream.last_message_count.store(messages, Ordering::SeqCst);
    match upstream.current() {
        Upstream::Valid => completion(ENRICHED_REPLY).into_response(),
        Upstream::Sections => completion(SECTIONED_REPLY).into_response(),
        Upstream::Status500 => {
            (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded").into_response()
        }
        Upstream::Slow => {
            tokio::time::sleep(Duration::from_millis(UPSTREAM_TIMEOUT_MS * 5)).await;
            completion(ENRICHED_REPLY).into_response()
        }
        Upstream::Malformed => (StatusCode::OK, "<html>not json</html>").into_response(),
    }
}

async fn serve(app: Router) -> Result<SocketAddr> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .context("failed to bind test listener")?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(addr)
}

pub struct TestApp {
    workspace: TempDir,
    pub base_url: String,
    pub client: reqwest::Client,
    pub upstream: Arc<FakeUpstream>,
}

impl TestApp {
    pub async fn spawn(behaviour: Upstream) -> Result<Self> {
        let upstream = Arc::new(FakeUpstream {
            behaviour: Mutex::new(behaviour),
            calls: AtomicUsize::new(0),
            last_message_count: AtomicUsize::new(0),
        });
        let upstream_app = Router::new()
            .route("/v1/chat/completions", post(completions))
            .with_state(upstream.clone());
        let upstream_addr = serve(upstream_app).await?;

        let workspace = TempDir::new().context("failed to create temp workspace")?;
        let mut config = AppConfig::default();
        config.storage.data_dir = Some(workspace.path().to_path_buf());
        config.server.public_base_url = "https://skillax.test/".into();
        config.enrichment.endpoint = format!("http://{upstream_addr}/v1/chat/completions");
        config.enrichment.timeout_ms = UPSTREAM_TIMEOUT_MS;

        let paths = WorkspacePaths::from_data_dir(workspace.path());
        std::fs::create_dir_all(&paths.content_dir)?;
        std::fs::create_dir_all(&paths.telemetry_dir)?;
        let generator = ChatCompletionsClient::new(&config.enrichment, "test-key".into())?;
        let state = AppState::with_generator(
            &config,
            &paths,
            Arc::new(generator),
            Some(ADMIN_TOKEN.to_string()),
        )?;
        let addr = serve(router(state)).await?;

        Ok(Self {
            workspace,
            base_url: format!("http://{addr}"),
            client: reqwest::Client::new(),
            upstream,
        })
    }

    pub fn data_dir(&self) -> PathBuf {
        self.workspace.path().to_path_buf()
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> Result<reqwest::Response> {
        Ok(self.client.post(self.url(path)).json(body).send().await?)
    }

    pub async fn get(&self, path: &str) -> Result<reqwest::Response> {
        Ok(self.client.get(self.url(path)).send().await?)
    }

    pub async fn admin_get(&self, path: &str) -> Result<reqwest::Response> {
        Ok(self
            .client
            .get(self.url(path))
            .bearer_auth(ADMIN_TOKEN)
            .send()
            .await?)
    }

    pub async fn admin_patch(&self, path: &str) -> Result<reqwest::Response> {
        Ok(self
            .client
            .patch(self.url(path))
            .bearer_auth(ADMIN_TOKEN)
            .send()
            .await?)
    }
}

/// The canonical wizard submission used across scenarios.
pub fn asha_submission(email: &str) -> Value {
    json!({
        "full_name": "Asha Kumar",
        "email": email,
        "phone": "9999999999",
        "location": "Kochi",
        "education_level": "bachelors",
        "career_stage": "fresher",
        "target_role": "SEO Specialist",
        "career_goals": "Grow into an SEO lead role",
        "interests": ["Search Engine Optimization"],
        "preferred_learning_style": "self_paced",
        "why_digital_marketing": "Love data-driven storytelling",
        "availability": "full_time"
    })
}
