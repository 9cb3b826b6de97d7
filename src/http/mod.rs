//! HTTP surface under `/api`.

pub mod admin;
pub mod error;
pub mod handlers;

pub use error::ApiError;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::http::HeaderMap;
use axum::routing::{get, patch, post};
use axum::Router;

use crate::blogs::BlogCatalog;
use crate::chat::{ChatService, SessionCache};
use crate::config::{ensure_workspace_structure, AppConfig, WorkspacePaths};
use crate::course_catalog::CourseCatalog;
use crate::enrichment::{generator_from_settings, Enricher, TextGenerator};
use crate::pipeline::IntakePipeline;
use crate::records::storage::compute_hash;
use crate::records::RecordStore;
use crate::sharing::ProfileSharing;
use crate::telemetry::PageViewLog;

/// Shared handler state. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RecordStore>,
    pub pipeline: IntakePipeline,
    pub sharing: ProfileSharing,
    pub chat: Arc<ChatService>,
    pub page_views: PageViewLog,
    pub blogs: BlogCatalog,
    pub courses: CourseCatalog,
    /// SHA-256 of the admin bearer token; admin routes are closed when unset.
    admin_token_digest: Option<Arc<str>>,
}

impl AppState {
    /// Production wiring: real generator, secrets from the environment.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let paths = ensure_workspace_structure(config)?;
        let generator = generator_from_settings(&config.enrichment)
            .context("Failed to build text generation client")?;
        Self::with_generator(config, &paths, generator, config.admin.token())
    }

    pub fn with_generator(
        config: &AppConfig,
        paths: &WorkspacePaths,
        generator: Arc<dyn TextGenerator>,
        admin_token: Option<String>,
    ) -> Result<Self> {
        let store = Arc::new(
            RecordStore::open(&paths.data_dir)
                .with_context(|| format!("Failed to open record store at {:?}", paths.data_dir))?,
        );
        let enricher = Enricher::new(generator.clone(), config.enrichment.timeout());
        let sharing = ProfileSharing::new(store.clone(), config.server.public_base_url.clone());
        let pipeline = IntakePipeline::new(
            store.clone(),
            enricher,
            sharing.clone(),
            config.leads.synthetic_email_domain.clone(),
        );
        let sessions = Arc::new(SessionCache::new(
            config.chat.session_ttl(),
            config.chat.max_history_turns,
        ));
        let chat = Arc::new(ChatService::new(
            generator,
            sessions,
            config.enrichment.timeout(),
            config.chat.fallback_message.clone(),
        ));
        Ok(Self {
            store,
            pipeline,
            sharing,
            chat,
            page_views: PageViewLog::new(paths.page_views_file()),
            blogs: BlogCatalog::new(paths.blogs_file()),
            courses: CourseCatalog::new(paths.courses_file()),
            admin_token_digest: admin_token.map(|token| compute_hash(token.trim().as_bytes()).into()),
        })
    }

    /// Checks `Authorization: Bearer <token>` against the configured token.
    pub fn authorize_admin(&self, headers: &HeaderMap) -> Result<(), ApiError> {
        let expected = self.admin_token_digest.as_deref().ok_or(ApiError::Unauthorized)?;
        let presented = headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(ApiError::Unauthorized)?;
        if compute_hash(presented.as_bytes()) == expected {
            Ok(())
        } else {
            Err(ApiError::Unauthorized)
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api", get(handlers::banner))
        .route("/api/", get(handlers::banner))
        .route("/api/leads", post(handlers::create_lead))
        .route("/api/contact", post(handlers::submit_contact))
        .route("/api/profiles", post(handlers::create_profile))
        .route("/api/profiles/:code", get(handlers::get_public_profile))
        .route("/api/chat", post(handlers::chat))
        .route("/api/track/pageview", post(handlers::track_pageview))
        .route("/api/blogs", get(handlers::list_blogs))
        .route("/api/blogs/:slug", get(handlers::get_blog))
        .route("/api/courses", get(handlers::list_courses))
        .route("/api/courses/:slug", get(handlers::get_course))
        .route("/api/leads/:lead_id/status", patch(admin::update_lead_status))
        .route("/api/admin/leads", get(admin::list_leads))
        .route("/api/admin/profiles", get(admin::list_profiles))
        .route("/api/analytics/summary", get(admin::analytics_summary))
        .route("/api/analytics/profiles", get(admin::profile_analytics))
        .route("/api/analytics/leads-by-source", get(admin::leads_by_source))
        .route("/api/analytics/leads-by-interest", get(admin::leads_by_interest))
        .route("/api/analytics/lead-conversion", get(admin::lead_conversion))
        .route("/api/analytics/top-pages", get(admin::top_pages))
        .route("/api/analytics/page-views", get(admin::page_view_trend))
        .with_state(state)
}
