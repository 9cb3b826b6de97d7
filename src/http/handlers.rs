//! Public endpoints used by the web front-end.

use axum::body::Bytes;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use serde_json::json;
use tracing::{debug, warn};

use super::{ApiError, AppState};
use crate::blogs::{BlogPost, BlogQuery};
use crate::chat::ChatReply;
use crate::course_catalog::Course;
use crate::intake::{
    self, RawChatMessage, RawContactSubmission, RawLeadSubmission, RawProfileSubmission,
};
use crate::pipeline::ProfileCreated;
use crate::records::{is_profile_code, Lead};
use crate::sharing::PublicProfile;
use crate::telemetry::{PageView, PageViewInput};

pub async fn banner() -> Json<serde_json::Value> {
    Json(json!({
        "message": "Skillax intake API",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn create_lead(
    State(state): State<AppState>,
    payload: Result<Json<RawLeadSubmission>, JsonRejection>,
) -> Result<(StatusCode, Json<Lead>), ApiError> {
    let Json(raw) = payload?;
    let lead = state.pipeline.submit_lead(raw).await?;
    Ok((StatusCode::CREATED, Json(lead)))
}

#[derive(Debug, Serialize)]
pub struct ContactAccepted {
    pub message: &'static str,
    pub lead_id: String,
}

pub async fn submit_contact(
    State(state): State<AppState>,
    payload: Result<Json<RawContactSubmission>, JsonRejection>,
) -> Result<(StatusCode, Json<ContactAccepted>), ApiError> {
    let Json(raw) = payload?;
    let lead = state.pipeline.submit_contact(raw).await?;
    Ok((
        StatusCode::CREATED,
        Json(ContactAccepted {
            message: "Thank you for contacting us! We'll get back to you soon.",
            lead_id: lead.id,
        }),
    ))
}

pub async fn create_profile(
    State(state): State<AppState>,
    payload: Result<Json<RawProfileSubmission>, JsonRejection>,
) -> Result<(StatusCode, Json<ProfileCreated>), ApiError> {
    let Json(raw) = payload?;
    let created = state.pipeline.create_profile(raw).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_public_profile(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<PublicProfile>, ApiError> {
    if !is_profile_code(&code) {
        return Err(ApiError::NotFound("Profile"));
    }
    let profile = state.sharing.fetch_public(&code).await?;
    Ok(Json(profile))
}

/// Missing message is a 400; every other failure is a fallback reply.
pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<RawChatMessage>, JsonRejection>,
) -> Result<Json<ChatReply>, ApiError> {
    let Json(raw) = payload?;
    let request = intake::validate_chat(&raw)?;
    Ok(Json(state.chat.respond(request).await))
}

/// Fire-and-forget beacon: always 202, even for garbage bodies.
pub async fn track_pageview(State(state): State<AppState>, body: Bytes) -> impl IntoResponse {
    let input: PageViewInput = serde_json::from_slice(&body).unwrap_or_else(|err| {
        debug!(error = %err, "unreadable page view body");
        PageViewInput::default()
    });
    let view = PageView::from_input(input);
    let log = state.page_views.clone();
    match tokio::task::spawn_blocking(move || log.record(&view)).await {
        Ok(Ok(())) => {}
        Ok(Err(err)) => warn!(error = %err, "page view not recorded"),
        Err(err) => warn!(error = %err, "page view task aborted"),
    }
    (StatusCode::ACCEPTED, Json(json!({ "status": "ok" })))
}

pub async fn list_blogs(
    State(state): State<AppState>,
    query: Result<Query<BlogQuery>, QueryRejection>,
) -> Result<Json<Vec<BlogPost>>, ApiError> {
    let Query(query) = query?;
    let blogs = state.blogs.clone();
    let posts = tokio::task::spawn_blocking(move || blogs.list(&query))
        .await
        .map_err(|err| ApiError::Unavailable(format!("blog task aborted: {err}")))??;
    Ok(Json(posts))
}

pub async fn get_blog(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<BlogPost>, ApiError> {
    let blogs = state.blogs.clone();
    tokio::task::spawn_blocking(move || blogs.get_by_slug(&slug))
        .await
        .map_err(|err| ApiError::Unavailable(format!("blog task aborted: {err}")))??
        .map(Json)
        .ok_or(ApiError::NotFound("Blog post"))
}

pub async fn list_courses(
    State(state): State<AppState>,
) -> Result<Json<Vec<Course>>, ApiError> {
    let courses = state.courses.clone();
    let listed = tokio::task::spawn_blocking(move || courses.list())
        .await
        .map_err(|err| ApiError::Unavailable(format!("course task aborted: {err}")))??;
    Ok(Json(listed))
}

pub async fn get_course(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Course>, ApiError> {
    let courses = state.courses.clone();
    tokio::task::spawn_blocking(move || courses.get_by_slug(&slug))
        .await
        .map_err(|err| ApiError::Unavailable(format!("course task aborted: {err}")))??
        .map(Json)
        .ok_or(ApiError::NotFound("Course"))
}
