//! Bearer-token protected admin and analytics endpoints.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use super::{ApiError, AppState};
use crate::intake;
use crate::records::{Choice, Lead, LeadStatus, Profile, StoreError};
use crate::telemetry::{
    self, AnalyticsSummary, CatalogTotals, DailyViews, InterestCount, LeadConversion, PageCount,
    PageView, PageViewLog, ProfileAnalytics, SourceCount,
};

const DEFAULT_ADMIN_PAGE: usize = 100;
const MAX_ADMIN_PAGE: usize = 1_000;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LeadFilter {
    pub status: Option<LeadStatus>,
    pub source: Option<String>,
    pub limit: Option<usize>,
    pub skip: Option<usize>,
}

impl LeadFilter {
    fn apply(&self, leads: Vec<Lead>) -> Vec<Lead> {
        let limit = self
            .limit
            .unwrap_or(DEFAULT_ADMIN_PAGE)
            .clamp(1, MAX_ADMIN_PAGE);
        leads
            .into_iter()
            .filter(|lead| self.status.map_or(true, |status| lead.status == status))
            .filter(|lead| {
                self.source
                    .as_deref()
                    .map_or(true, |source| lead.source == source)
            })
            .skip(self.skip.unwrap_or(0))
            .take(limit)
            .collect()
    }
}

pub async fn list_leads(
    State(state): State<AppState>,
    headers: HeaderMap,
    filter: Result<Query<LeadFilter>, QueryRejection>,
) -> Result<Json<Vec<Lead>>, ApiError> {
    state.authorize_admin(&headers)?;
    let Query(filter) = filter?;
    let leads = state.store.call(|store| store.list::<Lead>()).await?;
    Ok(Json(filter.apply(leads)))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StatusChange {
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StatusChanged {
    pub message: &'static str,
    pub lead_id: String,
    pub status: LeadStatus,
}

pub async fn update_lead_status(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(lead_id): Path<String>,
    change: Result<Query<StatusChange>, QueryRejection>,
) -> Result<Json<StatusChanged>, ApiError> {
    state.authorize_admin(&headers)?;
    let Query(change) = change?;
    let status = intake::validate_lead_status(&change.status.map(Value::String))?;
    let lead = state
        .store
        .call(move |store| store.update_lead_status(&lead_id, status))
        .await?;
    info!(lead_id = %lead.id, status = status.as_str(), "lead status changed");
    Ok(Json(StatusChanged {
        message: "Lead status updated",
        lead_id: lead.id,
        status: lead.status,
    }))
}

pub async fn list_profiles(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<Profile>>, ApiError> {
    state.authorize_admin(&headers)?;
    let profiles = state.store.call(|store| store.list::<Profile>()).await?;
    Ok(Json(profiles))
}

fn load_views(log: &PageViewLog) -> Result<Vec<PageView>, StoreError> {
    log.load()
        .map_err(|err| StoreError::Unavailable(format!("{err:#}")))
}

pub async fn analytics_summary(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<AnalyticsSummary>, ApiError> {
    state.authorize_admin(&headers)?;
    let log = state.page_views.clone();
    let blogs = state.blogs.clone();
    let courses = state.courses.clone();
    let summary = state
        .store
        .call(move |store| {
            let leads = store.list::<Lead>()?;
            let profiles = store.list::<Profile>()?;
            let views = load_views(&log)?;
            let catalogs = CatalogTotals {
                courses: courses.list()?.len(),
                blogs: blogs.published_count()?,
            };
            Ok(AnalyticsSummary::compute(&leads, &profiles, &views, catalogs))
        })
        .await?;
    Ok(Json(summary))
}

pub async fn leads_by_source(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<SourceCount>>, ApiError> {
    state.authorize_admin(&headers)?;
    let leads = state.store.call(|store| store.list::<Lead>()).await?;
    Ok(Json(telemetry::leads_by_source(&leads)))
}

pub async fn leads_by_interest(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<InterestCount>>, ApiError> {
    state.authorize_admin(&headers)?;
    let leads = state.store.call(|store| store.list::<Lead>()).await?;
    Ok(Json(telemetry::leads_by_interest(&leads)))
}

pub async fn lead_conversion(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<LeadConversion>, ApiError> {
    state.authorize_admin(&headers)?;
    let leads = state.store.call(|store| store.list::<Lead>()).await?;
    Ok(Json(LeadConversion::compute(&leads, Utc::now().date_naive())))
}

pub async fn top_pages(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<PageCount>>, ApiError> {
    state.authorize_admin(&headers)?;
    let log = state.page_views.clone();
    let views = state.store.call(move |_| load_views(&log)).await?;
    Ok(Json(telemetry::top_pages(&views)))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TrendQuery {
    pub days: Option<u32>,
}

pub async fn page_view_trend(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: Result<Query<TrendQuery>, QueryRejection>,
) -> Result<Json<Vec<DailyViews>>, ApiError> {
    state.authorize_admin(&headers)?;
    let Query(query) = query?;
    let days = telemetry::trend_days(query.days);
    let log = state.page_views.clone();
    let views = state.store.call(move |_| load_views(&log)).await?;
    Ok(Json(telemetry::page_view_trend(
        &views,
        days,
        Utc::now().date_naive(),
    )))
}

pub async fn profile_analytics(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ProfileAnalytics>, ApiError> {
    state.authorize_admin(&headers)?;
    let profiles = state.store.call(|store| store.list::<Profile>()).await?;
    Ok(Json(ProfileAnalytics::compute(&profiles)))
}
