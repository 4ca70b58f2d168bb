use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{Local, NaiveDate};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::cv::accessor::SectionCaps;
use crate::cv::generator::require_profile;
use crate::errors::AppError;
use crate::models::{ExperienceRecord, Profile, ProjectRecord};
use crate::profile::completeness::{compute_completeness_report, CompletenessReport, SectionCounts};
use crate::profile::inputs::{ProfileInput, RecordInput};
use crate::profile::repository::{
    self, delete_section_record, site_stats, SectionInput, SiteStats,
};
use crate::state::AppState;

fn today() -> NaiveDate {
    Local::now().date_naive()
}

async fn caller_profile(state: &AppState, user: AuthUser) -> Result<Profile, AppError> {
    require_profile(
        state.profiles.as_ref(),
        user.0,
        &state.config.profile_setup_url,
    )
    .await
}

fn record_not_found(table: &str, id: Uuid) -> AppError {
    AppError::NotFound(format!("{table} record {id} not found"))
}

// ────────────────────────────────────────────────────────────────────────────
// Profile
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/profile
pub async fn create_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<ProfileInput>,
) -> Result<(StatusCode, Json<Profile>), AppError> {
    let input = input.prepare(today())?;
    let profile = repository::create_profile(&state.db, user.0, &input).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

/// GET /api/v1/profile
pub async fn get_profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Profile>, AppError> {
    Ok(Json(caller_profile(&state, user).await?))
}

/// PUT /api/v1/profile
pub async fn update_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<ProfileInput>,
) -> Result<Json<Profile>, AppError> {
    let profile = caller_profile(&state, user).await?;
    let input = input.prepare(today())?;
    let updated = repository::update_profile(&state.db, profile.id, &input).await?;
    info!("Updated profile {}", updated.id);
    Ok(Json(updated))
}

// ────────────────────────────────────────────────────────────────────────────
// Section records
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/profile/{section}
pub async fn create_record<I: SectionInput>(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<I>,
) -> Result<(StatusCode, Json<I::Record>), AppError> {
    let profile = caller_profile(&state, user).await?;
    let input = input.prepare(today())?;
    let record = input.insert(&state.db, profile.id).await?;
    info!("Added {} record to profile {}", I::TABLE, profile.id);
    Ok((StatusCode::CREATED, Json(record)))
}

/// PUT /api/v1/profile/{section}/:id
pub async fn update_record<I: SectionInput>(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(input): Json<I>,
) -> Result<Json<I::Record>, AppError> {
    let profile = caller_profile(&state, user).await?;
    let input = input.prepare(today())?;
    input
        .update(&state.db, profile.id, id)
        .await?
        .map(Json)
        .ok_or_else(|| record_not_found(I::TABLE, id))
}

/// DELETE /api/v1/profile/{section}/:id
pub async fn delete_record<I: SectionInput>(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let profile = caller_profile(&state, user).await?;
    if !delete_section_record::<I>(&state.db, profile.id, id).await? {
        return Err(record_not_found(I::TABLE, id));
    }
    info!("Removed {} record {id} from profile {}", I::TABLE, profile.id);
    Ok(StatusCode::NO_CONTENT)
}

// ────────────────────────────────────────────────────────────────────────────
// Dashboard
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub has_profile: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<Profile>,
    pub counts: SectionCounts,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<CompletenessReport>,
    pub latest_experience: Vec<ExperienceRecord>,
    pub latest_projects: Vec<ProjectRecord>,
}

impl DashboardResponse {
    fn without_profile() -> Self {
        Self {
            has_profile: false,
            profile: None,
            counts: SectionCounts::default(),
            report: None,
            latest_experience: Vec::new(),
            latest_projects: Vec::new(),
        }
    }
}

/// GET /api/v1/dashboard
///
/// A caller without a profile gets an empty dashboard rather than a redirect.
pub async fn get_dashboard(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<DashboardResponse>, AppError> {
    let Some(profile) = state.profiles.profile_for_user(user.0).await? else {
        return Ok(Json(DashboardResponse::without_profile()));
    };

    let counts = state.profiles.section_counts(profile.id).await?;
    let report = compute_completeness_report(&counts, &profile);
    let snapshot = state
        .profiles
        .snapshot(profile, &SectionCaps::DASHBOARD_LATEST)
        .await?;

    Ok(Json(DashboardResponse {
        has_profile: true,
        profile: Some(snapshot.profile),
        counts,
        report: Some(report),
        latest_experience: snapshot.experience,
        latest_projects: snapshot.projects,
    }))
}

/// GET /api/v1/stats
pub async fn get_stats(State(state): State<AppState>) -> Result<Json<SiteStats>, AppError> {
    Ok(Json(site_stats(&state.db).await?))
}
