//! Axum route handlers for the Jobs API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::extract::{AppJson, AppQuery};
use crate::jobs::query::ListParams;
use crate::jobs::stats::JobStats;
use crate::models::job::{JobApplication, JobId, JobPatch, NewJob};
use crate::state::AppState;

/// Malformed ids are reported like any other miss.
pub fn parse_job_id(raw: &str) -> Result<JobId, AppError> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::job_not_found())
}

/// GET /api/jobs?status=&priority=&search=&sort=
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    AppQuery(params): AppQuery<ListParams>,
) -> Result<Json<Vec<JobApplication>>, AppError> {
    let query = params.into_query()?;
    let jobs = state.jobs.list(user, &query).await?;
    Ok(Json(jobs))
}

/// GET /api/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<JobApplication>, AppError> {
    let id = parse_job_id(&id)?;
    let job = state
        .jobs
        .get(user, id)
        .await?
        .ok_or_else(AppError::job_not_found)?;
    Ok(Json(job))
}

/// POST /api/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    AppJson(body): AppJson<NewJob>,
) -> Result<(StatusCode, Json<JobApplication>), AppError> {
    let record = body.into_record(user, Utc::now())?;
    let job = state.jobs.insert(record).await?;
    info!("Created job {} for user {user}", job.id);
    Ok((StatusCode::CREATED, Json(job)))
}

/// PUT /api/jobs/:id
///
/// Partial update: only the fields present in the body change.
pub async fn handle_update_job(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    AppJson(patch): AppJson<JobPatch>,
) -> Result<Json<JobApplication>, AppError> {
    patch.validate()?;
    let id = parse_job_id(&id)?;
    let job = state
        .jobs
        .update(user, id, patch)
        .await?
        .ok_or_else(AppError::job_not_found)?;
    info!("Updated job {id} for user {user}");
    Ok(Json(job))
}

/// DELETE /api/jobs/:id
pub async fn handle_delete_job(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id = parse_job_id(&id)?;
    if !state.jobs.delete(user, id).await? {
        return Err(AppError::job_not_found());
    }
    info!("Deleted job {id} for user {user}");
    Ok(Json(json!({ "message": "Job deleted successfully" })))
}

/// GET /api/jobs/stats/overview
pub async fn handle_job_stats(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<JobStats>, AppError> {
    let counts = state.jobs.status_counts(user).await?;
    Ok(Json(JobStats::from_counts(counts)))
}
