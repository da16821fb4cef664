//! Axum route handlers for the Resume API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::extract::AppJson;
use crate::jobs::handlers::parse_job_id;
use crate::models::validation::{require_text, ValidationError};
use crate::resume::prompts::{build_suggest_prompt, RESUME_CONSULTANT_SYSTEM};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestRequest {
    #[serde(default)]
    pub resume_text: String,
    #[serde(default)]
    pub job_id: String,
}

#[derive(Debug, Serialize)]
pub struct SuggestResponse {
    pub suggestions: String,
}

/// POST /api/resume/suggest
///
/// Sends the resume and the job's description to the completion API, stores
/// the reply on the job and returns it.
pub async fn handle_suggest(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    AppJson(request): AppJson<SuggestRequest>,
) -> Result<Json<SuggestResponse>, AppError> {
    require_text("resumeText", &request.resume_text)?;
    if request.job_id.trim().is_empty() {
        return Err(ValidationError::Required("jobId").into());
    }
    let job_id = parse_job_id(&request.job_id)?;

    let job = state
        .jobs
        .get(user, job_id)
        .await?
        .ok_or_else(AppError::job_not_found)?;

    let prompt = build_suggest_prompt(&request.resume_text, &job.jd_text);
    let suggestions = state.llm.complete(RESUME_CONSULTANT_SYSTEM, &prompt).await?;

    // The job may have been deleted while the completion call was in flight.
    state
        .jobs
        .set_ai_suggestions(user, job_id, &suggestions)
        .await?
        .ok_or_else(AppError::job_not_found)?;

    info!("Stored AI suggestions for job {job_id}");
    Ok(Json(SuggestResponse { suggestions }))
}
