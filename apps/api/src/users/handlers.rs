use axum::{extract::State, Json};
use serde::Serialize;
use tracing::info;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::extract::AppJson;
use crate::models::user::{ProfilePatch, UserProfile};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: UserProfile,
}

fn user_not_found() -> AppError {
    AppError::NotFound("User not found".to_string())
}

/// GET /api/user/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<ProfileResponse>, AppError> {
    let user = state.users.get(user).await?.ok_or_else(user_not_found)?;
    Ok(Json(ProfileResponse { user }))
}

/// PUT /api/user/profile
pub async fn handle_update_profile(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    AppJson(patch): AppJson<ProfilePatch>,
) -> Result<Json<ProfileResponse>, AppError> {
    patch.validate()?;
    let updated = state
        .users
        .update_profile(user, patch)
        .await?
        .ok_or_else(user_not_found)?;
    info!("Updated profile for user {user}");
    Ok(Json(ProfileResponse { user: updated }))
}

#[cfg(test)]
mod tests {
    use crate::testing::{TestApp, ALICE_TOKEN, BOB_TOKEN};
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn test_profile_update_is_scoped_to_caller() {
        let app = TestApp::new();
        let (status, body) = app
            .send(
                Method::PUT,
                "/api/user/profile",
                Some(ALICE_TOKEN),
                Some(json!({"name": "Alice Liddell", "resume": "Rust", "preferences": {"reminderDays": 7}})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["name"], "Alice Liddell");
        assert_eq!(body["user"]["preferences"]["reminderDays"], 7);
        assert_eq!(body["user"]["preferences"]["emailReminders"], false);

        let (_, bob) = app
            .send(Method::GET, "/api/user/profile", Some(BOB_TOKEN), None)
            .await;
        assert_eq!(bob["user"]["name"], "Bob");
        assert_eq!(bob["user"]["id"], json!(app.bob));
    }

    #[tokio::test]
    async fn test_invalid_profile_is_bad_request() {
        let app = TestApp::new();
        let (status, _) = app
            .send(
                Method::PUT,
                "/api/user/profile",
                Some(ALICE_TOKEN),
                Some(json!({"preferences": {"reminderDays": 0}})),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, body) = app
            .send(Method::GET, "/api/user/profile", Some(ALICE_TOKEN), None)
            .await;
        assert_eq!(body["user"]["preferences"]["reminderDays"], 3);
    }
}
