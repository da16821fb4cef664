//! Caller identity. Tokens are issued elsewhere; this module only resolves
//! a bearer token to the user it belongs to.

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::user::UserId;
use crate::state::AppState;

/// Resolves a bearer token to the owning user, or `None` if the token is
/// unknown or expired.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<Option<UserId>, AppError>;
}

/// Reads sessions written by the auth service into `user_sessions`.
pub struct PgSessionVerifier {
    pool: PgPool,
}

impl PgSessionVerifier {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IdentityVerifier for PgSessionVerifier {
    async fn verify(&self, token: &str) -> Result<Option<UserId>, AppError> {
        let user_id = sqlx::query_scalar::<_, UserId>(
            "SELECT user_id FROM user_sessions WHERE token = $1 AND expires_at > now()",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user_id)
    }
}

/// The authenticated caller. Every owner-scoped handler takes one.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub UserId);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or(AppError::Unauthorized)?;
        let user_id = state
            .auth
            .verify(token)
            .await?
            .ok_or(AppError::Unauthorized)?;
        Ok(AuthUser(user_id))
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .trim()
        .split_once(' ')
        .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("bearer"))
        .map(|(_, token)| token.trim())
        .filter(|token| !token.is_empty())
}
