use std::sync::Arc;

use crate::auth::IdentityVerifier;
use crate::jobs::store::JobStore;
use crate::llm_client::LlmClient;
use crate::users::store::UserStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Owner-scoped job records. PostgreSQL in production.
    pub jobs: Arc<dyn JobStore>,
    pub users: Arc<dyn UserStore>,
    /// Resolves bearer tokens for the `AuthUser` extractor.
    pub auth: Arc<dyn IdentityVerifier>,
    pub llm: LlmClient,
}
