//! In-memory collaborators and a router harness for handler tests.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::Utc;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use crate::auth::IdentityVerifier;
use crate::errors::AppError;
use crate::jobs::query::{ListQuery, SortField, SortKey};
use crate::jobs::store::JobStore;
use crate::llm_client::LlmClient;
use crate::models::job::{JobApplication, JobId, JobPatch, JobStatus};
use crate::models::user::{Preferences, ProfilePatch, UserId, UserProfile};
use crate::routes::build_router;
use crate::state::AppState;
use crate::users::store::UserStore;

pub const ALICE_TOKEN: &str = "alice-session";
pub const BOB_TOKEN: &str = "bob-session";

// ────────────────────────────────────────────────────────────────────────────
// Stores
// ────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MemoryJobStore {
    jobs: Mutex<HashMap<JobId, JobApplication>>,
}

impl MemoryJobStore {
    pub fn len(&self) -> usize {
        self.jobs.lock().unwrap().len()
    }
}

fn matches(query: &ListQuery, job: &JobApplication) -> bool {
    let term = query.search.as_ref().map(|t| t.to_lowercase());
    query.status.map_or(true, |s| job.status == s)
        && query.priority.map_or(true, |p| job.priority == p)
        && term.map_or(true, |t| {
            job.company.to_lowercase().contains(&t) || job.role.to_lowercase().contains(&t)
        })
}

/// Same ordering as `SortKey::order_by_sql`.
fn compare(sort: SortKey, a: &JobApplication, b: &JobApplication) -> Ordering {
    let ord = match sort.field {
        SortField::ApplicationDate => a.application_date.cmp(&b.application_date),
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        SortField::Company => a.company.to_lowercase().cmp(&b.company.to_lowercase()),
        SortField::Role => a.role.to_lowercase().cmp(&b.role.to_lowercase()),
        SortField::Deadline => match (a.deadline, b.deadline) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => return Ordering::Less,
            (None, Some(_)) => return Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
    };
    let ord = if sort.descending { ord.reverse() } else { ord };
    ord.then_with(|| a.id.cmp(&b.id))
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn insert(&self, job: JobApplication) -> Result<JobApplication, AppError> {
        self.jobs.lock().unwrap().insert(job.id, job.clone());
        Ok(job)
    }

    async fn list(
        &self,
        owner: UserId,
        query: &ListQuery,
    ) -> Result<Vec<JobApplication>, AppError> {
        let mut jobs: Vec<_> = self
            .jobs
            .lock()
            .unwrap()
            .values()
            .filter(|j| j.owner_id == owner && matches(query, j))
            .cloned()
            .collect();
        jobs.sort_by(|a, b| compare(query.sort, a, b));
        Ok(jobs)
    }

    async fn get(&self, owner: UserId, id: JobId) -> Result<Option<JobApplication>, AppError> {
        Ok(self
            .jobs
            .lock()
            .unwrap()
            .get(&id)
            .filter(|j| j.owner_id == owner)
            .cloned())
    }

    async fn update(
        &self,
        owner: UserId,
        id: JobId,
        patch: JobPatch,
    ) -> Result<Option<JobApplication>, AppError> {
        let mut jobs = self.jobs.lock().unwrap();
        let Some(job) = jobs.get_mut(&id).filter(|j| j.owner_id == owner) else {
            return Ok(None);
        };
        job.apply(patch, Utc::now());
        Ok(Some(job.clone()))
    }

    async fn delete(&self, owner: UserId, id: JobId) -> Result<bool, AppError> {
        let mut jobs = self.jobs.lock().unwrap();
        if jobs.get(&id).is_some_and(|j| j.owner_id == owner) {
            jobs.remove(&id);
            return Ok(true);
        }
        Ok(false)
    }

    async fn status_counts(&self, owner: UserId) -> Result<Vec<(JobStatus, u64)>, AppError> {
        let mut counts: HashMap<JobStatus, u64> = HashMap::new();
        for job in self.jobs.lock().unwrap().values() {
            if job.owner_id == owner {
                *counts.entry(job.status).or_insert(0) += 1;
            }
        }
        Ok(counts.into_iter().collect())
    }

    async fn set_ai_suggestions(
        &self,
        owner: UserId,
        id: JobId,
        suggestions: &str,
    ) -> Result<Option<JobApplication>, AppError> {
        let mut jobs = self.jobs.lock().unwrap();
        let Some(job) = jobs.get_mut(&id).filter(|j| j.owner_id == owner) else {
            return Ok(None);
        };
        job.ai_suggestions = suggestions.to_string();
        job.updated_at = Utc::now();
        Ok(Some(job.clone()))
    }
}

#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<HashMap<UserId, UserProfile>>,
}

impl MemoryUserStore {
    pub fn add(&self, id: UserId, name: &str) {
        let now = Utc::now();
        self.users.lock().unwrap().insert(
            id,
            UserProfile {
                id,
                email: format!("{}@example.com", name.to_lowercase()),
                name: name.to_string(),
                resume: String::new(),
                preferences: Preferences::default(),
                created_at: now,
                updated_at: now,
            },
        );
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn get(&self, id: UserId) -> Result<Option<UserProfile>, AppError> {
        Ok(self.users.lock().unwrap().get(&id).cloned())
    }

    async fn update_profile(
        &self,
        id: UserId,
        patch: ProfilePatch,
    ) -> Result<Option<UserProfile>, AppError> {
        let mut users = self.users.lock().unwrap();
        let Some(user) = users.get_mut(&id) else {
            return Ok(None);
        };
        user.apply(patch, Utc::now());
        Ok(Some(user.clone()))
    }
}

/// Fixed token table.
#[derive(Default)]
pub struct StaticTokenVerifier {
    tokens: HashMap<String, UserId>,
}

#[async_trait]
impl IdentityVerifier for StaticTokenVerifier {
    async fn verify(&self, token: &str) -> Result<Option<UserId>, AppError> {
        Ok(self.tokens.get(token).copied())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Router harness
// ────────────────────────────────────────────────────────────────────────────

/// A router over in-memory stores with two signed-in users.
pub struct TestApp {
    pub router: Router,
    pub jobs: Arc<MemoryJobStore>,
    pub alice: UserId,
    pub bob: UserId,
}

impl TestApp {
    /// No completion API key configured.
    pub fn new() -> Self {
        Self::with_llm(
            LlmClient::new(None, "http://127.0.0.1:9".to_string(), Duration::from_secs(5))
                .unwrap(),
        )
    }

    pub fn with_llm(llm: LlmClient) -> Self {
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        let users = MemoryUserStore::default();
        users.add(alice, "Alice");
        users.add(bob, "Bob");

        let mut tokens = HashMap::new();
        tokens.insert(ALICE_TOKEN.to_string(), alice);
        tokens.insert(BOB_TOKEN.to_string(), bob);

        let jobs = Arc::new(MemoryJobStore::default());
        let state = AppState {
            jobs: jobs.clone(),
            users: Arc::new(users),
            auth: Arc::new(StaticTokenVerifier { tokens }),
            llm,
        };

        Self {
            router: build_router(state),
            jobs,
            alice,
            bob,
        }
    }

    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }

    /// Sends one request and decodes the JSON reply (`Null` for an empty body).
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&json).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration as ChronoDuration, TimeZone};

    fn job(company: &str, deadline_day: Option<u32>) -> JobApplication {
        let now = Utc::now();
        JobApplication {
            id: Uuid::new_v4(),
            owner_id: Uuid::nil(),
            company: company.into(),
            role: "SRE".into(),
            status: JobStatus::Applied,
            priority: Default::default(),
            application_date: now - ChronoDuration::days(1),
            deadline: deadline_day.map(|d| Utc.with_ymd_and_hms(2030, 1, d, 0, 0, 0).unwrap()),
            jd_text: String::new(),
            job_url: String::new(),
            salary: None,
            location: String::new(),
            work_type: None,
            notes: String::new(),
            ai_suggestions: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_missing_deadline_sorts_last_both_ways() {
        let a = job("a", Some(1));
        let b = job("b", Some(2));
        let none = job("none", None);

        for key in ["deadline", "-deadline"] {
            let sort: SortKey = key.parse().unwrap();
            let mut jobs = vec![none.clone(), a.clone(), b.clone()];
            jobs.sort_by(|x, y| compare(sort, x, y));
            assert_eq!(jobs.last().unwrap().company, "none", "{key}");
        }
    }
}
