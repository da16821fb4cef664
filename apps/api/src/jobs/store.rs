//! Record store for job applications.
//!
//! Every operation takes the caller's id and matches on `(id, owner_id)`, so a
//! record that belongs to someone else looks exactly like a missing one.
//!
//! `AppState` holds an `Arc<dyn JobStore>`; production uses `PgJobStore`.

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use tracing::debug;

use crate::errors::AppError;
use crate::jobs::query::{like_pattern, ListQuery};
use crate::models::job::{
    JobApplication, JobId, JobPatch, JobStatus, Priority, Salary, ValidationError, WorkType,
};
use crate::models::user::UserId;

#[async_trait]
pub trait JobStore: Send + Sync {
    /// Persists a record built by `NewJob::into_record`.
    async fn insert(&self, job: JobApplication) -> Result<JobApplication, AppError>;

    async fn list(&self, owner: UserId, query: &ListQuery)
        -> Result<Vec<JobApplication>, AppError>;

    async fn get(&self, owner: UserId, id: JobId) -> Result<Option<JobApplication>, AppError>;

    /// Merges a validated patch into the owner's record.
    async fn update(
        &self,
        owner: UserId,
        id: JobId,
        patch: JobPatch,
    ) -> Result<Option<JobApplication>, AppError>;

    /// Returns `false` when nothing matched.
    async fn delete(&self, owner: UserId, id: JobId) -> Result<bool, AppError>;

    /// One entry per status present among the owner's records.
    async fn status_counts(&self, owner: UserId) -> Result<Vec<(JobStatus, u64)>, AppError>;

    /// Overwrites the stored AI suggestion text.
    async fn set_ai_suggestions(
        &self,
        owner: UserId,
        id: JobId,
        suggestions: &str,
    ) -> Result<Option<JobApplication>, AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// PostgreSQL
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, FromRow)]
pub struct JobRow {
    pub id: JobId,
    pub owner_id: UserId,
    pub company: String,
    pub role: String,
    pub status: String,
    pub priority: String,
    pub application_date: DateTime<Utc>,
    pub deadline: Option<DateTime<Utc>>,
    pub jd_text: String,
    pub job_url: String,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub salary_currency: Option<String>,
    pub location: String,
    pub work_type: Option<String>,
    pub notes: String,
    pub ai_suggestions: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<JobRow> for JobApplication {
    type Error = AppError;

    fn try_from(row: JobRow) -> Result<Self, Self::Error> {
        let id = row.id;
        let corrupt = |e: ValidationError| {
            AppError::Internal(anyhow!("job {id} has a corrupt column: {e}"))
        };
        let status = row.status.parse::<JobStatus>().map_err(corrupt)?;
        let priority = row.priority.parse::<Priority>().map_err(corrupt)?;
        let work_type = row
            .work_type
            .as_deref()
            .map(str::parse::<WorkType>)
            .transpose()
            .map_err(corrupt)?;
        let salary = row.salary_currency.map(|currency| Salary {
            min: row.salary_min,
            max: row.salary_max,
            currency,
        });

        Ok(JobApplication {
            id: row.id,
            owner_id: row.owner_id,
            company: row.company,
            role: row.role,
            status,
            priority,
            application_date: row.application_date,
            deadline: row.deadline,
            jd_text: row.jd_text,
            job_url: row.job_url,
            salary,
            location: row.location,
            work_type,
            notes: row.notes,
            ai_suggestions: row.ai_suggestions,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn salary_columns(salary: &Option<Salary>) -> (Option<f64>, Option<f64>, Option<String>) {
    match salary {
        Some(s) => (s.min, s.max, Some(s.currency.clone())),
        None => (None, None, None),
    }
}

pub struct PgJobStore {
    pool: PgPool,
}

impl PgJobStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobStore for PgJobStore {
    async fn insert(&self, job: JobApplication) -> Result<JobApplication, AppError> {
        let (salary_min, salary_max, salary_currency) = salary_columns(&job.salary);
        let row = sqlx::query_as::<_, JobRow>(
            r#"
            INSERT INTO jobs
                (id, owner_id, company, role, status, priority, application_date, deadline,
                 jd_text, job_url, salary_min, salary_max, salary_currency, location,
                 work_type, notes, ai_suggestions, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)
            RETURNING *
            "#,
        )
        .bind(job.id)
        .bind(job.owner_id)
        .bind(&job.company)
        .bind(&job.role)
        .bind(job.status.as_str())
        .bind(job.priority.as_str())
        .bind(job.application_date)
        .bind(job.deadline)
        .bind(&job.jd_text)
        .bind(&job.job_url)
        .bind(salary_min)
        .bind(salary_max)
        .bind(salary_currency)
        .bind(&job.location)
        .bind(job.work_type.map(|w| w.as_str()))
        .bind(&job.notes)
        .bind(&job.ai_suggestions)
        .bind(job.created_at)
        .bind(job.updated_at)
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn list(
        &self,
        owner: UserId,
        query: &ListQuery,
    ) -> Result<Vec<JobApplication>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM jobs WHERE owner_id = ");
        qb.push_bind(owner);
        if let Some(status) = query.status {
            qb.push(" AND status = ").push_bind(status.as_str());
        }
        if let Some(priority) = query.priority {
            qb.push(" AND priority = ").push_bind(priority.as_str());
        }
        if let Some(term) = &query.search {
            let pattern = like_pattern(term);
            qb.push(" AND (company ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR role ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        qb.push(" ORDER BY ").push(query.sort.order_by_sql());

        let rows: Vec<JobRow> = qb.build_query_as().fetch_all(&self.pool).await?;
        debug!("Listed {} jobs for user {owner}", rows.len());

        rows.into_iter().map(JobApplication::try_from).collect()
    }

    async fn get(&self, owner: UserId, id: JobId) -> Result<Option<JobApplication>, AppError> {
        sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await?
            .map(JobApplication::try_from)
            .transpose()
    }

    async fn update(
        &self,
        owner: UserId,
        id: JobId,
        patch: JobPatch,
    ) -> Result<Option<JobApplication>, AppError> {
        let mut tx = self.pool.begin().await?;

        let existing = sqlx::query_as::<_, JobRow>(
            "SELECT * FROM jobs WHERE id = $1 AND owner_id = $2 FOR UPDATE",
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(existing) = existing else {
            return Ok(None);
        };

        let mut job = JobApplication::try_from(existing)?;
        job.apply(patch, Utc::now());
        let (salary_min, salary_max, salary_currency) = salary_columns(&job.salary);

        let row = sqlx::query_as::<_, JobRow>(
            r#"
            UPDATE jobs SET
                company = $3, role = $4, status = $5, priority = $6,
                application_date = $7, deadline = $8, jd_text = $9, job_url = $10,
                salary_min = $11, salary_max = $12, salary_currency = $13,
                location = $14, work_type = $15, notes = $16, updated_at = $17
            WHERE id = $1 AND owner_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(owner)
        .bind(&job.company)
        .bind(&job.role)
        .bind(job.status.as_str())
        .bind(job.priority.as_str())
        .bind(job.application_date)
        .bind(job.deadline)
        .bind(&job.jd_text)
        .bind(&job.job_url)
        .bind(salary_min)
        .bind(salary_max)
        .bind(salary_currency)
        .bind(&job.location)
        .bind(job.work_type.map(|w| w.as_str()))
        .bind(&job.notes)
        .bind(job.updated_at)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        row.try_into().map(Some)
    }

    async fn delete(&self, owner: UserId, id: JobId) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn status_counts(&self, owner: UserId) -> Result<Vec<(JobStatus, u64)>, AppError> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            "SELECT status, COUNT(*) FROM jobs WHERE owner_id = $1 GROUP BY status",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|(status, count)| {
                let status = status
                    .parse::<JobStatus>()
                    .map_err(|e| AppError::Internal(anyhow!("unexpected status in jobs: {e}")))?;
                Ok((status, u64::try_from(count).unwrap_or(0)))
            })
            .collect()
    }

    async fn set_ai_suggestions(
        &self,
        owner: UserId,
        id: JobId,
        suggestions: &str,
    ) -> Result<Option<JobApplication>, AppError> {
        sqlx::query_as::<_, JobRow>(
            r#"
            UPDATE jobs SET ai_suggestions = $3, updated_at = now()
            WHERE id = $1 AND owner_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(owner)
        .bind(suggestions)
        .fetch_optional(&self.pool)
        .await?
        .map(JobApplication::try_from)
        .transpose()
    }
}
