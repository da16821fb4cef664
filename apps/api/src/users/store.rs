use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::errors::AppError;
use crate::models::user::{Preferences, ProfilePatch, UserId, UserProfile};

/// Profile storage. Account creation belongs to the auth service.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get(&self, id: UserId) -> Result<Option<UserProfile>, AppError>;

    /// Merges a validated patch into the profile.
    async fn update_profile(
        &self,
        id: UserId,
        patch: ProfilePatch,
    ) -> Result<Option<UserProfile>, AppError>;
}

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub resume: String,
    pub email_reminders: bool,
    pub reminder_days: i16,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserRow> for UserProfile {
    fn from(row: UserRow) -> Self {
        UserProfile {
            id: row.id,
            email: row.email,
            name: row.name,
            resume: row.resume,
            preferences: Preferences {
                email_reminders: row.email_reminders,
                reminder_days: row.reminder_days,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn get(&self, id: UserId) -> Result<Option<UserProfile>, AppError> {
        Ok(
            sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?
                .map(UserProfile::from),
        )
    }

    async fn update_profile(
        &self,
        id: UserId,
        patch: ProfilePatch,
    ) -> Result<Option<UserProfile>, AppError> {
        let mut tx = self.pool.begin().await?;

        let existing =
            sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(existing) = existing else {
            return Ok(None);
        };

        let mut profile = UserProfile::from(existing);
        profile.apply(patch, Utc::now());

        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users SET
                name = $2, resume = $3, email_reminders = $4, reminder_days = $5, updated_at = $6
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&profile.name)
        .bind(&profile.resume)
        .bind(profile.preferences.email_reminders)
        .bind(profile.preferences.reminder_days)
        .bind(profile.updated_at)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(row.into()))
    }
}
