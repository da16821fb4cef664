use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::user::UserId;
use crate::models::validation::{
    deserialize_amount, deserialize_nullable_timestamp, deserialize_optional_timestamp,
    deserialize_some, require_text,
};

pub use crate::models::validation::ValidationError;

pub type JobId = Uuid;

pub const DEFAULT_CURRENCY: &str = "USD";

// ────────────────────────────────────────────────────────────────────────────
// Closed enums
// ────────────────────────────────────────────────────────────────────────────

/// Where an application stands. Any status may be set from any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum JobStatus {
    #[default]
    Applied,
    #[serde(rename = "Interview Scheduled")]
    InterviewScheduled,
    #[serde(rename = "Interview Completed")]
    InterviewCompleted,
    Rejected,
    #[serde(rename = "Offer Received")]
    OfferReceived,
    Accepted,
}

impl JobStatus {
    pub const ALL: [JobStatus; 6] = [
        JobStatus::Applied,
        JobStatus::InterviewScheduled,
        JobStatus::InterviewCompleted,
        JobStatus::Rejected,
        JobStatus::OfferReceived,
        JobStatus::Accepted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Applied => "Applied",
            JobStatus::InterviewScheduled => "Interview Scheduled",
            JobStatus::InterviewCompleted => "Interview Completed",
            JobStatus::Rejected => "Rejected",
            JobStatus::OfferReceived => "Offer Received",
            JobStatus::Accepted => "Accepted",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkType {
    Remote,
    #[serde(rename = "On-site")]
    OnSite,
    Hybrid,
}

impl WorkType {
    pub const ALL: [WorkType; 3] = [WorkType::Remote, WorkType::OnSite, WorkType::Hybrid];

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkType::Remote => "Remote",
            WorkType::OnSite => "On-site",
            WorkType::Hybrid => "Hybrid",
        }
    }
}

macro_rules! label_conversions {
    ($ty:ty, $field:literal) => {
        impl FromStr for $ty {
            type Err = ValidationError;

            fn from_str(raw: &str) -> Result<Self, Self::Err> {
                <$ty>::ALL
                    .into_iter()
                    .find(|v| v.as_str() == raw)
                    .ok_or_else(|| ValidationError::InvalidValue {
                        field: $field,
                        value: raw.to_string(),
                    })
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

label_conversions!(JobStatus, "status");
label_conversions!(Priority, "priority");
label_conversions!(WorkType, "workType");

// ────────────────────────────────────────────────────────────────────────────
// Salary
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Salary {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub currency: String,
}

/// Salary block as submitted; currency falls back to USD.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SalaryInput {
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub min: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub max: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
}

impl SalaryInput {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let negative = |v: Option<f64>| v.is_some_and(|n| n < 0.0 || !n.is_finite());
        if negative(self.min) || negative(self.max) {
            return Err(ValidationError::NegativeSalary);
        }
        if let (Some(min), Some(max)) = (self.min, self.max) {
            if min > max {
                return Err(ValidationError::SalaryRange);
            }
        }
        Ok(())
    }

    pub fn into_salary(self) -> Salary {
        let currency = self
            .currency
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());
        Salary {
            min: self.min,
            max: self.max,
            currency,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// The record
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobApplication {
    pub id: JobId,
    pub owner_id: UserId,
    pub company: String,
    pub role: String,
    pub status: JobStatus,
    pub priority: Priority,
    pub application_date: DateTime<Utc>,
    pub deadline: Option<DateTime<Utc>>,
    pub jd_text: String,
    pub job_url: String,
    pub salary: Option<Salary>,
    pub location: String,
    pub work_type: Option<WorkType>,
    pub notes: String,
    pub ai_suggestions: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /api/jobs`. Unknown keys, `ownerId` included, are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJob {
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub status: Option<JobStatus>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub application_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub deadline: Option<DateTime<Utc>>,
    #[serde(default)]
    pub jd_text: Option<String>,
    #[serde(default)]
    pub job_url: Option<String>,
    #[serde(default)]
    pub salary: Option<SalaryInput>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub work_type: Option<WorkType>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewJob {
    /// Validates the submission and builds the record to persist.
    /// The owner always comes from the caller, never from the body.
    pub fn into_record(
        self,
        owner_id: UserId,
        now: DateTime<Utc>,
    ) -> Result<JobApplication, ValidationError> {
        let company = require_text("company", &self.company)?;
        let role = require_text("role", &self.role)?;
        if let Some(salary) = &self.salary {
            salary.validate()?;
        }

        Ok(JobApplication {
            id: Uuid::new_v4(),
            owner_id,
            company,
            role,
            status: self.status.unwrap_or_default(),
            priority: self.priority.unwrap_or_default(),
            application_date: self.application_date.unwrap_or(now),
            deadline: self.deadline,
            jd_text: self.jd_text.unwrap_or_default(),
            job_url: self.job_url.unwrap_or_default(),
            salary: self.salary.map(SalaryInput::into_salary),
            location: self.location.unwrap_or_default(),
            work_type: self.work_type,
            notes: self.notes.unwrap_or_default(),
            ai_suggestions: String::new(),
            created_at: now,
            updated_at: now,
        })
    }
}

/// Body of `PUT /api/jobs/:id`. `None` means "leave untouched"; for the
/// nullable fields `Some(None)` clears the stored value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPatch {
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub status: Option<JobStatus>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub application_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_nullable_timestamp")]
    pub deadline: Option<Option<DateTime<Utc>>>,
    #[serde(default)]
    pub jd_text: Option<String>,
    #[serde(default)]
    pub job_url: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub salary: Option<Option<SalaryInput>>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub work_type: Option<Option<WorkType>>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl JobPatch {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(company) = &self.company {
            require_text("company", company)?;
        }
        if let Some(role) = &self.role {
            require_text("role", role)?;
        }
        if let Some(Some(salary)) = &self.salary {
            salary.validate()?;
        }
        Ok(())
    }
}

impl JobApplication {
    /// Merges the supplied patch fields into the record and stamps `updated_at`.
    /// The patch must have passed [`JobPatch::validate`].
    pub fn apply(&mut self, patch: JobPatch, now: DateTime<Utc>) {
        let JobPatch {
            company,
            role,
            status,
            priority,
            application_date,
            deadline,
            jd_text,
            job_url,
            salary,
            location,
            work_type,
            notes,
        } = patch;

        if let Some(company) = company {
            self.company = company.trim().to_string();
        }
        if let Some(role) = role {
            self.role = role.trim().to_string();
        }
        if let Some(status) = status {
            self.status = status;
        }
        if let Some(priority) = priority {
            self.priority = priority;
        }
        if let Some(application_date) = application_date {
            self.application_date = application_date;
        }
        if let Some(deadline) = deadline {
            self.deadline = deadline;
        }
        if let Some(jd_text) = jd_text {
            self.jd_text = jd_text;
        }
        if let Some(job_url) = job_url {
            self.job_url = job_url;
        }
        if let Some(salary) = salary {
            self.salary = salary.map(SalaryInput::into_salary);
        }
        if let Some(location) = location {
            self.location = location;
        }
        if let Some(work_type) = work_type {
            self.work_type = work_type;
        }
        if let Some(notes) = notes {
            self.notes = notes;
        }
        self.updated_at = now;
    }
}
