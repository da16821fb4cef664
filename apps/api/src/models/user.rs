use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::validation::ValidationError;

pub type UserId = Uuid;

const NAME_MIN: usize = 2;
const NAME_MAX: usize = 100;
const REMINDER_DAYS_MIN: i16 = 1;
const REMINDER_DAYS_MAX: i16 = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub email_reminders: bool,
    pub reminder_days: i16,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            email_reminders: false,
            reminder_days: 3,
        }
    }
}

/// The caller's profile. Credentials live with the external auth service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub resume: String,
    pub preferences: Preferences,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesPatch {
    #[serde(default)]
    pub email_reminders: Option<bool>,
    #[serde(default)]
    pub reminder_days: Option<i16>,
}

/// Body of `PUT /api/user/profile`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub resume: Option<String>,
    #[serde(default)]
    pub preferences: Option<PreferencesPatch>,
}

impl ProfilePatch {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            let len = name.trim().chars().count();
            if !(NAME_MIN..=NAME_MAX).contains(&len) {
                return Err(ValidationError::Length {
                    field: "name",
                    min: NAME_MIN,
                    max: NAME_MAX,
                });
            }
        }
        if let Some(days) = self.preferences.as_ref().and_then(|p| p.reminder_days) {
            if !(REMINDER_DAYS_MIN..=REMINDER_DAYS_MAX).contains(&days) {
                return Err(ValidationError::OutOfRange {
                    field: "reminderDays",
                    min: REMINDER_DAYS_MIN.into(),
                    max: REMINDER_DAYS_MAX.into(),
                });
            }
        }
        Ok(())
    }
}

impl UserProfile {
    pub fn apply(&mut self, patch: ProfilePatch, now: DateTime<Utc>) {
        if let Some(name) = patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(resume) = patch.resume {
            self.resume = resume;
        }
        if let Some(prefs) = patch.preferences {
            if let Some(on) = prefs.email_reminders {
                self.preferences.email_reminders = on;
            }
            if let Some(days) = prefs.reminder_days {
                self.preferences.reminder_days = days;
            }
        }
        self.updated_at = now;
    }
}
