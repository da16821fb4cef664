//! List filters and sort keys for `GET /api/jobs`.

use std::str::FromStr;

use serde::Deserialize;

use crate::models::job::{JobStatus, Priority, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    ApplicationDate,
    CreatedAt,
    UpdatedAt,
    Deadline,
    Company,
    Role,
}

/// A field plus direction, written `field` or `-field` (descending).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub field: SortField,
    pub descending: bool,
}

impl Default for SortKey {
    /// Most recent application first.
    fn default() -> Self {
        Self {
            field: SortField::ApplicationDate,
            descending: true,
        }
    }
}

impl FromStr for SortKey {
    type Err = ValidationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (descending, name) = match raw.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, raw),
        };
        let field = match name {
            "applicationDate" => SortField::ApplicationDate,
            "createdAt" => SortField::CreatedAt,
            "updatedAt" => SortField::UpdatedAt,
            "deadline" => SortField::Deadline,
            "company" => SortField::Company,
            "role" => SortField::Role,
            _ => {
                return Err(ValidationError::InvalidValue {
                    field: "sort",
                    value: raw.to_string(),
                })
            }
        };
        Ok(SortKey { field, descending })
    }
}

impl SortKey {
    /// ORDER BY clause for the jobs table. Built only from fixed column
    /// names, never from request text. Missing deadlines sort last and ties
    /// break on id so repeated reads are stable.
    pub fn order_by_sql(&self) -> String {
        let column = match self.field {
            SortField::ApplicationDate => "application_date",
            SortField::CreatedAt => "created_at",
            SortField::UpdatedAt => "updated_at",
            SortField::Deadline => "deadline",
            SortField::Company => "lower(company)",
            SortField::Role => "lower(role)",
        };
        let direction = if self.descending { "DESC" } else { "ASC" };
        format!("{column} {direction} NULLS LAST, id ASC")
    }
}

/// Raw query string. Empty values mean "no filter".
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub status: Option<String>,
    pub priority: Option<String>,
    pub search: Option<String>,
    pub sort: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListQuery {
    pub status: Option<JobStatus>,
    pub priority: Option<Priority>,
    /// Case-insensitive substring of company or role.
    pub search: Option<String>,
    pub sort: SortKey,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl ListParams {
    pub fn into_query(self) -> Result<ListQuery, ValidationError> {
        Ok(ListQuery {
            status: non_empty(self.status).map(|s| s.parse()).transpose()?,
            priority: non_empty(self.priority).map(|p| p.parse()).transpose()?,
            search: non_empty(self.search),
            sort: non_empty(self.sort)
                .map(|s| s.parse::<SortKey>())
                .transpose()?
                .unwrap_or_default(),
        })
    }
}

/// Escapes `%`, `_` and `\` so a search term matches literally under ILIKE.
pub fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}
