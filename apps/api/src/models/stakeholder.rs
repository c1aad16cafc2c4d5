use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Roles offered when adding a stakeholder. Role stays free text; this is the suggestion list.
pub const STAKEHOLDER_ROLES: &[&str] = &[
    "UI/UX Designer",
    "Frontend Engineer",
    "Backend Engineer",
    "Data Scientist",
    "Product Marketing",
    "QA Engineer",
];

/// Review progress of a stakeholder's tailored document.
/// Transitions happen only on explicit caller actions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    #[default]
    Pending,
    InProgress,
    Resolved,
}

impl ReviewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewStatus::Pending => "pending",
            ReviewStatus::InProgress => "in_progress",
            ReviewStatus::Resolved => "resolved",
        }
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReviewStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ReviewStatus::Pending),
            "in_progress" => Ok(ReviewStatus::InProgress),
            "resolved" => Ok(ReviewStatus::Resolved),
            other => Err(format!("unknown review status '{other}'")),
        }
    }
}

impl TryFrom<String> for ReviewStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StakeholderRow {
    pub id: Uuid,
    pub project_id: Uuid,
    pub user_id: Option<Uuid>,
    pub name: String,
    pub email: String,
    pub role: String,
    pub tailored_content: Option<String>,
    #[sqlx(try_from = "String")]
    pub review_status: ReviewStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewStakeholder {
    pub name: String,
    pub email: String,
    pub role: String,
}

impl NewStakeholder {
    /// Every field is required; the email must at least look like one.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Stakeholder name is required".to_string());
        }
        if self.role.trim().is_empty() {
            return Err("Stakeholder role is required".to_string());
        }
        let email = self.email.trim();
        if email.is_empty() {
            return Err("Stakeholder email is required".to_string());
        }
        if !email.contains('@') {
            return Err(format!("'{email}' is not a valid email address"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StakeholderUpdate {
    pub tailored_content: Option<String>,
    pub review_status: Option<ReviewStatus>,
}
