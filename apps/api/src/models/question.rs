use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionStatus {
    #[default]
    Unresolved,
    Resolved,
}

impl QuestionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionStatus::Unresolved => "unresolved",
            QuestionStatus::Resolved => "resolved",
        }
    }
}

impl fmt::Display for QuestionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unresolved" => Ok(QuestionStatus::Unresolved),
            "resolved" => Ok(QuestionStatus::Resolved),
            other => Err(format!("unknown question status '{other}'")),
        }
    }
}

impl TryFrom<String> for QuestionStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRow {
    pub id: Uuid,
    pub project_id: Uuid,
    pub stakeholder_id: Uuid,
    pub question_text: String,
    #[sqlx(try_from = "String")]
    pub status: QuestionStatus,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRow {
    pub id: Uuid,
    pub question_id: Uuid,
    pub answer_text: String,
    pub is_ai_generated: bool,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewQuestion {
    pub project_id: Uuid,
    pub stakeholder_id: Uuid,
    pub question_text: String,
}

#[derive(Debug, Clone)]
pub struct NewAnswer {
    pub question_id: Uuid,
    pub answer_text: String,
    pub is_ai_generated: bool,
    pub created_by: Option<Uuid>,
}
