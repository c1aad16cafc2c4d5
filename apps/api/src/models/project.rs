use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Prefix of a PRD stored inline as a base64 PDF data URL.
pub const PDF_DATA_URL_PREFIX: &str = "data:application/pdf;base64,";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRow {
    pub id: Uuid,
    pub name: String,
    pub prd_content: Option<String>,
    pub prd_file_name: Option<String>,
    pub prd_file_url: Option<String>,
    pub prd_extracted_text: Option<String>,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProjectRow {
    /// Text the tailoring prompts are built from.
    ///
    /// Extracted text wins over raw content. Raw content that is a `data:` URL
    /// (an inline PDF) is not text and is skipped.
    pub fn best_available_text(&self) -> Option<&str> {
        let extracted = self
            .prd_extracted_text
            .as_deref()
            .filter(|t| !t.trim().is_empty());
        extracted.or_else(|| {
            self.prd_content
                .as_deref()
                .filter(|c| !c.trim().is_empty() && !c.starts_with("data:"))
        })
    }

    pub fn is_pdf_file(&self) -> bool {
        self.prd_file_name
            .as_deref()
            .is_some_and(|n| n.to_lowercase().ends_with(".pdf"))
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewProject {
    pub name: String,
    pub prd_content: Option<String>,
    pub prd_file_name: Option<String>,
}

/// Partial update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectUpdate {
    pub name: Option<String>,
    pub prd_content: Option<String>,
    pub prd_file_name: Option<String>,
}

/// PRD fields written when a document is attached to a project.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrdAttachment {
    pub prd_content: Option<String>,
    pub prd_file_name: Option<String>,
    pub prd_file_url: Option<String>,
    pub prd_extracted_text: Option<String>,
}
