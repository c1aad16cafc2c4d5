//! What the document viewer shows for a project's PRD.
//!
//! Text wins: when the project has PRD text it is parsed and shown as
//! markdown. Otherwise a PDF file is embedded, any other file is offered for
//! download, and a project with nothing attached is empty.

use serde::Serialize;

use crate::markdown::{self, Block};
use crate::models::{ProjectRow, PDF_DATA_URL_PREFIX};

const NO_FILE_LABEL: &str = "No PRD uploaded";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DocumentBody {
    Markdown { blocks: Vec<Block> },
    PdfEmbed { url: String },
    DownloadOnly { url: String },
    Empty,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentView {
    pub display_name: String,
    pub file_url: Option<String>,
    #[serde(flatten)]
    pub body: DocumentBody,
}

/// URL a PDF can be fetched from: the uploaded object, or the inline-PDF route.
fn pdf_url(project: &ProjectRow) -> Option<String> {
    if let Some(url) = project.prd_file_url.as_deref().filter(|u| !u.is_empty()) {
        return Some(url.to_string());
    }
    project
        .prd_content
        .as_deref()
        .filter(|c| c.starts_with(PDF_DATA_URL_PREFIX))
        .map(|_| format!("/api/projects/{}/prd", project.id))
}

pub fn document_view(project: &ProjectRow) -> DocumentView {
    let body = match (project.best_available_text(), pdf_url(project)) {
        (Some(text), _) => DocumentBody::Markdown {
            blocks: markdown::parse(text),
        },
        (None, Some(url)) if project.is_pdf_file() => DocumentBody::PdfEmbed { url },
        (None, Some(url)) => DocumentBody::DownloadOnly { url },
        (None, None) => DocumentBody::Empty,
    };

    DocumentView {
        display_name: project
            .prd_file_name
            .clone()
            .unwrap_or_else(|| NO_FILE_LABEL.to_string()),
        file_url: project.prd_file_url.clone(),
        body,
    }
}

/// HTML rendering of the PRD text, if the project has any.
pub fn document_html(project: &ProjectRow) -> Option<String> {
    project
        .best_available_text()
        .map(|text| markdown::to_html(&markdown::parse(text)))
}
