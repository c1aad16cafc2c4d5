//! Best-effort text extraction from uploaded PRD files.
//!
//! Never fails: anything that can't be read as text yields `None`.

use bytes::Bytes;
use tracing::{info, warn};

/// What kind of document an upload is, judged by content type and file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    PlainText,
    Other,
}

impl DocumentKind {
    pub fn detect(file_name: &str, content_type: Option<&str>) -> Self {
        let name = file_name.to_lowercase();
        let content_type = content_type.unwrap_or_default().to_lowercase();

        if content_type == "application/pdf" || name.ends_with(".pdf") {
            DocumentKind::Pdf
        } else if content_type.starts_with("text/")
            || [".txt", ".md", ".markdown"].iter().any(|ext| name.ends_with(ext))
        {
            DocumentKind::PlainText
        } else {
            DocumentKind::Other
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => "application/pdf",
            DocumentKind::PlainText => "text/plain; charset=utf-8",
            DocumentKind::Other => "application/octet-stream",
        }
    }
}

/// Extracts text from an uploaded file. Blank results are `None`.
pub async fn extract_text(kind: DocumentKind, data: Bytes) -> Option<String> {
    let text = match kind {
        DocumentKind::Pdf => extract_pdf_text(data).await,
        DocumentKind::PlainText => match String::from_utf8(data.to_vec()) {
            Ok(text) => Some(text),
            Err(e) => {
                warn!("Uploaded text file is not valid UTF-8: {e}");
                None
            }
        },
        DocumentKind::Other => None,
    };
    text.filter(|t| !t.trim().is_empty())
}

/// PDF parsing is CPU-bound and the parser can panic on malformed input, so it
/// runs on the blocking pool where a panic surfaces as a `JoinError`.
async fn extract_pdf_text(data: Bytes) -> Option<String> {
    let len = data.len();
    match tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&data)).await {
        Ok(Ok(text)) => {
            info!("Extracted {} chars of text from {len}-byte PDF", text.len());
            Some(text)
        }
        Ok(Err(e)) => {
            warn!("PDF text extraction failed: {e}");
            None
        }
        Err(e) => {
            warn!("PDF text extraction aborted: {e}");
            None
        }
    }
}
