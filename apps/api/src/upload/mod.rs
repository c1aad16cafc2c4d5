// PRD upload: blob storage, text extraction, and the generation trigger.

pub mod extract;
pub mod handlers;

use bytes::Bytes;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::RequestContext;
use crate::blob::object_key;
use crate::errors::AppError;
use crate::jobs::GenerationJob;
use crate::models::PrdAttachment;
use crate::projects::require_owned_project;
use crate::state::AppState;
use crate::upload::extract::{extract_text, DocumentKind};

/// A file received from the client.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub url: String,
    pub filename: String,
    pub extracted_text: Option<String>,
}

/// Stores an upload, extracts its text, and optionally attaches it to a project.
///
/// When attached and text was extracted, a generation job is queued. Queueing
/// failures are logged only; the upload itself has already succeeded.
pub async fn process_upload(
    state: &AppState,
    ctx: &RequestContext,
    file: UploadedFile,
    project_id: Option<Uuid>,
) -> Result<UploadResponse, AppError> {
    if let Some(project_id) = project_id {
        require_owned_project(state.store.as_ref(), ctx, project_id).await?;
    }

    let kind = DocumentKind::detect(&file.file_name, file.content_type.as_deref());
    info!(
        "Upload received: name={}, kind={:?}, size={} bytes",
        file.file_name,
        kind,
        file.data.len()
    );

    let content_type = file
        .content_type
        .as_deref()
        .unwrap_or_else(|| kind.content_type());
    let url = state
        .blobs
        .put(&object_key(&file.file_name), file.data.clone(), content_type)
        .await?;

    let extracted_text = extract_text(kind, file.data).await;

    if let Some(project_id) = project_id {
        let attachment = PrdAttachment {
            prd_content: extracted_text.clone(),
            prd_file_name: Some(file.file_name.clone()),
            prd_file_url: Some(url.clone()),
            prd_extracted_text: extracted_text.clone(),
        };
        state
            .store
            .attach_prd(project_id, ctx.user_id, attachment)
            .await?
            .ok_or_else(|| AppError::NotFound("Project not found".to_string()))?;

        if extracted_text.is_some() {
            let job = GenerationJob::new(project_id, ctx.user_id);
            match state.jobs.enqueue(job).await {
                Ok(()) => info!("Queued tailoring generation for project {project_id}"),
                Err(e) => warn!("Failed to queue generation for project {project_id}: {e}"),
            }
        }
    }

    Ok(UploadResponse {
        url,
        filename: file.file_name,
        extracted_text,
    })
}
