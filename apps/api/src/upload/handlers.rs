//! Axum route handler for PRD uploads.

use axum::{
    extract::{Multipart, State},
    Json,
};
use uuid::Uuid;

use crate::auth::RequestContext;
use crate::errors::AppError;
use crate::state::AppState;
use crate::upload::{process_upload, UploadResponse, UploadedFile};

/// POST /api/upload-prd
///
/// Multipart form: `file` (required), `projectId` (optional).
pub async fn handle_upload_prd(
    State(state): State<AppState>,
    ctx: RequestContext,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut file: Option<UploadedFile> = None;
    let mut project_id: Option<Uuid> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let file_name = field.file_name().unwrap_or("document").to_string();
                let content_type = field.content_type().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read file: {e}")))?;
                file = Some(UploadedFile {
                    file_name,
                    content_type,
                    data,
                });
            }
            Some("projectId") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid projectId: {e}")))?;
                let text = text.trim();
                if !text.is_empty() {
                    project_id = Some(text.parse().map_err(|_| {
                        AppError::Validation(format!("projectId '{text}' is not a valid id"))
                    })?);
                }
            }
            _ => {}
        }
    }

    let file = file.ok_or_else(|| AppError::Validation("No file provided".to_string()))?;
    let response = process_upload(&state, &ctx, file, project_id).await?;
    Ok(Json(response))
}
