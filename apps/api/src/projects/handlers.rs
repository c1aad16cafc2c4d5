//! Axum route handlers for projects.

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::auth::RequestContext;
use crate::errors::AppError;
use crate::models::{PrdAttachment, ProjectRow, ProjectUpdate};
use crate::projects::document::{document_html, document_view};
use crate::projects::{
    create_project, decode_pdf_data_url, project_detail, require_owned_project,
    CreateProjectRequest, ProjectDetail,
};
use crate::state::AppState;

/// GET /api/projects
pub async fn handle_list_projects(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<Json<Vec<ProjectRow>>, AppError> {
    let projects = state.store.list_projects(ctx.user_id).await?;
    Ok(Json(projects))
}

/// POST /api/projects
pub async fn handle_create_project(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(request): Json<CreateProjectRequest>,
) -> Result<(StatusCode, Json<ProjectDetail>), AppError> {
    let detail = create_project(state.store.as_ref(), &ctx, request).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

/// GET /api/projects/:id
pub async fn handle_get_project(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(project_id): Path<Uuid>,
) -> Result<Json<ProjectDetail>, AppError> {
    let detail = project_detail(state.store.as_ref(), &ctx, project_id).await?;
    Ok(Json(detail))
}

/// PATCH /api/projects/:id
pub async fn handle_update_project(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(project_id): Path<Uuid>,
    Json(mut update): Json<ProjectUpdate>,
) -> Result<Json<ProjectRow>, AppError> {
    if let Some(name) = update.name.as_deref() {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("Project name is required".to_string()));
        }
        update.name = Some(name.to_string());
    }

    require_owned_project(state.store.as_ref(), &ctx, project_id).await?;
    let project = state
        .store
        .update_project(project_id, ctx.user_id, update)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".to_string()))?;
    Ok(Json(project))
}

/// DELETE /api/projects/:id
pub async fn handle_delete_project(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(project_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    require_owned_project(state.store.as_ref(), &ctx, project_id).await?;
    if !state.store.delete_project(project_id, ctx.user_id).await? {
        return Err(AppError::NotFound("Project not found".to_string()));
    }
    info!("Deleted project {project_id}");
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/projects/:id/prd
///
/// Attaches a PRD that was pasted in or uploaded separately.
pub async fn handle_attach_prd(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(project_id): Path<Uuid>,
    Json(attachment): Json<PrdAttachment>,
) -> Result<Json<ProjectRow>, AppError> {
    require_owned_project(state.store.as_ref(), &ctx, project_id).await?;
    let project = state
        .store
        .attach_prd(project_id, ctx.user_id, attachment)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".to_string()))?;
    Ok(Json(project))
}

/// GET /api/projects/:id/prd
///
/// Serves a PRD stored inline as a PDF data URL as raw PDF bytes.
pub async fn handle_get_prd_pdf(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(project_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let project = require_owned_project(state.store.as_ref(), &ctx, project_id).await?;
    let pdf = project
        .prd_content
        .as_deref()
        .and_then(decode_pdf_data_url)
        .ok_or_else(|| AppError::NotFound("PDF not found".to_string()))?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf"),
            (header::CONTENT_DISPOSITION, "inline"),
            (header::CACHE_CONTROL, "public, max-age=3600"),
        ],
        pdf,
    )
        .into_response())
}

#[derive(Debug, Default, Deserialize)]
pub struct DocumentQuery {
    pub format: Option<String>,
}

/// GET /api/projects/:id/document
///
/// JSON view by default; `?format=html` returns the rendered PRD text.
pub async fn handle_get_document(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(project_id): Path<Uuid>,
    Query(query): Query<DocumentQuery>,
) -> Result<Response, AppError> {
    let project = require_owned_project(state.store.as_ref(), &ctx, project_id).await?;

    match query.format.as_deref() {
        Some("html") => {
            let html = document_html(&project)
                .ok_or_else(|| AppError::NotFound("No PRD content available".to_string()))?;
            Ok(Html(html).into_response())
        }
        None | Some("json") => Ok(Json(document_view(&project)).into_response()),
        Some(other) => Err(AppError::Validation(format!(
            "Unsupported document format '{other}'"
        ))),
    }
}
