//! Axum route handlers for tailoring and review.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::RequestContext;
use crate::errors::AppError;
use crate::state::AppState;
use crate::tailoring::generator::{tailor_project, TailoringReport};
use crate::tailoring::review::{
    draft_reviews, send_reviews, DraftRequest, ReviewDraft, SendReviewRequest, SendReviewResponse,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateTailoredRequest {
    pub project_id: Option<Uuid>,
}

/// POST /api/generate-tailored-prd
///
/// Runs one generation pass over every stakeholder of the project and
/// returns a per-stakeholder result list.
pub async fn handle_generate_tailored(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(request): Json<GenerateTailoredRequest>,
) -> Result<Json<TailoringReport>, AppError> {
    let project_id = request
        .project_id
        .ok_or_else(|| AppError::Validation("Project ID is required".to_string()))?;

    let report = tailor_project(state.store.as_ref(), state.llm.as_ref(), &ctx, project_id).await?;
    Ok(Json(report))
}

/// POST /api/projects/:id/review/drafts
pub async fn handle_review_drafts(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(project_id): Path<Uuid>,
    Json(request): Json<DraftRequest>,
) -> Result<Json<Vec<ReviewDraft>>, AppError> {
    let drafts = draft_reviews(
        state.store.as_ref(),
        state.llm.as_ref(),
        &ctx,
        project_id,
        request.stakeholder_ids.as_deref(),
    )
    .await?;
    Ok(Json(drafts))
}

/// POST /api/projects/:id/review/send
pub async fn handle_review_send(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(project_id): Path<Uuid>,
    Json(request): Json<SendReviewRequest>,
) -> Result<Json<SendReviewResponse>, AppError> {
    let response = send_reviews(state.store.as_ref(), &ctx, project_id, request.drafts).await?;
    Ok(Json(response))
}
