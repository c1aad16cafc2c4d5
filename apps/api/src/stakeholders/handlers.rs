//! Axum route handlers for stakeholders.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::auth::RequestContext;
use crate::errors::AppError;
use crate::models::{NewStakeholder, StakeholderRow, StakeholderUpdate, STAKEHOLDER_ROLES};
use crate::projects::require_owned_project;
use crate::stakeholders::{add_stakeholders, remove_stakeholder, update_stakeholder};
use crate::state::AppState;

/// GET /api/projects/:id/stakeholders
pub async fn handle_list_stakeholders(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(project_id): Path<Uuid>,
) -> Result<Json<Vec<StakeholderRow>>, AppError> {
    require_owned_project(state.store.as_ref(), &ctx, project_id).await?;
    let stakeholders = state.store.list_stakeholders(project_id).await?;
    Ok(Json(stakeholders))
}

/// POST /api/projects/:id/stakeholders
pub async fn handle_add_stakeholders(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(project_id): Path<Uuid>,
    Json(stakeholders): Json<Vec<NewStakeholder>>,
) -> Result<(StatusCode, Json<Vec<StakeholderRow>>), AppError> {
    let rows = add_stakeholders(state.store.as_ref(), &ctx, project_id, stakeholders).await?;
    Ok((StatusCode::CREATED, Json(rows)))
}

/// PATCH /api/stakeholders/:id
pub async fn handle_update_stakeholder(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(stakeholder_id): Path<Uuid>,
    Json(update): Json<StakeholderUpdate>,
) -> Result<Json<StakeholderRow>, AppError> {
    let row = update_stakeholder(state.store.as_ref(), &ctx, stakeholder_id, update).await?;
    Ok(Json(row))
}

/// DELETE /api/stakeholders/:id
pub async fn handle_delete_stakeholder(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(stakeholder_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    remove_stakeholder(state.store.as_ref(), &ctx, stakeholder_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/stakeholder-roles
pub async fn handle_stakeholder_roles() -> Json<&'static [&'static str]> {
    Json(STAKEHOLDER_ROLES)
}
