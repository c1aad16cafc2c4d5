// Stakeholders of a project: who receives a tailored PRD.

pub mod handlers;

use tracing::info;
use uuid::Uuid;

use crate::auth::RequestContext;
use crate::errors::AppError;
use crate::models::{NewStakeholder, StakeholderRow, StakeholderUpdate};
use crate::projects::require_owned_project;
use crate::store::Store;

/// Loads a stakeholder whose project the caller owns.
pub async fn require_owned_stakeholder(
    store: &dyn Store,
    ctx: &RequestContext,
    stakeholder_id: Uuid,
) -> Result<StakeholderRow, AppError> {
    let stakeholder = store
        .get_stakeholder(stakeholder_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Stakeholder not found".to_string()))?;
    require_owned_project(store, ctx, stakeholder.project_id).await?;
    Ok(stakeholder)
}

/// Adds a batch of stakeholders. The whole batch is validated first.
pub async fn add_stakeholders(
    store: &dyn Store,
    ctx: &RequestContext,
    project_id: Uuid,
    stakeholders: Vec<NewStakeholder>,
) -> Result<Vec<StakeholderRow>, AppError> {
    require_owned_project(store, ctx, project_id).await?;
    if stakeholders.is_empty() {
        return Err(AppError::Validation(
            "At least one stakeholder is required".to_string(),
        ));
    }
    for stakeholder in &stakeholders {
        stakeholder.validate().map_err(AppError::Validation)?;
    }

    let rows = store.create_stakeholders(project_id, &stakeholders).await?;
    info!("Added {} stakeholders to project {project_id}", rows.len());
    Ok(rows)
}

/// Inline edit of tailored content and explicit review status changes.
pub async fn update_stakeholder(
    store: &dyn Store,
    ctx: &RequestContext,
    stakeholder_id: Uuid,
    update: StakeholderUpdate,
) -> Result<StakeholderRow, AppError> {
    require_owned_stakeholder(store, ctx, stakeholder_id).await?;
    store
        .update_stakeholder(stakeholder_id, update)
        .await?
        .ok_or_else(|| AppError::NotFound("Stakeholder not found".to_string()))
}

pub async fn remove_stakeholder(
    store: &dyn Store,
    ctx: &RequestContext,
    stakeholder_id: Uuid,
) -> Result<(), AppError> {
    require_owned_stakeholder(store, ctx, stakeholder_id).await?;
    if !store.delete_stakeholder(stakeholder_id).await? {
        return Err(AppError::NotFound("Stakeholder not found".to_string()));
    }
    Ok(())
}
