//! Review workflow: draft, edit, send.
//!
//! Drafts are generated without touching storage so the PM can edit them.
//! Sending persists each draft and moves that stakeholder to `in_progress`.
//! Sends are not transactional: each stakeholder is written on its own and
//! the response says which writes landed.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::RequestContext;
use crate::errors::AppError;
use crate::llm_client::TextGenerator;
use crate::models::{ReviewStatus, StakeholderUpdate};
use crate::projects::require_owned_project;
use crate::store::Store;
use crate::tailoring::generator::{
    generate_tailored_content, require_prd_text, require_stakeholders, StakeholderResult,
};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftRequest {
    /// Stakeholders to draft for; all of the project's stakeholders when absent.
    #[serde(default)]
    pub stakeholder_ids: Option<Vec<Uuid>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDraft {
    pub stakeholder_id: Uuid,
    pub name: String,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendDraft {
    pub stakeholder_id: Uuid,
    pub tailored_content: String,
}

#[derive(Debug, Deserialize)]
pub struct SendReviewRequest {
    pub drafts: Vec<SendDraft>,
}

#[derive(Debug, Serialize)]
pub struct SendReviewResponse {
    pub sent: usize,
    pub results: Vec<StakeholderResult>,
}

/// Generates drafts for the selected stakeholders, one at a time, without persisting.
pub async fn draft_reviews(
    store: &dyn Store,
    llm: &dyn TextGenerator,
    ctx: &RequestContext,
    project_id: Uuid,
    stakeholder_ids: Option<&[Uuid]>,
) -> Result<Vec<ReviewDraft>, AppError> {
    let project = require_owned_project(store, ctx, project_id).await?;
    let prd_content = require_prd_text(&project)?;
    let stakeholders = require_stakeholders(store, project_id).await?;

    let selected = match stakeholder_ids {
        None => stakeholders,
        Some(ids) => {
            let by_id: HashMap<Uuid, _> = stakeholders.iter().map(|s| (s.id, s)).collect();
            let mut seen = HashSet::new();
            ids.iter()
                .filter(|id| seen.insert(**id))
                .map(|id| {
                    by_id.get(id).map(|s| (*s).clone()).ok_or_else(|| {
                        AppError::NotFound(format!("Stakeholder {id} not found in project"))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?
        }
    };

    let mut drafts = Vec::with_capacity(selected.len());
    for stakeholder in selected {
        let (content, error) =
            match generate_tailored_content(llm, &stakeholder.role, prd_content).await {
                Ok(text) => (Some(text), None),
                Err(e) => {
                    warn!("Draft generation failed for {}: {e}", stakeholder.id);
                    (None, Some(e.to_string()))
                }
            };
        drafts.push(ReviewDraft {
            stakeholder_id: stakeholder.id,
            name: stakeholder.name,
            role: stakeholder.role,
            content,
            error,
        });
    }
    Ok(drafts)
}

/// Persists edited drafts and marks each written stakeholder `in_progress`.
///
/// Blank drafts are skipped. Writes that succeed stay committed even when a
/// later one fails.
pub async fn send_reviews(
    store: &dyn Store,
    ctx: &RequestContext,
    project_id: Uuid,
    drafts: Vec<SendDraft>,
) -> Result<SendReviewResponse, AppError> {
    require_owned_project(store, ctx, project_id).await?;
    let members: HashMap<Uuid, _> = store
        .list_stakeholders(project_id)
        .await?
        .into_iter()
        .map(|s| (s.id, s))
        .collect();

    let mut results = Vec::new();
    for draft in drafts {
        if draft.tailored_content.trim().is_empty() {
            continue;
        }
        if !members.contains_key(&draft.stakeholder_id) {
            results.push(StakeholderResult::failed(
                draft.stakeholder_id,
                "Stakeholder not found in project",
            ));
            continue;
        }

        let update = StakeholderUpdate {
            tailored_content: Some(draft.tailored_content),
            review_status: Some(ReviewStatus::InProgress),
        };
        let result = match store.update_stakeholder(draft.stakeholder_id, update).await {
            Ok(Some(_)) => StakeholderResult::ok(draft.stakeholder_id),
            Ok(None) => {
                StakeholderResult::failed(draft.stakeholder_id, "Stakeholder no longer exists")
            }
            Err(e) => {
                warn!("Failed to send review to {}: {e}", draft.stakeholder_id);
                StakeholderResult::failed(draft.stakeholder_id, e.to_string())
            }
        };
        results.push(result);
    }

    let sent = results.iter().filter(|r| r.success).count();
    info!(
        "Review sent for project {project_id}: {sent}/{} stakeholders",
        results.len()
    );
    Ok(SendReviewResponse { sent, results })
}
