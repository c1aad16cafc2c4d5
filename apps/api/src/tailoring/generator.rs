//! Tailoring generator: one role-specific summary of the PRD per stakeholder.
//!
//! Flow: load project (owner check) → best available PRD text → stakeholders →
//!       for each stakeholder, in order: prompt → model → overwrite tailored_content.
//!
//! Best-effort fan-out: a failure for one stakeholder is recorded in its result
//! and the loop moves on. Nothing is rolled back, nothing is retried, and
//! stakeholders are processed strictly one at a time.

use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use crate::auth::RequestContext;
use crate::errors::AppError;
use crate::llm_client::prompts::PM_ASSISTANT_SYSTEM;
use crate::llm_client::{LlmError, TextGenerator};
use crate::models::{ProjectRow, ReviewStatus, StakeholderRow, StakeholderUpdate};
use crate::projects::require_owned_project;
use crate::store::Store;
use crate::tailoring::prompts::build_tailoring_prompt;

/// Outcome for a single stakeholder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StakeholderResult {
    pub stakeholder_id: Uuid,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StakeholderResult {
    pub fn ok(stakeholder_id: Uuid) -> Self {
        Self {
            stakeholder_id,
            success: true,
            error: None,
        }
    }

    pub fn failed(stakeholder_id: Uuid, error: impl Into<String>) -> Self {
        Self {
            stakeholder_id,
            success: false,
            error: Some(error.into()),
        }
    }
}

/// Response of a generation pass. `success` is true once the pass ran at all;
/// per-stakeholder outcomes are in `results`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TailoringReport {
    pub success: bool,
    pub results: Vec<StakeholderResult>,
}

impl TailoringReport {
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.success).count()
    }
}

/// Asks the model for one role-tailored summary of `prd_content`.
pub async fn generate_tailored_content(
    llm: &dyn TextGenerator,
    role: &str,
    prd_content: &str,
) -> Result<String, LlmError> {
    let prompt = build_tailoring_prompt(role, prd_content);
    llm.generate(&prompt, PM_ASSISTANT_SYSTEM).await
}

/// The PRD text a project's tailoring is built from.
pub(crate) fn require_prd_text(project: &ProjectRow) -> Result<&str, AppError> {
    project
        .best_available_text()
        .ok_or_else(|| AppError::NotFound("No PRD content available".to_string()))
}

/// Loads the project's stakeholders, failing when there are none.
pub(crate) async fn require_stakeholders(
    store: &dyn Store,
    project_id: Uuid,
) -> Result<Vec<StakeholderRow>, AppError> {
    let stakeholders = store.list_stakeholders(project_id).await?;
    if stakeholders.is_empty() {
        return Err(AppError::NotFound("No stakeholders found".to_string()));
    }
    Ok(stakeholders)
}

/// Runs a full generation pass for every stakeholder of a project.
///
/// Errors (before any model call): project missing → `NotFound`, caller not
/// owner → `Forbidden`, no PRD text → `NotFound`, no stakeholders → `NotFound`.
pub async fn tailor_project(
    store: &dyn Store,
    llm: &dyn TextGenerator,
    ctx: &RequestContext,
    project_id: Uuid,
) -> Result<TailoringReport, AppError> {
    let project = require_owned_project(store, ctx, project_id).await?;
    let prd_content = require_prd_text(&project)?;
    let stakeholders = require_stakeholders(store, project_id).await?;

    info!(
        "Generating tailored content for {} stakeholders of project {}",
        stakeholders.len(),
        project_id
    );

    let mut results = Vec::with_capacity(stakeholders.len());
    for stakeholder in &stakeholders {
        let result = match tailor_stakeholder(store, llm, stakeholder, prd_content).await {
            Ok(()) => {
                info!("Tailored content saved for {} ({})", stakeholder.name, stakeholder.role);
                StakeholderResult::ok(stakeholder.id)
            }
            Err(e) => {
                error!("Tailoring failed for stakeholder {}: {e}", stakeholder.id);
                StakeholderResult::failed(stakeholder.id, e)
            }
        };
        results.push(result);
    }

    let report = TailoringReport {
        success: true,
        results,
    };
    info!(
        "Generation complete for project {}: {}/{} stakeholders updated",
        project_id,
        report.succeeded(),
        report.results.len()
    );
    Ok(report)
}

/// Generates and stores one stakeholder's content. Errors are flattened to
/// messages because they end up in that stakeholder's result entry.
async fn tailor_stakeholder(
    store: &dyn Store,
    llm: &dyn TextGenerator,
    stakeholder: &StakeholderRow,
    prd_content: &str,
) -> Result<(), String> {
    let content = generate_tailored_content(llm, &stakeholder.role, prd_content)
        .await
        .map_err(|e| e.to_string())?;

    let update = StakeholderUpdate {
        tailored_content: Some(content),
        review_status: Some(ReviewStatus::InProgress),
    };
    match store.update_stakeholder(stakeholder.id, update).await {
        Ok(Some(_)) => Ok(()),
        Ok(None) => Err("Stakeholder no longer exists".to_string()),
        Err(e) => Err(e.to_string()),
    }
}
