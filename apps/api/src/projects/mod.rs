// Projects: CRUD, PRD attachment, and the document viewer.

pub mod document;
pub mod handlers;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::auth::RequestContext;
use crate::errors::AppError;
use crate::models::{NewProject, NewStakeholder, ProjectRow, StakeholderRow, PDF_DATA_URL_PREFIX};
use crate::store::Store;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    pub name: String,
    #[serde(default)]
    pub prd_content: Option<String>,
    #[serde(default)]
    pub prd_file_name: Option<String>,
    #[serde(default)]
    pub stakeholders: Vec<NewStakeholder>,
}

/// A project with its stakeholders, as shown on the project page.
#[derive(Debug, Serialize)]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: ProjectRow,
    pub stakeholders: Vec<StakeholderRow>,
}

/// Loads a project the caller owns.
///
/// Missing → `NotFound`; owned by someone else → `Forbidden`.
pub async fn require_owned_project(
    store: &dyn Store,
    ctx: &RequestContext,
    project_id: Uuid,
) -> Result<ProjectRow, AppError> {
    let project = store
        .get_project(project_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".to_string()))?;

    if project.owner_id != ctx.user_id {
        return Err(AppError::Forbidden);
    }
    Ok(project)
}

/// Creates a project and then its initial stakeholders.
///
/// All input is validated before anything is written.
pub async fn create_project(
    store: &dyn Store,
    ctx: &RequestContext,
    request: CreateProjectRequest,
) -> Result<ProjectDetail, AppError> {
    let name = request.name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("Project name is required".to_string()));
    }
    for stakeholder in &request.stakeholders {
        stakeholder.validate().map_err(AppError::Validation)?;
    }

    let project = store
        .create_project(
            ctx.user_id,
            NewProject {
                name: name.to_string(),
                prd_content: request.prd_content,
                prd_file_name: request.prd_file_name,
            },
        )
        .await?;

    let stakeholders = if request.stakeholders.is_empty() {
        Vec::new()
    } else {
        store
            .create_stakeholders(project.id, &request.stakeholders)
            .await?
    };

    info!(
        "Created project {} with {} stakeholders",
        project.id,
        stakeholders.len()
    );
    Ok(ProjectDetail {
        project,
        stakeholders,
    })
}

pub async fn project_detail(
    store: &dyn Store,
    ctx: &RequestContext,
    project_id: Uuid,
) -> Result<ProjectDetail, AppError> {
    let (project, stakeholders) = tokio::try_join!(
        require_owned_project(store, ctx, project_id),
        store.list_stakeholders(project_id),
    )?;
    Ok(ProjectDetail {
        project,
        stakeholders,
    })
}

/// Raw bytes of a PRD stored inline as a base64 PDF data URL.
pub fn decode_pdf_data_url(content: &str) -> Option<Vec<u8>> {
    let encoded = content.strip_prefix(PDF_DATA_URL_PREFIX)?;
    STANDARD.decode(encoded.trim()).ok()
}
