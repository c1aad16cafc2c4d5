//! Question / answer tracking.
//!
//! Stakeholders ask questions about a project's PRD; the PM answers them by
//! hand or with a model-drafted answer, and resolves them explicitly. Adding
//! an answer never changes a question's status.

pub mod handlers;
pub mod prompts;

use std::collections::HashMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::auth::RequestContext;
use crate::errors::AppError;
use crate::llm_client::prompts::PM_ASSISTANT_SYSTEM;
use crate::llm_client::TextGenerator;
use crate::models::{AnswerRow, NewAnswer, NewQuestion, ProjectRow, QuestionRow, QuestionStatus};
use crate::projects::require_owned_project;
use crate::questions::prompts::build_answer_prompt;
use crate::store::Store;
use crate::tailoring::generator::require_prd_text;

#[derive(Debug, Clone, Serialize)]
pub struct StakeholderSummary {
    pub name: String,
    pub role: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionWithAnswers {
    #[serde(flatten)]
    pub question: QuestionRow,
    pub answers: Vec<AnswerRow>,
    pub stakeholder: StakeholderSummary,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AskQuestionRequest {
    pub stakeholder_id: Uuid,
    pub question_text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddAnswerRequest {
    pub answer_text: String,
    #[serde(default)]
    pub is_ai_generated: bool,
}

/// Questions of a project, newest first, each with its answers oldest first.
pub async fn list_project_questions(
    store: &dyn Store,
    ctx: &RequestContext,
    project_id: Uuid,
) -> Result<Vec<QuestionWithAnswers>, AppError> {
    require_owned_project(store, ctx, project_id).await?;
    let (questions, stakeholders) = tokio::try_join!(
        store.list_questions(project_id),
        store.list_stakeholders(project_id),
    )?;

    let ids: Vec<Uuid> = questions.iter().map(|q| q.id).collect();
    let mut answers_by_question: HashMap<Uuid, Vec<AnswerRow>> = HashMap::new();
    for answer in store.list_answers(&ids).await? {
        answers_by_question
            .entry(answer.question_id)
            .or_default()
            .push(answer);
    }
    let summaries: HashMap<Uuid, StakeholderSummary> = stakeholders
        .into_iter()
        .map(|s| {
            (
                s.id,
                StakeholderSummary {
                    name: s.name,
                    role: s.role,
                },
            )
        })
        .collect();

    // A question whose stakeholder is gone is not listed.
    Ok(questions
        .into_iter()
        .filter_map(|question| {
            let stakeholder = summaries.get(&question.stakeholder_id)?.clone();
            let answers = answers_by_question.remove(&question.id).unwrap_or_default();
            Some(QuestionWithAnswers {
                question,
                answers,
                stakeholder,
            })
        })
        .collect())
}

/// Records a question from a stakeholder of the project.
///
/// The caller must own the project or be that stakeholder (matched by the
/// session email).
pub async fn ask_question(
    store: &dyn Store,
    ctx: &RequestContext,
    project_id: Uuid,
    request: AskQuestionRequest,
) -> Result<QuestionRow, AppError> {
    let project = store
        .get_project(project_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".to_string()))?;
    let stakeholder = store
        .get_stakeholder(request.stakeholder_id)
        .await?
        .filter(|s| s.project_id == project_id)
        .ok_or_else(|| AppError::NotFound("Stakeholder not found in project".to_string()))?;

    if project.owner_id != ctx.user_id && !ctx.has_email(&stakeholder.email) {
        return Err(AppError::Forbidden);
    }

    let text = request.question_text.trim();
    if text.is_empty() {
        return Err(AppError::Validation("Question text is required".to_string()));
    }

    let question = store
        .create_question(NewQuestion {
            project_id,
            stakeholder_id: stakeholder.id,
            question_text: text.to_string(),
        })
        .await?;
    info!("Question {} asked by stakeholder {}", question.id, stakeholder.id);
    Ok(question)
}

/// Loads a question, and its project, when the caller owns that project.
async fn require_owned_question(
    store: &dyn Store,
    ctx: &RequestContext,
    question_id: Uuid,
) -> Result<(QuestionRow, ProjectRow), AppError> {
    let question = store
        .get_question(question_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Question not found".to_string()))?;
    let project = require_owned_project(store, ctx, question.project_id).await?;
    Ok((question, project))
}

pub async fn add_answer(
    store: &dyn Store,
    ctx: &RequestContext,
    question_id: Uuid,
    request: AddAnswerRequest,
) -> Result<AnswerRow, AppError> {
    require_owned_question(store, ctx, question_id).await?;
    let text = request.answer_text.trim();
    if text.is_empty() {
        return Err(AppError::Validation("Answer text is required".to_string()));
    }

    store
        .create_answer(NewAnswer {
            question_id,
            answer_text: text.to_string(),
            is_ai_generated: request.is_ai_generated,
            created_by: Some(ctx.user_id),
        })
        .await
}

/// Drafts an answer from the PRD with the model and stores it as AI-generated.
pub async fn suggest_answer(
    store: &dyn Store,
    llm: &dyn TextGenerator,
    ctx: &RequestContext,
    question_id: Uuid,
) -> Result<AnswerRow, AppError> {
    let (question, project) = require_owned_question(store, ctx, question_id).await?;
    let prd_content = require_prd_text(&project)?;
    let role = store
        .get_stakeholder(question.stakeholder_id)
        .await?
        .map(|s| s.role)
        .unwrap_or_else(|| "stakeholder".to_string());

    let prompt = build_answer_prompt(&role, &question.question_text, prd_content);
    let answer_text = llm
        .generate(&prompt, PM_ASSISTANT_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(e.to_string()))?;

    store
        .create_answer(NewAnswer {
            question_id,
            answer_text: answer_text.trim().to_string(),
            is_ai_generated: true,
            created_by: Some(ctx.user_id),
        })
        .await
}

/// Marks a question resolved. Resolving again refreshes `resolved_at`.
pub async fn resolve_question(
    store: &dyn Store,
    ctx: &RequestContext,
    question_id: Uuid,
) -> Result<QuestionRow, AppError> {
    set_status(store, ctx, question_id, QuestionStatus::Resolved).await
}

pub async fn unresolve_question(
    store: &dyn Store,
    ctx: &RequestContext,
    question_id: Uuid,
) -> Result<QuestionRow, AppError> {
    set_status(store, ctx, question_id, QuestionStatus::Unresolved).await
}

async fn set_status(
    store: &dyn Store,
    ctx: &RequestContext,
    question_id: Uuid,
    status: QuestionStatus,
) -> Result<QuestionRow, AppError> {
    require_owned_question(store, ctx, question_id).await?;
    let resolved_at = (status == QuestionStatus::Resolved).then(Utc::now);
    store
        .set_question_status(question_id, status, resolved_at)
        .await?
        .ok_or_else(|| AppError::NotFound("Question not found".to_string()))
}
