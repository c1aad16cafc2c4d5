//! Axum route handlers for questions and answers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::auth::RequestContext;
use crate::errors::AppError;
use crate::models::{AnswerRow, QuestionRow};
use crate::questions::{
    add_answer, ask_question, list_project_questions, resolve_question, suggest_answer,
    unresolve_question, AddAnswerRequest, AskQuestionRequest, QuestionWithAnswers,
};
use crate::state::AppState;

/// GET /api/projects/:id/questions
pub async fn handle_list_questions(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(project_id): Path<Uuid>,
) -> Result<Json<Vec<QuestionWithAnswers>>, AppError> {
    let questions = list_project_questions(state.store.as_ref(), &ctx, project_id).await?;
    Ok(Json(questions))
}

/// POST /api/projects/:id/questions
pub async fn handle_ask_question(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(project_id): Path<Uuid>,
    Json(request): Json<AskQuestionRequest>,
) -> Result<(StatusCode, Json<QuestionRow>), AppError> {
    let question = ask_question(state.store.as_ref(), &ctx, project_id, request).await?;
    Ok((StatusCode::CREATED, Json(question)))
}

/// POST /api/questions/:id/answers
pub async fn handle_add_answer(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(question_id): Path<Uuid>,
    Json(request): Json<AddAnswerRequest>,
) -> Result<(StatusCode, Json<AnswerRow>), AppError> {
    let answer = add_answer(state.store.as_ref(), &ctx, question_id, request).await?;
    Ok((StatusCode::CREATED, Json(answer)))
}

/// POST /api/questions/:id/answers/suggest
pub async fn handle_suggest_answer(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(question_id): Path<Uuid>,
) -> Result<(StatusCode, Json<AnswerRow>), AppError> {
    let answer = suggest_answer(state.store.as_ref(), state.llm.as_ref(), &ctx, question_id).await?;
    Ok((StatusCode::CREATED, Json(answer)))
}

/// POST /api/questions/:id/resolve
pub async fn handle_resolve_question(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(question_id): Path<Uuid>,
) -> Result<Json<QuestionRow>, AppError> {
    let question = resolve_question(state.store.as_ref(), &ctx, question_id).await?;
    Ok(Json(question))
}

/// POST /api/questions/:id/unresolve
pub async fn handle_unresolve_question(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(question_id): Path<Uuid>,
) -> Result<Json<QuestionRow>, AppError> {
    let question = unresolve_question(state.store.as_ref(), &ctx, question_id).await?;
    Ok(Json(question))
}
