//! Persistence seam. Handlers and services only ever see `Arc<dyn Store>`.
//!
//! Every method is a single, non-transactional statement against the row
//! store. Multi-row workflows (tailoring, review send) call these one at a
//! time and report per-row outcomes themselves.

pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{
    AnswerRow, NewAnswer, NewProject, NewQuestion, NewStakeholder, PrdAttachment, ProjectRow,
    ProjectUpdate, QuestionRow, QuestionStatus, StakeholderRow, StakeholderUpdate,
};

pub use postgres::PgStore;

#[async_trait]
pub trait Store: Send + Sync {
    // Projects

    /// The owner's projects, newest first.
    async fn list_projects(&self, owner_id: Uuid) -> Result<Vec<ProjectRow>, AppError>;
    async fn get_project(&self, project_id: Uuid) -> Result<Option<ProjectRow>, AppError>;
    async fn create_project(
        &self,
        owner_id: Uuid,
        project: NewProject,
    ) -> Result<ProjectRow, AppError>;
    /// Returns `None` when no project with that id belongs to `owner_id`.
    async fn update_project(
        &self,
        project_id: Uuid,
        owner_id: Uuid,
        update: ProjectUpdate,
    ) -> Result<Option<ProjectRow>, AppError>;
    /// Replaces every PRD column; an attachment is the whole document.
    async fn attach_prd(
        &self,
        project_id: Uuid,
        owner_id: Uuid,
        attachment: PrdAttachment,
    ) -> Result<Option<ProjectRow>, AppError>;
    /// Returns whether a row was deleted.
    async fn delete_project(&self, project_id: Uuid, owner_id: Uuid) -> Result<bool, AppError>;

    // Stakeholders

    /// Ordered by creation time, oldest first.
    async fn list_stakeholders(&self, project_id: Uuid) -> Result<Vec<StakeholderRow>, AppError>;
    async fn get_stakeholder(&self, stakeholder_id: Uuid)
        -> Result<Option<StakeholderRow>, AppError>;
    async fn create_stakeholders(
        &self,
        project_id: Uuid,
        stakeholders: &[NewStakeholder],
    ) -> Result<Vec<StakeholderRow>, AppError>;
    async fn update_stakeholder(
        &self,
        stakeholder_id: Uuid,
        update: StakeholderUpdate,
    ) -> Result<Option<StakeholderRow>, AppError>;
    async fn delete_stakeholder(&self, stakeholder_id: Uuid) -> Result<bool, AppError>;

    // Questions and answers

    /// Newest first.
    async fn list_questions(&self, project_id: Uuid) -> Result<Vec<QuestionRow>, AppError>;
    async fn get_question(&self, question_id: Uuid) -> Result<Option<QuestionRow>, AppError>;
    async fn create_question(&self, question: NewQuestion) -> Result<QuestionRow, AppError>;
    async fn set_question_status(
        &self,
        question_id: Uuid,
        status: QuestionStatus,
        resolved_at: Option<DateTime<Utc>>,
    ) -> Result<Option<QuestionRow>, AppError>;
    /// Answers for all given questions, oldest first.
    async fn list_answers(&self, question_ids: &[Uuid]) -> Result<Vec<AnswerRow>, AppError>;
    async fn create_answer(&self, answer: NewAnswer) -> Result<AnswerRow, AppError>;
}
