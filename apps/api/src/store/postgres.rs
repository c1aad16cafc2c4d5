use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{
    AnswerRow, NewAnswer, NewProject, NewQuestion, NewStakeholder, PrdAttachment, ProjectRow,
    ProjectUpdate, QuestionRow, QuestionStatus, StakeholderRow, StakeholderUpdate,
};
use crate::store::Store;

/// `Store` backed by the PostgreSQL schema in `migrations/`.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn list_projects(&self, owner_id: Uuid) -> Result<Vec<ProjectRow>, AppError> {
        Ok(sqlx::query_as::<_, ProjectRow>(
            "SELECT * FROM projects WHERE owner_id = $1 ORDER BY created_at DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn get_project(&self, project_id: Uuid) -> Result<Option<ProjectRow>, AppError> {
        Ok(
            sqlx::query_as::<_, ProjectRow>("SELECT * FROM projects WHERE id = $1")
                .bind(project_id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn create_project(
        &self,
        owner_id: Uuid,
        project: NewProject,
    ) -> Result<ProjectRow, AppError> {
        Ok(sqlx::query_as::<_, ProjectRow>(
            r#"
            INSERT INTO projects (name, prd_content, prd_file_name, owner_id)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&project.name)
        .bind(&project.prd_content)
        .bind(&project.prd_file_name)
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn update_project(
        &self,
        project_id: Uuid,
        owner_id: Uuid,
        update: ProjectUpdate,
    ) -> Result<Option<ProjectRow>, AppError> {
        Ok(sqlx::query_as::<_, ProjectRow>(
            r#"
            UPDATE projects
            SET name          = COALESCE($3, name),
                prd_content   = COALESCE($4, prd_content),
                prd_file_name = COALESCE($5, prd_file_name),
                updated_at    = now()
            WHERE id = $1 AND owner_id = $2
            RETURNING *
            "#,
        )
        .bind(project_id)
        .bind(owner_id)
        .bind(&update.name)
        .bind(&update.prd_content)
        .bind(&update.prd_file_name)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn attach_prd(
        &self,
        project_id: Uuid,
        owner_id: Uuid,
        attachment: PrdAttachment,
    ) -> Result<Option<ProjectRow>, AppError> {
        Ok(sqlx::query_as::<_, ProjectRow>(
            r#"
            UPDATE projects
            SET prd_content        = $3,
                prd_file_name      = $4,
                prd_file_url       = $5,
                prd_extracted_text = $6,
                updated_at         = now()
            WHERE id = $1 AND owner_id = $2
            RETURNING *
            "#,
        )
        .bind(project_id)
        .bind(owner_id)
        .bind(&attachment.prd_content)
        .bind(&attachment.prd_file_name)
        .bind(&attachment.prd_file_url)
        .bind(&attachment.prd_extracted_text)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn delete_project(&self, project_id: Uuid, owner_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1 AND owner_id = $2")
            .bind(project_id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_stakeholders(&self, project_id: Uuid) -> Result<Vec<StakeholderRow>, AppError> {
        Ok(sqlx::query_as::<_, StakeholderRow>(
            "SELECT * FROM project_stakeholders WHERE project_id = $1 ORDER BY created_at ASC",
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn get_stakeholder(
        &self,
        stakeholder_id: Uuid,
    ) -> Result<Option<StakeholderRow>, AppError> {
        Ok(sqlx::query_as::<_, StakeholderRow>(
            "SELECT * FROM project_stakeholders WHERE id = $1",
        )
        .bind(stakeholder_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn create_stakeholders(
        &self,
        project_id: Uuid,
        stakeholders: &[NewStakeholder],
    ) -> Result<Vec<StakeholderRow>, AppError> {
        let mut created = Vec::with_capacity(stakeholders.len());
        for s in stakeholders {
            let row = sqlx::query_as::<_, StakeholderRow>(
                r#"
                INSERT INTO project_stakeholders (project_id, name, email, role)
                VALUES ($1, $2, $3, $4)
                RETURNING *
                "#,
            )
            .bind(project_id)
            .bind(s.name.trim())
            .bind(s.email.trim())
            .bind(s.role.trim())
            .fetch_one(&self.pool)
            .await?;
            created.push(row);
        }
        Ok(created)
    }

    async fn update_stakeholder(
        &self,
        stakeholder_id: Uuid,
        update: StakeholderUpdate,
    ) -> Result<Option<StakeholderRow>, AppError> {
        Ok(sqlx::query_as::<_, StakeholderRow>(
            r#"
            UPDATE project_stakeholders
            SET tailored_content = COALESCE($2, tailored_content),
                review_status    = COALESCE($3, review_status)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(stakeholder_id)
        .bind(&update.tailored_content)
        .bind(update.review_status.map(|s| s.as_str()))
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn delete_stakeholder(&self, stakeholder_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM project_stakeholders WHERE id = $1")
            .bind(stakeholder_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_questions(&self, project_id: Uuid) -> Result<Vec<QuestionRow>, AppError> {
        Ok(sqlx::query_as::<_, QuestionRow>(
            "SELECT * FROM questions WHERE project_id = $1 ORDER BY created_at DESC",
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn get_question(&self, question_id: Uuid) -> Result<Option<QuestionRow>, AppError> {
        Ok(
            sqlx::query_as::<_, QuestionRow>("SELECT * FROM questions WHERE id = $1")
                .bind(question_id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn create_question(&self, question: NewQuestion) -> Result<QuestionRow, AppError> {
        Ok(sqlx::query_as::<_, QuestionRow>(
            r#"
            INSERT INTO questions (project_id, stakeholder_id, question_text)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(question.project_id)
        .bind(question.stakeholder_id)
        .bind(&question.question_text)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn set_question_status(
        &self,
        question_id: Uuid,
        status: QuestionStatus,
        resolved_at: Option<DateTime<Utc>>,
    ) -> Result<Option<QuestionRow>, AppError> {
        Ok(sqlx::query_as::<_, QuestionRow>(
            "UPDATE questions SET status = $2, resolved_at = $3 WHERE id = $1 RETURNING *",
        )
        .bind(question_id)
        .bind(status.as_str())
        .bind(resolved_at)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn list_answers(&self, question_ids: &[Uuid]) -> Result<Vec<AnswerRow>, AppError> {
        if question_ids.is_empty() {
            return Ok(Vec::new());
        }
        Ok(sqlx::query_as::<_, AnswerRow>(
            "SELECT * FROM answers WHERE question_id = ANY($1) ORDER BY created_at ASC",
        )
        .bind(question_ids)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn create_answer(&self, answer: NewAnswer) -> Result<AnswerRow, AppError> {
        Ok(sqlx::query_as::<_, AnswerRow>(
            r#"
            INSERT INTO answers (question_id, answer_text, is_ai_generated, created_by)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(answer.question_id)
        .bind(&answer.answer_text)
        .bind(answer.is_ai_generated)
        .bind(answer.created_by)
        .fetch_one(&self.pool)
        .await?)
    }
}
