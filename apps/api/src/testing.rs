//! In-memory fakes for service and router tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use uuid::Uuid;

use crate::auth::Claims;
use crate::blob::BlobStore;
use crate::config::Config;
use crate::errors::AppError;
use crate::jobs::{GenerationJob, JobQueue};
use crate::llm_client::{LlmError, TextGenerator};
use crate::models::{
    AnswerRow, NewAnswer, NewProject, NewQuestion, NewStakeholder, PrdAttachment, ProjectRow,
    ProjectUpdate, QuestionRow, QuestionStatus, ReviewStatus, StakeholderRow, StakeholderUpdate,
};
use crate::state::AppState;
use crate::store::Store;

pub const TEST_JWT_SECRET: &str = "test-secret";

#[derive(Default)]
struct Tables {
    projects: Vec<ProjectRow>,
    stakeholders: Vec<StakeholderRow>,
    questions: Vec<QuestionRow>,
    answers: Vec<AnswerRow>,
}

/// Row store kept in insertion order. Clones share the same tables.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    fn with<T>(&self, f: impl FnOnce(&mut Tables) -> T) -> T {
        let mut tables = self.tables.lock().unwrap();
        f(&mut tables)
    }

    pub fn project(&self, id: Uuid) -> Option<ProjectRow> {
        self.with(|t| t.projects.iter().find(|p| p.id == id).cloned())
    }

    pub fn stakeholder(&self, id: Uuid) -> Option<StakeholderRow> {
        self.with(|t| t.stakeholders.iter().find(|s| s.id == id).cloned())
    }

    pub fn question(&self, id: Uuid) -> Option<QuestionRow> {
        self.with(|t| t.questions.iter().find(|q| q.id == id).cloned())
    }

    pub fn answers_for(&self, question_id: Uuid) -> Vec<AnswerRow> {
        self.with(|t| {
            t.answers
                .iter()
                .filter(|a| a.question_id == question_id)
                .cloned()
                .collect()
        })
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn list_projects(&self, owner_id: Uuid) -> Result<Vec<ProjectRow>, AppError> {
        Ok(self.with(|t| {
            t.projects
                .iter()
                .rev()
                .filter(|p| p.owner_id == owner_id)
                .cloned()
                .collect()
        }))
    }

    async fn get_project(&self, project_id: Uuid) -> Result<Option<ProjectRow>, AppError> {
        Ok(self.project(project_id))
    }

    async fn create_project(
        &self,
        owner_id: Uuid,
        project: NewProject,
    ) -> Result<ProjectRow, AppError> {
        let now = Utc::now();
        let row = ProjectRow {
            id: Uuid::new_v4(),
            name: project.name,
            prd_content: project.prd_content,
            prd_file_name: project.prd_file_name,
            prd_file_url: None,
            prd_extracted_text: None,
            owner_id,
            created_at: now,
            updated_at: now,
        };
        self.with(|t| t.projects.push(row.clone()));
        Ok(row)
    }

    async fn update_project(
        &self,
        project_id: Uuid,
        owner_id: Uuid,
        update: ProjectUpdate,
    ) -> Result<Option<ProjectRow>, AppError> {
        Ok(self.with(|t| {
            let row = t
                .projects
                .iter_mut()
                .find(|p| p.id == project_id && p.owner_id == owner_id)?;
            if let Some(name) = update.name {
                row.name = name;
            }
            if let Some(content) = update.prd_content {
                row.prd_content = Some(content);
            }
            if let Some(file_name) = update.prd_file_name {
                row.prd_file_name = Some(file_name);
            }
            row.updated_at = Utc::now();
            Some(row.clone())
        }))
    }

    async fn attach_prd(
        &self,
        project_id: Uuid,
        owner_id: Uuid,
        attachment: PrdAttachment,
    ) -> Result<Option<ProjectRow>, AppError> {
        Ok(self.with(|t| {
            let row = t
                .projects
                .iter_mut()
                .find(|p| p.id == project_id && p.owner_id == owner_id)?;
            row.prd_content = attachment.prd_content;
            row.prd_file_name = attachment.prd_file_name;
            row.prd_file_url = attachment.prd_file_url;
            row.prd_extracted_text = attachment.prd_extracted_text;
            row.updated_at = Utc::now();
            Some(row.clone())
        }))
    }

    async fn delete_project(&self, project_id: Uuid, owner_id: Uuid) -> Result<bool, AppError> {
        Ok(self.with(|t| {
            let before = t.projects.len();
            t.projects
                .retain(|p| !(p.id == project_id && p.owner_id == owner_id));
            t.projects.len() != before
        }))
    }

    async fn list_stakeholders(&self, project_id: Uuid) -> Result<Vec<StakeholderRow>, AppError> {
        Ok(self.with(|t| {
            t.stakeholders
                .iter()
                .filter(|s| s.project_id == project_id)
                .cloned()
                .collect()
        }))
    }

    async fn get_stakeholder(
        &self,
        stakeholder_id: Uuid,
    ) -> Result<Option<StakeholderRow>, AppError> {
        Ok(self.stakeholder(stakeholder_id))
    }

    async fn create_stakeholders(
        &self,
        project_id: Uuid,
        stakeholders: &[NewStakeholder],
    ) -> Result<Vec<StakeholderRow>, AppError> {
        let rows: Vec<StakeholderRow> = stakeholders
            .iter()
            .map(|s| StakeholderRow {
                id: Uuid::new_v4(),
                project_id,
                user_id: None,
                name: s.name.trim().to_string(),
                email: s.email.trim().to_string(),
                role: s.role.trim().to_string(),
                tailored_content: None,
                review_status: ReviewStatus::Pending,
                created_at: Utc::now(),
            })
            .collect();
        self.with(|t| t.stakeholders.extend(rows.iter().cloned()));
        Ok(rows)
    }

    async fn update_stakeholder(
        &self,
        stakeholder_id: Uuid,
        update: StakeholderUpdate,
    ) -> Result<Option<StakeholderRow>, AppError> {
        Ok(self.with(|t| {
            let row = t.stakeholders.iter_mut().find(|s| s.id == stakeholder_id)?;
            if let Some(content) = update.tailored_content {
                row.tailored_content = Some(content);
            }
            if let Some(status) = update.review_status {
                row.review_status = status;
            }
            Some(row.clone())
        }))
    }

    async fn delete_stakeholder(&self, stakeholder_id: Uuid) -> Result<bool, AppError> {
        Ok(self.with(|t| {
            let before = t.stakeholders.len();
            t.stakeholders.retain(|s| s.id != stakeholder_id);
            t.stakeholders.len() != before
        }))
    }

    async fn list_questions(&self, project_id: Uuid) -> Result<Vec<QuestionRow>, AppError> {
        Ok(self.with(|t| {
            t.questions
                .iter()
                .rev()
                .filter(|q| q.project_id == project_id)
                .cloned()
                .collect()
        }))
    }

    async fn get_question(&self, question_id: Uuid) -> Result<Option<QuestionRow>, AppError> {
        Ok(self.question(question_id))
    }

    async fn create_question(&self, question: NewQuestion) -> Result<QuestionRow, AppError> {
        let row = QuestionRow {
            id: Uuid::new_v4(),
            project_id: question.project_id,
            stakeholder_id: question.stakeholder_id,
            question_text: question.question_text,
            status: QuestionStatus::Unresolved,
            created_at: Utc::now(),
            resolved_at: None,
        };
        self.with(|t| t.questions.push(row.clone()));
        Ok(row)
    }

    async fn set_question_status(
        &self,
        question_id: Uuid,
        status: QuestionStatus,
        resolved_at: Option<DateTime<Utc>>,
    ) -> Result<Option<QuestionRow>, AppError> {
        Ok(self.with(|t| {
            let row = t.questions.iter_mut().find(|q| q.id == question_id)?;
            row.status = status;
            row.resolved_at = resolved_at;
            Some(row.clone())
        }))
    }

    async fn list_answers(&self, question_ids: &[Uuid]) -> Result<Vec<AnswerRow>, AppError> {
        Ok(self.with(|t| {
            t.answers
                .iter()
                .filter(|a| question_ids.contains(&a.question_id))
                .cloned()
                .collect()
        }))
    }

    async fn create_answer(&self, answer: NewAnswer) -> Result<AnswerRow, AppError> {
        let row = AnswerRow {
            id: Uuid::new_v4(),
            question_id: answer.question_id,
            answer_text: answer.answer_text,
            is_ai_generated: answer.is_ai_generated,
            created_by: answer.created_by,
            created_at: Utc::now(),
        };
        self.with(|t| t.answers.push(row.clone()));
        Ok(row)
    }
}

/// Inserts a project directly, bypassing validation.
pub fn seed_project(
    store: &MemoryStore,
    owner_id: Uuid,
    prd_content: Option<&str>,
    prd_extracted_text: Option<&str>,
) -> ProjectRow {
    let now = Utc::now();
    let row = ProjectRow {
        id: Uuid::new_v4(),
        name: "SmartShot".to_string(),
        prd_content: prd_content.map(String::from),
        prd_file_name: None,
        prd_file_url: None,
        prd_extracted_text: prd_extracted_text.map(String::from),
        owner_id,
        created_at: now,
        updated_at: now,
    };
    store.with(|t| t.projects.push(row.clone()));
    row
}

pub fn seed_stakeholder(
    store: &MemoryStore,
    project_id: Uuid,
    name: &str,
    role: &str,
) -> StakeholderRow {
    let row = StakeholderRow {
        id: Uuid::new_v4(),
        project_id,
        user_id: None,
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        role: role.to_string(),
        tailored_content: None,
        review_status: ReviewStatus::Pending,
        created_at: Utc::now(),
    };
    store.with(|t| t.stakeholders.push(row.clone()));
    row
}

pub fn seed_question(store: &MemoryStore, stakeholder: &StakeholderRow, text: &str) -> QuestionRow {
    let row = QuestionRow {
        id: Uuid::new_v4(),
        project_id: stakeholder.project_id,
        stakeholder_id: stakeholder.id,
        question_text: text.to_string(),
        status: QuestionStatus::Unresolved,
        created_at: Utc::now(),
        resolved_at: None,
    };
    store.with(|t| t.questions.push(row.clone()));
    row
}

/// Scripted text generator that records every prompt it receives.
pub struct FakeGenerator {
    reply: String,
    fail_when_prompt_contains: Option<String>,
    prompts: Mutex<Vec<String>>,
}

impl Default for FakeGenerator {
    fn default() -> Self {
        Self::replying("## Your summary\n- Tailored for you")
    }
}

impl FakeGenerator {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            fail_when_prompt_contains: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Fails every prompt that mentions `needle` (usually a role).
    pub fn failing_for(needle: &str) -> Self {
        Self {
            fail_when_prompt_contains: Some(needle.to_string()),
            ..Self::default()
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for FakeGenerator {
    async fn generate(&self, prompt: &str, _system: &str) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.fail_when_prompt_contains {
            Some(needle) if prompt.contains(needle.as_str()) => Err(LlmError::Rejected {
                status: 529,
                message: "Overloaded".to_string(),
            }),
            _ => Ok(self.reply.clone()),
        }
    }
}

#[derive(Clone, Default)]
pub struct MemoryBlobStore {
    objects: Arc<Mutex<Vec<(String, Bytes)>>>,
}

impl MemoryBlobStore {
    pub fn len(&self) -> usize {
        self.objects.lock().unwrap().len()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(&self, key: &str, body: Bytes, _content_type: &str) -> Result<String, AppError> {
        self.objects.lock().unwrap().push((key.to_string(), body));
        Ok(format!("http://blobs.test/{key}"))
    }
}

#[derive(Clone, Default)]
pub struct MemoryJobQueue {
    jobs: Arc<Mutex<Vec<GenerationJob>>>,
    broken: bool,
}

impl MemoryJobQueue {
    pub fn broken() -> Self {
        Self {
            broken: true,
            ..Self::default()
        }
    }

    pub fn queued(&self) -> Vec<GenerationJob> {
        self.jobs.lock().unwrap().clone()
    }
}

#[async_trait]
impl JobQueue for MemoryJobQueue {
    async fn enqueue(&self, job: GenerationJob) -> Result<(), AppError> {
        if self.broken {
            return Err(AppError::Queue("connection refused".to_string()));
        }
        self.jobs.lock().unwrap().push(job);
        Ok(())
    }

    async fn dequeue(&self) -> Result<Option<GenerationJob>, AppError> {
        if self.broken {
            return Err(AppError::Queue("connection refused".to_string()));
        }
        let mut jobs = self.jobs.lock().unwrap();
        Ok((!jobs.is_empty()).then(|| jobs.remove(0)))
    }
}

pub fn test_config() -> Config {
    Config {
        database_url: "postgres://localhost/smartprd_test".to_string(),
        redis_url: "redis://localhost".to_string(),
        s3_bucket: "prds".to_string(),
        s3_endpoint: "http://blobs.test".to_string(),
        s3_public_url: "http://blobs.test".to_string(),
        aws_access_key_id: "test".to_string(),
        aws_secret_access_key: "test".to_string(),
        anthropic_api_key: "test".to_string(),
        auth_jwt_secret: TEST_JWT_SECRET.to_string(),
        max_upload_bytes: 1024 * 1024,
        port: 0,
        rust_log: "debug".to_string(),
    }
}

/// App state wired to fakes, with typed handles kept for assertions.
pub struct TestApp {
    pub state: AppState,
    pub store: MemoryStore,
    pub blobs: MemoryBlobStore,
    pub jobs: MemoryJobQueue,
    pub llm: Arc<FakeGenerator>,
}

fn build_app(store: MemoryStore, jobs: MemoryJobQueue, llm: FakeGenerator) -> TestApp {
    let blobs = MemoryBlobStore::default();
    let llm = Arc::new(llm);
    let state = AppState {
        store: Arc::new(store.clone()),
        blobs: Arc::new(blobs.clone()),
        llm: llm.clone(),
        jobs: Arc::new(jobs.clone()),
        config: test_config(),
    };
    TestApp {
        state,
        store,
        blobs,
        jobs,
        llm,
    }
}

pub fn test_app(store: MemoryStore) -> TestApp {
    build_app(store, MemoryJobQueue::default(), FakeGenerator::default())
}

pub fn test_app_with_generator(store: MemoryStore, llm: FakeGenerator) -> TestApp {
    build_app(store, MemoryJobQueue::default(), llm)
}

pub fn test_app_with_broken_queue(store: MemoryStore) -> TestApp {
    build_app(store, MemoryJobQueue::broken(), FakeGenerator::default())
}

pub fn test_state(store: MemoryStore) -> AppState {
    test_app(store).state
}

/// `Authorization` header value for a session signed with the test secret.
pub fn bearer_token(user_id: Uuid, email: Option<&str>) -> String {
    let claims = Claims {
        sub: user_id,
        email: email.map(String::from),
        exp: (Utc::now().timestamp() + 3600) as usize,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .unwrap();
    format!("Bearer {token}")
}
