//! Background generation jobs.
//!
//! An upload that yields PRD text enqueues a `GenerationJob`; the worker spawned
//! at startup pops jobs and runs a tailoring pass as the user who uploaded.
//! The uploader never waits on, or sees errors from, the job.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::auth::RequestContext;
use crate::errors::AppError;
use crate::state::AppState;
use crate::tailoring::generator::tailor_project;

const GENERATION_QUEUE_KEY: &str = "smartprd:generation_jobs";
/// Seconds a single BRPOP blocks before returning empty-handed.
const DEQUEUE_TIMEOUT_SECS: u64 = 5;
const ERROR_BACKOFF: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationJob {
    pub project_id: Uuid,
    pub requested_by: Uuid,
    pub enqueued_at: DateTime<Utc>,
}

impl GenerationJob {
    pub fn new(project_id: Uuid, requested_by: Uuid) -> Self {
        Self {
            project_id,
            requested_by,
            enqueued_at: Utc::now(),
        }
    }
}

#[async_trait]
pub trait JobQueue: Send + Sync {
    async fn enqueue(&self, job: GenerationJob) -> Result<(), AppError>;
    /// Waits briefly for a job; `None` when the queue stayed empty.
    async fn dequeue(&self) -> Result<Option<GenerationJob>, AppError>;
}

/// Redis list queue: LPUSH to enqueue, BRPOP to dequeue (FIFO).
#[derive(Clone)]
pub struct RedisJobQueue {
    client: redis::Client,
}

impl RedisJobQueue {
    pub fn new(client: redis::Client) -> Self {
        Self { client }
    }

    async fn connection(&self) -> Result<redis::aio::MultiplexedConnection, AppError> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| AppError::Queue(format!("Redis connection failed: {e}")))
    }
}

#[async_trait]
impl JobQueue for RedisJobQueue {
    async fn enqueue(&self, job: GenerationJob) -> Result<(), AppError> {
        let payload = serde_json::to_string(&job)
            .map_err(|e| AppError::Queue(format!("Failed to serialize job: {e}")))?;
        let mut con = self.connection().await?;
        redis::cmd("LPUSH")
            .arg(GENERATION_QUEUE_KEY)
            .arg(payload)
            .query_async::<_, i64>(&mut con)
            .await
            .map_err(|e| AppError::Queue(format!("LPUSH failed: {e}")))?;
        Ok(())
    }

    async fn dequeue(&self) -> Result<Option<GenerationJob>, AppError> {
        let mut con = self.connection().await?;
        let popped: Option<(String, String)> = redis::cmd("BRPOP")
            .arg(GENERATION_QUEUE_KEY)
            .arg(DEQUEUE_TIMEOUT_SECS)
            .query_async(&mut con)
            .await
            .map_err(|e| AppError::Queue(format!("BRPOP failed: {e}")))?;

        match popped {
            None => Ok(None),
            Some((_, payload)) => serde_json::from_str(&payload)
                .map(Some)
                .map_err(|e| AppError::Queue(format!("Malformed job payload: {e}"))),
        }
    }
}

/// Runs one job: a full tailoring pass on behalf of the requesting user.
pub async fn run_generation_job(state: &AppState, job: &GenerationJob) -> Result<(), AppError> {
    let ctx = RequestContext::new(job.requested_by, None);
    let report = tailor_project(state.store.as_ref(), state.llm.as_ref(), &ctx, job.project_id).await?;
    info!(
        "Generation job for project {} finished: {}/{} stakeholders updated",
        job.project_id,
        report.succeeded(),
        report.results.len()
    );
    Ok(())
}

/// Worker loop. Never returns; job failures are logged and the loop continues.
pub async fn run_generation_worker(state: AppState) {
    info!("Generation worker started");
    loop {
        match state.jobs.dequeue().await {
            Ok(Some(job)) => {
                if let Err(e) = run_generation_job(&state, &job).await {
                    error!("Generation job for project {} failed: {e}", job.project_id);
                }
            }
            Ok(None) => {}
            Err(e) => {
                warn!("Failed to dequeue generation job: {e}");
                tokio::time::sleep(ERROR_BACKOFF).await;
            }
        }
    }
}
