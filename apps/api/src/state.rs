use std::sync::Arc;

use crate::blob::BlobStore;
use crate::config::Config;
use crate::jobs::JobQueue;
use crate::llm_client::TextGenerator;
use crate::store::Store;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Every external collaborator sits behind a trait object so the same handlers
/// run against PostgreSQL/S3/Redis/Anthropic in production and in-memory fakes in tests.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub blobs: Arc<dyn BlobStore>,
    pub llm: Arc<dyn TextGenerator>,
    pub jobs: Arc<dyn JobQueue>,
    pub config: Config,
}
