use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Every failure a handler can return. Rendered as
/// `{"error": {"code", "message"}}` with the status from `status_code`.
#[derive(Debug, Error)]
pub enum AppError {
    /// No session, or the session token failed verification.
    #[error("not authenticated")]
    Unauthorized,

    /// Authenticated, but the resource belongs to another user.
    #[error("not authorized")]
    Forbidden,

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("database: {0}")]
    Database(#[from] sqlx::Error),

    #[error("model: {0}")]
    Llm(String),

    #[error("blob storage: {0}")]
    S3(String),

    #[error("job queue: {0}")]
    Queue(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_)
            | AppError::Llm(_)
            | AppError::S3(_)
            | AppError::Queue(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::Forbidden => "FORBIDDEN",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Llm(_) => "LLM_ERROR",
            AppError::S3(_) => "UPLOAD_ERROR",
            AppError::Queue(_) => "QUEUE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// What the client sees. Infrastructure details stay in the logs, except
    /// for storage failures, which the uploader is told about.
    fn public_message(&self) -> String {
        match self {
            AppError::Unauthorized | AppError::Forbidden => {
                let mut msg = self.to_string();
                if let Some(first) = msg.get_mut(..1) {
                    first.make_ascii_uppercase();
                }
                msg
            }
            AppError::NotFound(msg) | AppError::Validation(msg) => msg.clone(),
            AppError::S3(msg) => format!("Upload failed: {msg}"),
            AppError::Database(_) => "A database error occurred".to_string(),
            AppError::Llm(_) => "Content generation failed".to_string(),
            AppError::Queue(_) => "A background job error occurred".to_string(),
            AppError::Internal(_) => "An internal server error occurred".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.code(), "{self:?}");
        }

        let body = json!({
            "error": {
                "code": self.code(),
                "message": self.public_message(),
            }
        });
        (status, Json(body)).into_response()
    }
}
