//! Request-scoped identity.
//!
//! Sessions are issued by the hosted auth service as HS256-signed JWTs. Every
//! handler that touches user data takes a `RequestContext` extractor and passes
//! it down by reference; background jobs build one from the identity recorded
//! when the job was enqueued.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;

/// Claims read from the session token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    #[serde(default)]
    pub email: Option<String>,
    pub exp: usize,
}

/// The authenticated caller of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub user_id: Uuid,
    pub email: Option<String>,
}

impl RequestContext {
    pub fn new(user_id: Uuid, email: Option<String>) -> Self {
        Self { user_id, email }
    }

    /// Case-insensitive match against a stakeholder's email.
    pub fn has_email(&self, email: &str) -> bool {
        self.email
            .as_deref()
            .is_some_and(|own| own.trim().eq_ignore_ascii_case(email.trim()))
    }
}

/// Verifies a bearer token and returns the identity it carries.
pub fn verify_token(token: &str, secret: &str) -> Result<RequestContext, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    // Hosted auth tokens carry an audience we don't pin.
    validation.validate_aud = false;

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        tracing::debug!("Rejected session token: {e}");
        AppError::Unauthorized
    })?;

    Ok(RequestContext::new(data.claims.sub, data.claims.email))
}

#[async_trait]
impl FromRequestParts<AppState> for RequestContext {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::Unauthorized)?;

        let token = header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AppError::Unauthorized)?;

        verify_token(token, &state.config.auth_jwt_secret)
    }
}
