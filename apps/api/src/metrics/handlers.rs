use axum::{extract::State, Json};

use crate::auth::RequestContext;
use crate::errors::AppError;
use crate::metrics::{collect_activity, compute_metrics, Metrics};
use crate::state::AppState;

/// GET /api/metrics
pub async fn handle_metrics(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<Json<Metrics>, AppError> {
    let activity = collect_activity(state.store.as_ref(), &ctx).await?;
    Ok(Json(compute_metrics(&activity)))
}
