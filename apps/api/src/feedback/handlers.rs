use axum::{
    extract::{Path, State},
    Json,
};

use crate::catalog::parse_target_id;
use crate::errors::AppError;
use crate::feedback::{feedback_for, FeedbackError, FeedbackReport};
use crate::gating::{enforce, Page};
use crate::session::Session;
use crate::state::AppState;

/// GET /api/v1/feedback/:id
///
/// Requires a stored assessment for the target; the report is recomputed on
/// every call and never persisted.
pub async fn handle_get_feedback(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Json<FeedbackReport>, AppError> {
    let store = enforce(&state, &session, Page::Feedback).await?;

    let target_id = parse_target_id(&id)
        .filter(|target_id| state.catalog.get(*target_id).is_some())
        .ok_or_else(|| FeedbackError::TargetNotFound(id.clone()))?;
    let assessment = store.assessment(target_id).await?.ok_or_else(|| {
        AppError::NotFound(format!("No assessment saved for target {target_id}"))
    })?;

    let report = feedback_for(&state.catalog, &id, &assessment)?;
    Ok(Json(report))
}
