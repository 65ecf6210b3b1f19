use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;
use tracing::info;

use crate::assessment::apply_patch;
use crate::errors::AppError;
use crate::extract::ApiJson;
use crate::feedback::{feedback_for, FeedbackReport};
use crate::gating::{enforce, Page};
use crate::models::assessment::AssessmentRecord;
use crate::session::Session;
use crate::state::AppState;

fn known_target_id(state: &AppState, id: &str) -> Result<u32, AppError> {
    state
        .catalog
        .get_target_by_id(id)
        .map(|target| target.id)
        .ok_or_else(|| AppError::NotFound(format!("Target {id} not found")))
}

/// GET /api/v1/assessments/:id
pub async fn handle_get_assessment(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Json<AssessmentRecord>, AppError> {
    let store = enforce(&state, &session, Page::Assessment).await?;
    let target_id = known_target_id(&state, &id)?;

    let record = store.assessment(target_id).await?.unwrap_or_default();
    Ok(Json(record))
}

/// PATCH /api/v1/assessments/:id
pub async fn handle_patch_assessment(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<Value>,
) -> Result<Json<AssessmentRecord>, AppError> {
    let store = enforce(&state, &session, Page::Assessment).await?;
    let target_id = known_target_id(&state, &id)?;

    let _guard = state.lock_session(&store).await;
    let current = store.assessment(target_id).await?.unwrap_or_default();
    let updated = apply_patch(&current, &patch)?;
    store.save_assessment(target_id, &updated).await?;

    Ok(Json(updated))
}

/// POST /api/v1/assessments/:id/submit
///
/// Stores the full record and answers with the feedback for it.
pub async fn handle_submit_assessment(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    ApiJson(record): ApiJson<AssessmentRecord>,
) -> Result<Json<FeedbackReport>, AppError> {
    let store = enforce(&state, &session, Page::Assessment).await?;
    let target_id = known_target_id(&state, &id)?;

    {
        let _guard = state.lock_session(&store).await;
        store.save_assessment(target_id, &record).await?;
    }
    let report = feedback_for(&state.catalog, &id, &record)?;
    info!(
        target_id,
        findings = report.findings.len(),
        overall_score = report.overall_score,
        "Assessment submitted"
    );

    Ok(Json(report))
}
