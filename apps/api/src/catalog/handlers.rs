use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::catalog::comparison::{compare_profile, RequirementCheck};
use crate::errors::AppError;
use crate::gating::{enforce, Page};
use crate::models::target::TargetRecord;
use crate::session::Session;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct TargetListResponse {
    pub safe: Vec<TargetRecord>,
    pub moderate: Vec<TargetRecord>,
    pub ambitious: Vec<TargetRecord>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetDetailResponse {
    pub target: TargetRecord,
    pub requirement_checks: Vec<RequirementCheck>,
}

/// GET /api/v1/targets
pub async fn handle_list_targets(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<TargetListResponse>, AppError> {
    enforce(&state, &session, Page::Dashboard).await?;

    let grouped = state.catalog.list_targets_by_category();
    let owned = |targets: Vec<&TargetRecord>| targets.into_iter().cloned().collect();
    Ok(Json(TargetListResponse {
        safe: owned(grouped.safe),
        moderate: owned(grouped.moderate),
        ambitious: owned(grouped.ambitious),
    }))
}

/// GET /api/v1/targets/:id
pub async fn handle_get_target(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Json<TargetDetailResponse>, AppError> {
    let store = enforce(&state, &session, Page::TargetDetail).await?;

    let target = state
        .catalog
        .get_target_by_id(&id)
        .ok_or_else(|| AppError::NotFound(format!("Target {id} not found")))?;

    let profile = store.profile().await?.unwrap_or_default();
    let requirement_checks = compare_profile(target, &profile);

    Ok(Json(TargetDetailResponse {
        target: target.clone(),
        requirement_checks,
    }))
}
