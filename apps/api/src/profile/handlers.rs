use axum::{extract::State, Json};
use chrono::{Datelike, Utc};
use tracing::info;

use crate::errors::AppError;
use crate::extract::ApiJson;
use crate::gating::{enforce, Page};
use crate::models::profile::{Profile, Requirements};
use crate::profile::validation::{validate_profile, validate_requirements};
use crate::session::Session;
use crate::state::AppState;

/// GET /api/v1/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<Option<Profile>>, AppError> {
    let store = enforce(&state, &session, Page::Profile).await?;
    Ok(Json(store.profile().await?))
}

/// PUT /api/v1/profile
pub async fn handle_put_profile(
    State(state): State<AppState>,
    session: Session,
    ApiJson(profile): ApiJson<Profile>,
) -> Result<Json<Profile>, AppError> {
    let store = enforce(&state, &session, Page::Profile).await?;

    let report = validate_profile(&profile, Utc::now().year());
    if !report.passed {
        return Err(AppError::Validation(report.summary()));
    }

    store.save_profile(&profile).await?;
    info!("Profile saved for session {:?}", session.id);
    Ok(Json(profile))
}

/// GET /api/v1/requirements
pub async fn handle_get_requirements(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<Option<Requirements>>, AppError> {
    let store = enforce(&state, &session, Page::Requirements).await?;
    Ok(Json(store.requirements().await?))
}

/// PUT /api/v1/requirements
pub async fn handle_put_requirements(
    State(state): State<AppState>,
    session: Session,
    ApiJson(requirements): ApiJson<Requirements>,
) -> Result<Json<Requirements>, AppError> {
    let store = enforce(&state, &session, Page::Requirements).await?;

    let report = validate_requirements(&requirements);
    if !report.passed {
        return Err(AppError::Validation(report.summary()));
    }

    store.save_requirements(&requirements).await?;
    info!("Requirements saved for session {:?}", session.id);
    Ok(Json(requirements))
}
