//! Axum route handlers for the Gate API.
//!
//! The front-end calls these before rendering a page; the JSON decision tells
//! it whether to render or where to send the user.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::AppError;
use crate::extract::ApiJson;
use crate::gating::{
    evaluate_gate, evaluate_page, probe_gate_state, GateDecision, GateState, Page,
    PagePrerequisites,
};
use crate::session::Session;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct GateResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<Page>,
    pub state: GateState,
    pub decision: GateDecision,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<&'static str>,
}

impl GateResponse {
    fn new(page: Option<Page>, state: GateState, decision: GateDecision) -> Self {
        let redirect = match decision {
            GateDecision::Allow => None,
            GateDecision::Redirect(target) => Some(target.path()),
        };
        Self {
            page,
            state,
            decision,
            redirect,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GateRequest {
    #[serde(default)]
    pub prerequisites: Value,
}

/// GET /api/v1/gate/:page
pub async fn handle_gate_page(
    State(state): State<AppState>,
    session: Session,
    Path(slug): Path<String>,
) -> Result<Json<GateResponse>, AppError> {
    let page =
        Page::from_slug(&slug).ok_or_else(|| AppError::NotFound(format!("Page {slug} not found")))?;

    let store = state.session_store(&session);
    let gate_state = probe_gate_state(&session, store.as_ref()).await;
    let decision = evaluate_page(&gate_state, page);

    Ok(Json(GateResponse::new(Some(page), gate_state, decision)))
}

/// POST /api/v1/gate
///
/// Evaluates prerequisites declared by the caller. Flags that are missing or
/// not booleans are treated as required.
pub async fn handle_gate_custom(
    State(state): State<AppState>,
    session: Session,
    ApiJson(request): ApiJson<GateRequest>,
) -> Result<Json<GateResponse>, AppError> {
    let prerequisites = PagePrerequisites::from_json(&request.prerequisites);

    let store = state.session_store(&session);
    let gate_state = probe_gate_state(&session, store.as_ref()).await;
    let decision = evaluate_gate(&gate_state, prerequisites);

    Ok(Json(GateResponse::new(None, gate_state, decision)))
}
