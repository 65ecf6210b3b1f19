//! Step gating: decides whether a page may be entered given what the
//! session has completed so far.
//!
//! `evaluate_gate` is pure. `probe_gate_state` is the only part that reads
//! the store, and it only checks key presence.

pub mod handlers;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::AppError;
use crate::session::Session;
use crate::state::AppState;
use crate::store::{SessionStore, PROFILE_KEY, REQUIREMENTS_KEY};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RedirectTarget {
    Login,
    Profile,
    Requirements,
}

impl RedirectTarget {
    pub fn path(self) -> &'static str {
        match self {
            RedirectTarget::Login => "/login",
            RedirectTarget::Profile => "/profile",
            RedirectTarget::Requirements => "/requirements",
        }
    }

    pub fn error_code(self) -> &'static str {
        match self {
            RedirectTarget::Login => "AUTHENTICATION_REQUIRED",
            RedirectTarget::Profile => "PROFILE_REQUIRED",
            RedirectTarget::Requirements => "REQUIREMENTS_REQUIRED",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(tag = "decision", content = "target", rename_all = "snake_case")]
pub enum GateDecision {
    Allow,
    Redirect(RedirectTarget),
}

/// What the gate knows about a session. Derived on every request, never stored.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct GateState {
    pub is_authenticated: bool,
    pub has_profile: bool,
    pub has_requirements: bool,
}

/// Completion steps a page declares it needs. Authentication is implied.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct PagePrerequisites {
    pub require_profile: bool,
    pub require_requirements: bool,
}

impl PagePrerequisites {
    pub const AUTH_ONLY: Self = Self {
        require_profile: false,
        require_requirements: false,
    };
    pub const PROFILE: Self = Self {
        require_profile: true,
        require_requirements: false,
    };
    pub const FULL: Self = Self {
        require_profile: true,
        require_requirements: true,
    };

    /// Decodes a declaration from untrusted JSON. A flag that is missing or
    /// not a boolean counts as required.
    pub fn from_json(value: &Value) -> Self {
        let flag = |name: &str| value.get(name).and_then(Value::as_bool).unwrap_or(true);
        Self {
            require_profile: flag("require_profile"),
            require_requirements: flag("require_requirements"),
        }
    }
}

impl<'de> Deserialize<'de> for PagePrerequisites {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_json(&value))
    }
}

/// First failing check wins: login, then profile, then requirements.
pub fn evaluate_gate(state: &GateState, prerequisites: PagePrerequisites) -> GateDecision {
    if !state.is_authenticated {
        return GateDecision::Redirect(RedirectTarget::Login);
    }
    if prerequisites.require_profile && !state.has_profile {
        return GateDecision::Redirect(RedirectTarget::Profile);
    }
    if prerequisites.require_requirements && !state.has_requirements {
        return GateDecision::Redirect(RedirectTarget::Requirements);
    }
    GateDecision::Allow
}

/// Routable pages of the guided flow.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    Landing,
    Login,
    Profile,
    Requirements,
    Dashboard,
    TargetDetail,
    Assessment,
    Feedback,
}

impl Page {
    pub const ALL: [Page; 8] = [
        Page::Landing,
        Page::Login,
        Page::Profile,
        Page::Requirements,
        Page::Dashboard,
        Page::TargetDetail,
        Page::Assessment,
        Page::Feedback,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            Page::Landing => "landing",
            Page::Login => "login",
            Page::Profile => "profile",
            Page::Requirements => "requirements",
            Page::Dashboard => "dashboard",
            Page::TargetDetail => "university",
            Page::Assessment => "assessment",
            Page::Feedback => "feedback",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.slug() == slug)
    }

    /// `None` for public pages.
    pub fn prerequisites(self) -> Option<PagePrerequisites> {
        match self {
            Page::Landing | Page::Login => None,
            Page::Profile => Some(PagePrerequisites::AUTH_ONLY),
            Page::Requirements => Some(PagePrerequisites::PROFILE),
            Page::Dashboard | Page::TargetDetail | Page::Assessment | Page::Feedback => {
                Some(PagePrerequisites::FULL)
            }
        }
    }
}

pub fn evaluate_page(state: &GateState, page: Page) -> GateDecision {
    match page.prerequisites() {
        None => GateDecision::Allow,
        Some(prerequisites) => evaluate_gate(state, prerequisites),
    }
}

/// Builds the gate state for a session. Store failures leave the flag unset,
/// which routes the user back to the missing step instead of failing the page.
pub async fn probe_gate_state(session: &Session, store: Option<&SessionStore>) -> GateState {
    let Some(store) = store.filter(|_| session.is_authenticated()) else {
        return GateState::default();
    };

    GateState {
        is_authenticated: true,
        has_profile: probe_flag(store, PROFILE_KEY).await,
        has_requirements: probe_flag(store, REQUIREMENTS_KEY).await,
    }
}

async fn probe_flag(store: &SessionStore, key: &str) -> bool {
    match store.is_present(key).await {
        Ok(present) => present,
        Err(e) => {
            warn!("Gate probe for {key} failed, treating as absent: {e}");
            false
        }
    }
}

/// Runs the gate for `page` and hands back the session's store on `Allow`.
pub async fn enforce(
    state: &AppState,
    session: &Session,
    page: Page,
) -> Result<SessionStore, AppError> {
    let store = state.session_store(session);
    let gate_state = probe_gate_state(session, store.as_ref()).await;
    let decision = evaluate_page(&gate_state, page);
    debug!(?page, ?decision, "Gate evaluated");

    match (decision, store) {
        (GateDecision::Allow, Some(store)) => Ok(store),
        (GateDecision::Allow, None) => Err(AppError::Redirect(RedirectTarget::Login)),
        (GateDecision::Redirect(target), _) => Err(AppError::Redirect(target)),
    }
}
