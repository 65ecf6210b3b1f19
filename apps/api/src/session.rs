use std::convert::Infallible;

use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

/// Names the per-browser namespace in the profile store.
pub const SESSION_HEADER: &str = "x-session-id";
/// Set by the authentication proxy in front of the service.
pub const AUTH_USER_HEADER: &str = "x-authenticated-user";

/// Caller identity as seen by the gate. Never rejects: a request without
/// headers is simply an anonymous session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub id: Option<Uuid>,
    pub user: Option<String>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.id.is_some() && self.user.is_some()
    }

    fn from_parts(parts: &Parts) -> Self {
        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        };

        Session {
            id: header(SESSION_HEADER).and_then(|v| Uuid::parse_str(v).ok()),
            user: header(AUTH_USER_HEADER).map(str::to_string),
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Session::from_parts(parts))
    }
}
