pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::assessment::handlers as assessment;
use crate::catalog::handlers as catalog;
use crate::feedback::handlers as feedback;
use crate::gating::handlers as gating;
use crate::profile::handlers as profile;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Gate API
        .route("/api/v1/gate", post(gating::handle_gate_custom))
        .route("/api/v1/gate/:page", get(gating::handle_gate_page))
        // Profile & study requirements
        .route(
            "/api/v1/profile",
            get(profile::handle_get_profile).put(profile::handle_put_profile),
        )
        .route(
            "/api/v1/requirements",
            get(profile::handle_get_requirements).put(profile::handle_put_requirements),
        )
        // University catalog
        .route("/api/v1/targets", get(catalog::handle_list_targets))
        .route("/api/v1/targets/:id", get(catalog::handle_get_target))
        // Self-assessment & feedback
        .route(
            "/api/v1/assessments/:id",
            get(assessment::handle_get_assessment).patch(assessment::handle_patch_assessment),
        )
        .route(
            "/api/v1/assessments/:id/submit",
            post(assessment::handle_submit_assessment),
        )
        .route("/api/v1/feedback/:id", get(feedback::handle_get_feedback))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::catalog::Catalog;
    use crate::config::Config;
    use crate::session::{AUTH_USER_HEADER, SESSION_HEADER};
    use crate::store::{KvStore, MemoryStore, StoreError};

    fn test_router() -> Router {
        router_with(Arc::new(MemoryStore::new()))
    }

    fn router_with(store: Arc<dyn KvStore>) -> Router {
        build_router(AppState::new(
            store,
            Arc::new(Catalog::embedded().unwrap()),
            Config::default(),
        ))
    }

    /// Memory store whose reads take a while, so overlapping requests
    /// interleave between their read and their write.
    struct SlowReadStore(MemoryStore);

    #[async_trait]
    impl KvStore for SlowReadStore {
        async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            let value = self.0.get(key).await;
            tokio::time::sleep(Duration::from_millis(20)).await;
            value
        }

        async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
            self.0.set(key, value).await
        }
    }

    async fn onboard(app: &Router, session: Option<Uuid>) {
        let (status, _) =
            call(app, Method::PUT, "/api/v1/profile", session, Some(profile_body())).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = call(
            app,
            Method::PUT,
            "/api/v1/requirements",
            session,
            Some(json!({
                "targetCountry": "USA",
                "studyLevel": "masters",
                "targetCourse": "CS",
                "startDate": "2999-01"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    async fn call(
        app: &Router,
        method: Method,
        uri: &str,
        session: Option<Uuid>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(id) = session {
            builder = builder
                .header(SESSION_HEADER, id.to_string())
                .header(AUTH_USER_HEADER, "sam@example.com");
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    fn profile_body() -> Value {
        json!({
            "email": "sam@example.com",
            "intake_year": "2999",
            "degree_level_target": "masters",
            "intended_majors": ["Computer Science"],
            "preferred_countries": ["USA"],
            "budget_total_per_year": "40000",
            "currency": "USD",
            "highest_education": "bachelors",
            "gpa_status": "known",
            "gpa_value": "3.5",
            "gpa_scale": "4.0",
            "english_test_type": "ielts",
            "ielts_score": "6.0",
            "gre_total": "310"
        })
    }

    #[tokio::test]
    async fn test_health() {
        let app = test_router();
        let (status, body) = call(&app, Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["store"], "memory");
        assert_eq!(body["targets"], 8);
    }

    #[tokio::test]
    async fn test_anonymous_dashboard_redirects_to_login() {
        let app = test_router();
        let (status, body) = call(&app, Method::GET, "/api/v1/targets", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["redirect"], "/login");
    }

    #[tokio::test]
    async fn test_gate_endpoint_reports_next_step() {
        let app = test_router();
        let session = Some(Uuid::new_v4());

        let (status, body) = call(&app, Method::GET, "/api/v1/gate/dashboard", session, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["redirect"], "/profile");

        let (status, _) = call(&app, Method::GET, "/api/v1/gate/nowhere", session, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = call(
            &app,
            Method::POST,
            "/api/v1/gate",
            session,
            Some(json!({ "prerequisites": { "require_profile": false, "require_requirements": false } })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.get("redirect").is_none());
    }

    #[tokio::test]
    async fn test_invalid_profile_is_rejected() {
        let app = test_router();
        let session = Some(Uuid::new_v4());
        let (status, body) = call(
            &app,
            Method::PUT,
            "/api/v1/profile",
            session,
            Some(json!({ "email": "sam@example.com" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

        let (status, _) = call(&app, Method::GET, "/api/v1/requirements", session, None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_full_journey() {
        let app = test_router();
        let session = Some(Uuid::new_v4());

        let (status, _) =
            call(&app, Method::PUT, "/api/v1/profile", session, Some(profile_body())).await;
        assert_eq!(status, StatusCode::OK);

        // Requirements still missing: the dashboard sends the user there.
        let (status, body) = call(&app, Method::GET, "/api/v1/targets", session, None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"]["redirect"], "/requirements");

        let requirements = json!({
            "targetCountry": "USA",
            "studyLevel": "masters",
            "targetCourse": "Computer Science",
            "startDate": "2999-09"
        });
        let (status, _) =
            call(&app, Method::PUT, "/api/v1/requirements", session, Some(requirements)).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = call(&app, Method::GET, "/api/v1/targets", session, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["safe"].as_array().unwrap().len(), 2);

        let (status, body) = call(&app, Method::GET, "/api/v1/targets/1", session, None).await;
        assert_eq!(status, StatusCode::OK);
        let checks = body["requirementChecks"].as_array().unwrap();
        assert!(checks
            .iter()
            .any(|c| c["label"] == "IELTS" && c["status"] == "below"));

        // No assessment stored yet.
        let (status, _) = call(&app, Method::GET, "/api/v1/feedback/1", session, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = call(&app, Method::GET, "/api/v1/assessments/1", session, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["lors"]["count"], "0");

        let patch = json!({
            "ielts": { "score": "6.0" },
            "gre": { "score": "310" },
            "lors": { "count": "1" },
            "sop": { "status": "in_progress" }
        });
        let (status, body) =
            call(&app, Method::PATCH, "/api/v1/assessments/1", session, Some(patch)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["sop"]["status"], "in_progress");
        assert_eq!(body["transcripts"]["status"], "not_started");

        let (status, body) = call(&app, Method::GET, "/api/v1/feedback/1", session, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["high_priority_count"], 2);
        assert_eq!(body["overall_score"], 0);
        let categories: Vec<_> = body["findings"]
            .as_array()
            .unwrap()
            .iter()
            .map(|f| f["category"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(categories, vec!["IELTS", "GRE", "LORs", "SOP", "Overall"]);

        let (status, _) = call(&app, Method::GET, "/api/v1/feedback/99", session, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_submit_persists_and_returns_feedback() {
        let app = test_router();
        let session = Some(Uuid::new_v4());
        call(&app, Method::PUT, "/api/v1/profile", session, Some(profile_body())).await;
        call(
            &app,
            Method::PUT,
            "/api/v1/requirements",
            session,
            Some(json!({
                "targetCountry": "USA",
                "studyLevel": "masters",
                "targetCourse": "CS",
                "startDate": "2999-01"
            })),
        )
        .await;

        let record = json!({
            "ielts": { "score": "7.5", "status": "completed" },
            "lors": { "count": "2", "status": "completed" },
            "sop": { "status": "completed" }
        });
        let (status, body) = call(
            &app,
            Method::POST,
            "/api/v1/assessments/1/submit",
            session,
            Some(record),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["high_priority_count"], 0);
        assert_eq!(body["overall_score"], 38);

        let (_, stored) = call(&app, Method::GET, "/api/v1/assessments/1", session, None).await;
        assert_eq!(stored["ielts"]["score"], "7.5");
        assert_eq!(stored["gre"]["status"], "not_started");
    }

    #[tokio::test]
    async fn test_concurrent_patches_keep_both_updates() {
        let app = router_with(Arc::new(SlowReadStore(MemoryStore::new())));
        let session = Some(Uuid::new_v4());
        onboard(&app, session).await;

        let first = call(
            &app,
            Method::PATCH,
            "/api/v1/assessments/1",
            session,
            Some(json!({ "gre": { "score": "320" } })),
        );
        let second = call(
            &app,
            Method::PATCH,
            "/api/v1/assessments/1",
            session,
            Some(json!({ "sop": { "status": "completed" } })),
        );
        let ((first_status, _), (second_status, _)) = tokio::join!(first, second);
        assert_eq!(first_status, StatusCode::OK);
        assert_eq!(second_status, StatusCode::OK);

        let (_, stored) = call(&app, Method::GET, "/api/v1/assessments/1", session, None).await;
        assert_eq!(stored["gre"]["score"], "320");
        assert_eq!(stored["sop"]["status"], "completed");
    }

    #[tokio::test]
    async fn test_malformed_body_uses_error_envelope() {
        let app = test_router();
        let session = Uuid::new_v4();
        onboard(&app, Some(session)).await;

        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/v1/assessments/1/submit")
            .header(SESSION_HEADER, session.to_string())
            .header(AUTH_USER_HEADER, "sam@example.com")
            .header("content-type", "application/json")
            .body(Body::from("{\"ielts\": "))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(body["error"]["message"].is_string());

        // Nothing was stored by the rejected submit.
        let (status, _) = call(&app, Method::GET, "/api/v1/feedback/1", Some(session), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
