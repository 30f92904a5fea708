//! Shared test helpers for integration tests.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use docspace_api::{AppState, build_app};
use docspace_core::config::{AppConfig, DatabaseProvider, PasswordHashingConfig};
use docspace_core::types::UserId;
use docspace_database::Repositories;
use docspace_entity::group::GroupRole;

/// Test application context
pub struct TestApp {
    /// The Axum app for making test requests
    pub router: Router,
    /// Shared state, for seeding and direct component access
    pub state: AppState,
}

impl TestApp {
    /// Create a new test application on fresh in-memory tables
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    /// Create a test application with a custom configuration
    pub fn with_config(config: AppConfig) -> Self {
        let state =
            AppState::new(config, Repositories::memory()).expect("Failed to build app state");
        let router = build_app(state.clone());
        Self { router, state }
    }

    /// Register a user over HTTP and return their ID
    pub async fn register(&self, username: &str, password: &str) -> UserId {
        let response = self
            .request(
                "POST",
                "/api/auth/register",
                Some(serde_json::json!({
                    "email": format!("{username}@example.com"),
                    "username": username,
                    "password": password,
                })),
                None,
            )
            .await;
        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "Register failed: {:?}",
            response.body
        );

        serde_json::from_value(response.body["userId"].clone()).expect("No userId in response")
    }

    /// Put `user_id` into a fresh group with `role`
    pub async fn grant_role(&self, user_id: UserId, role: GroupRole) {
        let groups = &self.state.repositories.groups;
        let group = groups
            .create(&format!("{role}-{user_id}"), None, role)
            .await
            .expect("Failed to create group");
        groups
            .add_member(group.id, user_id)
            .await
            .expect("Failed to add member");
    }

    /// Login and return the bearer token
    pub async fn login(&self, identifier: &str, password: &str) -> String {
        let response = self
            .request(
                "POST",
                "/api/auth/login",
                Some(serde_json::json!({
                    "identifier": identifier,
                    "password": password,
                })),
                None,
            )
            .await;

        assert_eq!(
            response.status,
            StatusCode::OK,
            "Login failed: {:?}",
            response.body
        );

        response.body["token"]
            .as_str()
            .expect("No token in login response")
            .to_string()
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();
        self.request_raw(method, path, body_str, token).await
    }

    /// Make an HTTP request with a raw (possibly invalid) JSON body
    pub async fn request_raw(
        &self,
        method: &str,
        path: &str,
        body_str: String,
        token: Option<&str>,
    ) -> TestResponse {
        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json")
            .header("User-Agent", "docspace-tests/1.0");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Fast hashing, a fixed secret, and the memory backend
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.database.provider = DatabaseProvider::Memory;
    config.auth.jwt_secret = "integration-test-secret-at-least-32-bytes".to_string();
    config.auth.hashing = PasswordHashingConfig {
        memory_kib: 1024,
        iterations: 1,
        parallelism: 1,
    };
    config.session.cleanup.enabled = false;
    config
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// The `error` code of an error body
    pub fn error_code(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }
}
