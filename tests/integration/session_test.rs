//! Integration tests for session revocation and sweeping.

use axum::http::StatusCode;
use chrono::{Duration, Utc};

use docspace_auth::session::SessionCleanup;
use docspace_core::types::SessionId;
use docspace_entity::session::Session;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_deactivation_revokes_live_tokens() {
    let app = TestApp::new();
    let user_id = app.register("sam", "correct-horse").await;
    let token = app.login("sam", "correct-horse").await;

    let revoked = app
        .state
        .authenticator
        .deactivate_user(user_id)
        .await
        .unwrap();
    assert_eq!(revoked, 1);

    let response = app
        .request("GET", "/api/v1/me/profile", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let login = app
        .request(
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({"identifier": "sam", "password": "correct-horse"})),
            None,
        )
        .await;
    assert_eq!(login.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_sweeper_removes_only_expired_sessions() {
    let app = TestApp::new();
    let user_id = app.register("tess", "correct-horse").await;
    let token = app.login("tess", "correct-horse").await;

    let stale = Session::start(
        SessionId::new(),
        user_id,
        None,
        None,
        Utc::now() - Duration::days(2),
        Duration::days(1),
    );
    app.state.sessions.create(&stale).await.unwrap();

    let purged = SessionCleanup::new(app.state.sessions.clone())
        .run_cleanup()
        .await
        .unwrap();
    assert_eq!(purged, 1);

    let err = app.state.sessions.get_by_id(stale.id).await.unwrap_err();
    assert_eq!(err.kind, docspace_core::ErrorKind::NotFound);

    let response = app
        .request("GET", "/api/auth/validate", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_health_reports_memory_backend() {
    let app = TestApp::new();
    let response = app.request("GET", "/api/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
    assert_eq!(response.body["database"], "memory");
}
