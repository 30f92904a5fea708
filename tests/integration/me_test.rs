//! Integration tests for the self-service routes.

use axum::http::StatusCode;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_profile_hides_password_hash() {
    let app = TestApp::new();
    app.register("nina", "correct-horse").await;
    let token = app.login("nina", "correct-horse").await;

    let response = app
        .request("GET", "/api/v1/me/profile", None, Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["username"], "nina");
    assert_eq!(response.body["email"], "nina@example.com");
    assert!(response.body.get("passwordHash").is_none());
    assert!(response.body.get("password_hash").is_none());
}

#[tokio::test]
async fn test_profile_requires_token() {
    let app = TestApp::new();
    let response = app.request("GET", "/api/v1/me/profile", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_preferences_round_trip() {
    let app = TestApp::new();
    app.register("otto", "correct-horse").await;
    let token = app.login("otto", "correct-horse").await;

    let prefs = serde_json::json!({"theme": "dark", "pageSize": 50});
    let put = app
        .request("PUT", "/api/v1/me/preferences", Some(prefs.clone()), Some(&token))
        .await;
    assert_eq!(put.status, StatusCode::OK);

    let get = app
        .request("GET", "/api/v1/me/preferences", None, Some(&token))
        .await;
    assert_eq!(get.status, StatusCode::OK);
    assert_eq!(get.body, prefs);
}

#[tokio::test]
async fn test_preferences_must_be_an_object() {
    let app = TestApp::new();
    app.register("pia", "correct-horse").await;
    let token = app.login("pia", "correct-horse").await;

    let response = app
        .request(
            "PUT",
            "/api/v1/me/preferences",
            Some(serde_json::json!(["dark"])),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_change_password() {
    let app = TestApp::new();
    app.register("quinn", "correct-horse").await;
    let token = app.login("quinn", "correct-horse").await;

    let wrong = app
        .request(
            "PUT",
            "/api/v1/me/change-password",
            Some(serde_json::json!({
                "currentPassword": "not-my-password",
                "newPassword": "battery-staple",
            })),
            Some(&token),
        )
        .await;
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);

    let ok = app
        .request(
            "PUT",
            "/api/v1/me/change-password",
            Some(serde_json::json!({
                "currentPassword": "correct-horse",
                "newPassword": "battery-staple",
            })),
            Some(&token),
        )
        .await;
    assert_eq!(ok.status, StatusCode::OK);

    let old = app
        .request(
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({"identifier": "quinn", "password": "correct-horse"})),
            None,
        )
        .await;
    assert_eq!(old.status, StatusCode::UNAUTHORIZED);
    app.login("quinn", "battery-staple").await;
}

#[tokio::test]
async fn test_sessions_lists_current() {
    let app = TestApp::new();
    app.register("rosa", "correct-horse").await;
    let first = app.login("rosa", "correct-horse").await;
    let _second = app.login("rosa", "correct-horse").await;

    let response = app
        .request("GET", "/api/v1/me/sessions", None, Some(&first))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let sessions = response.body.as_array().unwrap();
    assert_eq!(sessions.len(), 2);
    assert_eq!(sessions.iter().filter(|s| s["current"] == true).count(), 1);
    assert!(sessions.iter().all(|s| s["userAgent"] == "docspace-tests/1.0"));
}
