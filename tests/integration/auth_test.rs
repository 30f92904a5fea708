//! Integration tests for the authentication flow.

use axum::http::StatusCode;
use chrono::{Duration, Utc};

use docspace_auth::jwt::{JwtDecoder, JwtEncoder};
use docspace_core::types::SessionId;
use docspace_entity::session::Session;

use crate::helpers::{TestApp, test_config};

#[tokio::test]
async fn test_login_success() {
    let app = TestApp::new();
    let user_id = app.register("alice", "correct-horse").await;

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({
                "identifier": "ALICE@example.com",
                "password": "correct-horse",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body["token"].is_string());
    assert!(response.body["sessionId"].is_string());
    assert!(response.body["expiresAt"].is_string());
    assert_eq!(response.body["userId"], serde_json::json!(user_id));

    let claims = JwtDecoder::new(&test_config().auth)
        .verify(response.body["token"].as_str().unwrap())
        .unwrap();
    assert_eq!(claims.user_id(), user_id);

    let session = app.state.sessions.get_by_id(claims.session_id()).await.unwrap();
    assert_eq!(session.user_id, user_id);
    assert_eq!(
        session.expires_at - session.created_at,
        app.state.config.session.ttl()
    );
}

#[tokio::test]
async fn test_login_invalid_password_creates_no_session() {
    let app = TestApp::new();
    let user_id = app.register("bob", "correct-horse").await;

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({
                "identifier": "bob",
                "password": "wrong-horse",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    let sessions = app
        .state
        .repositories
        .sessions
        .find_active_by_user(user_id, Utc::now())
        .await
        .unwrap();
    assert!(sessions.is_empty());
}

#[tokio::test]
async fn test_unknown_user_and_wrong_password_look_the_same() {
    let app = TestApp::new();
    app.register("carol", "correct-horse").await;

    let wrong = app
        .request(
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({"identifier": "carol", "password": "nope-nope"})),
            None,
        )
        .await;
    let unknown = app
        .request(
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({"identifier": "nobody", "password": "nope-nope"})),
            None,
        )
        .await;

    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.body, unknown.body);
}

#[tokio::test]
async fn test_login_missing_fields_is_bad_request() {
    let app = TestApp::new();

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({"identifier": "", "password": "x"})),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "INVALID_INPUT");

    let response = app
        .request("POST", "/api/auth/login", Some(serde_json::json!({})), None)
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_undecodable_body_is_bad_request() {
    let app = TestApp::new();

    let wrong_type = app
        .request(
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({"identifier": 5, "password": "x"})),
            None,
        )
        .await;
    assert_eq!(wrong_type.status, StatusCode::BAD_REQUEST);
    assert_eq!(wrong_type.error_code(), "INVALID_INPUT");
    assert!(wrong_type.body["message"].is_string());

    let bad_syntax = app
        .request_raw("POST", "/api/auth/login", "{not json".to_string(), None)
        .await;
    assert_eq!(bad_syntax.status, StatusCode::BAD_REQUEST);
    assert_eq!(bad_syntax.error_code(), "INVALID_INPUT");
}

#[tokio::test]
async fn test_register_undecodable_body_is_bad_request() {
    let app = TestApp::new();

    let wrong_type = app
        .request(
            "POST",
            "/api/auth/register",
            Some(serde_json::json!({
                "email": "frank@example.com",
                "username": ["frank"],
                "password": "correct-horse",
            })),
            None,
        )
        .await;
    assert_eq!(wrong_type.status, StatusCode::BAD_REQUEST);
    assert_eq!(wrong_type.error_code(), "INVALID_INPUT");

    let bad_syntax = app
        .request_raw("POST", "/api/auth/register", "{\"email\":".to_string(), None)
        .await;
    assert_eq!(bad_syntax.status, StatusCode::BAD_REQUEST);
    assert_eq!(bad_syntax.error_code(), "INVALID_INPUT");
}

#[tokio::test]
async fn test_register_duplicate_is_conflict() {
    let app = TestApp::new();
    app.register("dave", "correct-horse").await;

    let response = app
        .request(
            "POST",
            "/api/auth/register",
            Some(serde_json::json!({
                "email": "DAVE@example.com",
                "username": "dave2",
                "password": "correct-horse",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.error_code(), "CONFLICT");

    let duplicate = app
        .state
        .repositories
        .users
        .find_by_identifier("dave2")
        .await
        .unwrap();
    assert!(duplicate.is_none());
}

#[tokio::test]
async fn test_register_malformed_email_is_bad_request() {
    let app = TestApp::new();

    let response = app
        .request(
            "POST",
            "/api/auth/register",
            Some(serde_json::json!({
                "email": "not-an-email",
                "username": "erin",
                "password": "correct-horse",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_short_password_is_bad_request() {
    let app = TestApp::new();

    let response = app
        .request(
            "POST",
            "/api/auth/register",
            Some(serde_json::json!({
                "email": "frank@example.com",
                "username": "frank",
                "password": "short",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_validate_live_token() {
    let app = TestApp::new();
    app.register("gina", "correct-horse").await;
    let token = app.login("gina", "correct-horse").await;

    let response = app
        .request("GET", "/api/auth/validate", None, Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["valid"], true);
}

#[tokio::test]
async fn test_logout_then_replay_is_rejected() {
    let app = TestApp::new();
    app.register("hank", "correct-horse").await;
    let token = app.login("hank", "correct-horse").await;

    let logout = app
        .request("GET", "/api/auth/logout", None, Some(&token))
        .await;
    assert_eq!(logout.status, StatusCode::OK);

    let replay = app
        .request("GET", "/api/v1/me/profile", None, Some(&token))
        .await;
    assert_eq!(replay.status, StatusCode::UNAUTHORIZED);

    let again = app
        .request("GET", "/api/auth/logout", None, Some(&token))
        .await;
    assert_eq!(again.status, StatusCode::UNAUTHORIZED);

    let validate = app
        .request("GET", "/api/auth/validate", None, Some(&token))
        .await;
    assert_eq!(validate.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_expired_session_is_rejected() {
    let app = TestApp::new();
    let user_id = app.register("ivy", "correct-horse").await;

    // Session already dead, token still within its own lifetime.
    let session_id = SessionId::new();
    let now = Utc::now();
    let session = Session::start(
        session_id,
        user_id,
        None,
        None,
        now - Duration::hours(2),
        Duration::hours(1),
    );
    app.state.sessions.create(&session).await.unwrap();
    let token = JwtEncoder::new(&test_config().auth)
        .issue(user_id, session_id, Duration::minutes(10))
        .unwrap();

    let validate = app
        .request("GET", "/api/auth/validate", None, Some(&token))
        .await;
    assert_eq!(validate.status, StatusCode::UNAUTHORIZED);
    assert_eq!(validate.error_code(), "EXPIRED");

    let protected = app
        .request("GET", "/api/v1/me/profile", None, Some(&token))
        .await;
    assert_eq!(protected.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_for_another_users_session_is_unauthorized() {
    let app = TestApp::new();
    let owner = app.register("jack", "correct-horse").await;
    let intruder = app.register("kate", "correct-horse").await;
    let token = app.login("jack", "correct-horse").await;

    let sessions = app.state.authenticator.sessions_for(owner).await.unwrap();
    let forged = JwtEncoder::new(&test_config().auth)
        .issue(intruder, sessions[0].id, Duration::minutes(10))
        .unwrap();

    let response = app
        .request("GET", "/api/auth/validate", None, Some(&forged))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let genuine = app
        .request("GET", "/api/auth/validate", None, Some(&token))
        .await;
    assert_eq!(genuine.status, StatusCode::OK);
}

#[tokio::test]
async fn test_bad_tokens_are_unauthorized() {
    let app = TestApp::new();
    app.register("lena", "correct-horse").await;
    let token = app.login("lena", "correct-horse").await;

    let missing = app.request("GET", "/api/auth/validate", None, None).await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);

    let garbage = app
        .request("GET", "/api/auth/validate", None, Some("not.a.jwt"))
        .await;
    assert_eq!(garbage.status, StatusCode::UNAUTHORIZED);

    let (head, signature) = token.rsplit_once('.').unwrap();
    let tampered = format!("{head}.{}", signature.chars().rev().collect::<String>());
    let tampered = app
        .request("GET", "/api/auth/validate", None, Some(&tampered))
        .await;
    assert_eq!(tampered.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_concurrent_logins_yield_independent_sessions() {
    let app = TestApp::new();
    let user_id = app.register("mona", "correct-horse").await;

    let (a, b) = tokio::join!(
        app.login("mona", "correct-horse"),
        app.login("mona@example.com", "correct-horse"),
    );
    assert_ne!(a, b);

    for token in [&a, &b] {
        let response = app
            .request("GET", "/api/auth/validate", None, Some(token))
            .await;
        assert_eq!(response.status, StatusCode::OK);
    }

    let sessions = app.state.authenticator.sessions_for(user_id).await.unwrap();
    assert_eq!(sessions.len(), 2);

    let logout = app
        .request("GET", "/api/auth/logout", None, Some(&a))
        .await;
    assert_eq!(logout.status, StatusCode::OK);
    let still_live = app
        .request("GET", "/api/auth/validate", None, Some(&b))
        .await;
    assert_eq!(still_live.status, StatusCode::OK);
}
