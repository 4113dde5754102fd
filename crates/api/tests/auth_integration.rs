//! Integration tests for the auth gate: registration, login, refresh
//! rotation, and logout.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{register_user, request, test_app};

#[tokio::test]
async fn register_returns_user_and_tokens() {
    let app = test_app().await;
    let user = register_user(&app).await;

    assert!(!user.access_token.is_empty());
    assert!(!user.refresh_token.is_empty());

    // Registration also created the profile row.
    let (status, body) = request(&app, "GET", "/api/v1/auth/me", Some(&user.access_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["profile"]["username"], json!(user.username));
    assert_eq!(body["profile"]["has_onboarded"], json!(false));
}

#[tokio::test]
async fn register_rejects_duplicate_email() {
    let app = test_app().await;
    let user = register_user(&app).await;

    let (status, body) = request(
        &app,
        "POST",
        "/api/v1/auth/register",
        None,
        Some(json!({
            "email": user.email,
            "password": "S3curePass",
            "username": format!("{}x", user.username),
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], json!("conflict"));
}

#[tokio::test]
async fn register_rejects_duplicate_username() {
    let app = test_app().await;
    let user = register_user(&app).await;

    let (status, _) = request(
        &app,
        "POST",
        "/api/v1/auth/register",
        None,
        Some(json!({
            "email": format!("x{}", user.email),
            "password": "S3curePass",
            "username": user.username,
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn register_enforces_password_policy() {
    let app = test_app().await;

    for weak in ["short1A", "alllowercase1", "ALLUPPERCASE1", "NoDigitsHere"] {
        let (status, _) = request(
            &app,
            "POST",
            "/api/v1/auth/register",
            None,
            Some(json!({
                "email": format!("weak_{}@example.com", uuid::Uuid::new_v4().simple()),
                "password": weak,
                "username": "weakpw_user",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "accepted weak password {weak}");
    }
}

#[tokio::test]
async fn login_round_trip() {
    let app = test_app().await;
    let user = register_user(&app).await;

    let (status, body) = request(
        &app,
        "POST",
        "/api/v1/auth/login",
        None,
        Some(json!({ "email": user.email, "password": "S3curePass" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], json!(user.email));
    assert!(body["tokens"]["access_token"].as_str().is_some());
}

#[tokio::test]
async fn login_rejects_wrong_password() {
    let app = test_app().await;
    let user = register_user(&app).await;

    let (status, _) = request(
        &app,
        "POST",
        "/api/v1/auth/login",
        None,
        Some(json!({ "email": user.email, "password": "WrongPass1" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn refresh_rotates_the_pair() {
    let app = test_app().await;
    let user = register_user(&app).await;

    let (status, body) = request(
        &app,
        "POST",
        "/api/v1/auth/refresh",
        None,
        Some(json!({ "refresh_token": user.refresh_token })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let rotated = body["refresh_token"].as_str().unwrap().to_string();
    assert_ne!(rotated, user.refresh_token);

    // The old refresh token is dead after rotation.
    let (status, _) = request(
        &app,
        "POST",
        "/api/v1/auth/refresh",
        None,
        Some(json!({ "refresh_token": user.refresh_token })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // The rotated one works.
    let (status, _) = request(
        &app,
        "POST",
        "/api/v1/auth/refresh",
        None,
        Some(json!({ "refresh_token": rotated })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn logout_invalidates_refresh_token() {
    let app = test_app().await;
    let user = register_user(&app).await;

    let (status, _) = request(
        &app,
        "POST",
        "/api/v1/auth/logout",
        None,
        Some(json!({ "refresh_token": user.refresh_token })),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = request(
        &app,
        "POST",
        "/api/v1/auth/refresh",
        None,
        Some(json!({ "refresh_token": user.refresh_token })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn protected_routes_require_a_token() {
    let app = test_app().await;

    let (status, _) = request(&app, "GET", "/api/v1/matches", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = request(&app, "GET", "/api/v1/discover", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn health_endpoints_are_public() {
    let app = test_app().await;

    let (status, body) = request(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("healthy"));

    let (status, _) = request(&app, "GET", "/health/live", None, None).await;
    assert_eq!(status, StatusCode::OK);
}
