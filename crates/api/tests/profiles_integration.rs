//! Integration tests for profile read/write and onboarding.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{register_user, request, test_app};

#[tokio::test]
async fn update_profile_and_complete_onboarding() {
    let app = test_app().await;
    let user = register_user(&app).await;

    let (status, body) = request(
        &app,
        "PUT",
        "/api/v1/profiles/me",
        Some(&user.access_token),
        Some(json!({
            "full_name": "Wonyoung Jang",
            "program": "Psychology",
            "year": "U1",
            "bio": "Library regular",
            "current_subject": "Cognition",
            "courses": ["PSYC213", "COMP202"],
            "availability": [
                { "day": "tue", "start": "13:00", "end": "18:00" },
                { "day": "fri", "start": "09:00", "end": "11:00" }
            ],
            "has_onboarded": true,
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["full_name"], json!("Wonyoung Jang"));
    assert_eq!(body["courses"], json!(["PSYC213", "COMP202"]));
    assert_eq!(body["availability"][0]["day"], json!("tue"));
    assert_eq!(body["has_onboarded"], json!(true));

    // Untouched fields survive a later partial update.
    let (status, body) = request(
        &app,
        "PUT",
        "/api/v1/profiles/me",
        Some(&user.access_token),
        Some(json!({ "bio": "Now in the cafe" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["bio"], json!("Now in the cafe"));
    assert_eq!(body["program"], json!("Psychology"));
}

#[tokio::test]
async fn update_rejects_bad_values() {
    let app = test_app().await;
    let user = register_user(&app).await;

    let cases = [
        json!({ "username": "x" }),
        json!({ "courses": ["comp302"] }),
        json!({ "availability": [{ "day": "someday", "start": "13:00", "end": "18:00" }] }),
        json!({ "availability": [{ "day": "mon", "start": "18:00", "end": "13:00" }] }),
        json!({ "avatar_url": "not a url" }),
    ];

    for body in cases {
        let (status, _) = request(
            &app,
            "PUT",
            "/api/v1/profiles/me",
            Some(&user.access_token),
            Some(body.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "accepted {}", body);
    }
}

#[tokio::test]
async fn username_collision_is_a_conflict() {
    let app = test_app().await;
    let first = register_user(&app).await;
    let second = register_user(&app).await;

    let (status, _) = request(
        &app,
        "PUT",
        "/api/v1/profiles/me",
        Some(&second.access_token),
        Some(json!({ "username": first.username })),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn study_hours_accumulate() {
    let app = test_app().await;
    let user = register_user(&app).await;

    let (status, body) = request(
        &app,
        "POST",
        "/api/v1/profiles/me/study-hours",
        Some(&user.access_token),
        Some(json!({ "hours": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["study_hours"], json!(3));

    let (_, body) = request(
        &app,
        "POST",
        "/api/v1/profiles/me/study-hours",
        Some(&user.access_token),
        Some(json!({ "hours": 2 })),
    )
    .await;
    assert_eq!(body["study_hours"], json!(5));

    let (status, _) = request(
        &app,
        "POST",
        "/api/v1/profiles/me/study-hours",
        Some(&user.access_token),
        Some(json!({ "hours": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn profiles_are_readable_by_other_users() {
    let app = test_app().await;
    let owner = register_user(&app).await;
    let viewer = register_user(&app).await;

    let (status, body) = request(
        &app,
        "GET",
        &format!("/api/v1/profiles/{}", owner.id),
        Some(&viewer.access_token),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], json!(owner.username));

    let (status, _) = request(
        &app,
        "GET",
        &format!("/api/v1/profiles/{}", uuid::Uuid::new_v4()),
        Some(&viewer.access_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
