//! Integration tests for direct messaging and session chat.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{
    create_session, make_match, register_onboarded_user, request, test_app,
};

#[tokio::test]
async fn matched_users_can_message_each_other() {
    let app = test_app().await;
    let a = register_onboarded_user(&app).await;
    let b = register_onboarded_user(&app).await;
    let match_id = make_match(&app, &a, &b).await;

    let path = format!("/api/v1/matches/{}/messages", match_id);

    let (status, body) = request(
        &app,
        "POST",
        &path,
        Some(&a.access_token),
        Some(json!({ "content": "Want to study for the midterm together?" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["sender_id"], json!(a.id.to_string()));

    let (status, _) = request(
        &app,
        "POST",
        &path,
        Some(&b.access_token),
        Some(json!({ "content": "Yes! Tomorrow afternoon?" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // History is chronological and visible to both sides.
    for user in [&a, &b] {
        let (status, body) = request(&app, "GET", &path, Some(&user.access_token), None).await;
        assert_eq!(status, StatusCode::OK);

        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(
            messages[0]["content"],
            json!("Want to study for the midterm together?")
        );
        assert_eq!(messages[1]["content"], json!("Yes! Tomorrow afternoon?"));
    }

    // The latest message shows up in the matches summary.
    let (_, body) = request(&app, "GET", "/api/v1/matches", Some(&a.access_token), None).await;
    assert_eq!(
        body["matches"][0]["last_message"],
        json!("Yes! Tomorrow afternoon?")
    );
}

#[tokio::test]
async fn outsiders_cannot_touch_a_conversation() {
    let app = test_app().await;
    let a = register_onboarded_user(&app).await;
    let b = register_onboarded_user(&app).await;
    let outsider = register_onboarded_user(&app).await;
    let match_id = make_match(&app, &a, &b).await;

    let path = format!("/api/v1/matches/{}/messages", match_id);

    let (status, _) = request(&app, "GET", &path, Some(&outsider.access_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = request(
        &app,
        "POST",
        &path,
        Some(&outsider.access_token),
        Some(json!({ "content": "let me in" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn blank_messages_are_rejected() {
    let app = test_app().await;
    let a = register_onboarded_user(&app).await;
    let b = register_onboarded_user(&app).await;
    let match_id = make_match(&app, &a, &b).await;

    let path = format!("/api/v1/matches/{}/messages", match_id);

    for content in ["", "   ", "\n\t"] {
        let (status, _) = request(
            &app,
            "POST",
            &path,
            Some(&a.access_token),
            Some(json!({ "content": content })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn history_pages_backwards_with_cursors() {
    let app = test_app().await;
    let a = register_onboarded_user(&app).await;
    let b = register_onboarded_user(&app).await;
    let match_id = make_match(&app, &a, &b).await;

    let path = format!("/api/v1/matches/{}/messages", match_id);
    for i in 0..5 {
        let (status, _) = request(
            &app,
            "POST",
            &path,
            Some(&a.access_token),
            Some(json!({ "content": format!("message {}", i) })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    // Newest page of two.
    let (status, body) = request(
        &app,
        "GET",
        &format!("{}?limit=2", path),
        Some(&b.access_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let page = body["messages"].as_array().unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(page[0]["content"], json!("message 3"));
    assert_eq!(page[1]["content"], json!("message 4"));

    // Follow the cursor to the older page.
    let cursor = body["next_cursor"].as_str().expect("cursor expected");
    let (_, body) = request(
        &app,
        "GET",
        &format!("{}?limit=2&cursor={}", path, cursor),
        Some(&b.access_token),
        None,
    )
    .await;
    let page = body["messages"].as_array().unwrap();
    assert_eq!(page[0]["content"], json!("message 1"));
    assert_eq!(page[1]["content"], json!("message 2"));

    let (status, _) = request(
        &app,
        "GET",
        &format!("{}?cursor=!!bogus!!", path),
        Some(&b.access_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn session_chat_requires_an_accepted_seat() {
    let app = test_app().await;
    let host = register_onboarded_user(&app).await;
    let member = register_onboarded_user(&app).await;
    let invited = register_onboarded_user(&app).await;
    let session_id = create_session(&app, &host, 5, true).await;

    let chat_path = format!("/api/v1/sessions/{}/messages", session_id);

    // Host can chat immediately.
    let (status, _) = request(
        &app,
        "POST",
        &chat_path,
        Some(&host.access_token),
        Some(json!({ "content": "Welcome everyone" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // A joined member can chat.
    let (status, _) = request(
        &app,
        "POST",
        &format!("/api/v1/sessions/{}/join", session_id),
        Some(&member.access_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = request(
        &app,
        "POST",
        &chat_path,
        Some(&member.access_token),
        Some(json!({ "content": "Thanks for hosting!" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["sender"]["username"], json!(member.username));

    // A merely-invited user cannot chat until they accept.
    let (status, _) = request(
        &app,
        "POST",
        &format!("/api/v1/sessions/{}/invitations", session_id),
        Some(&host.access_token),
        Some(json!({ "user_id": invited.id })),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = request(
        &app,
        "POST",
        &chat_path,
        Some(&invited.access_token),
        Some(json!({ "content": "hello?" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = request(&app, "GET", &chat_path, Some(&invited.access_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // History carries sender summaries in order.
    let (status, body) = request(&app, "GET", &chat_path, Some(&host.access_token), None).await;
    assert_eq!(status, StatusCode::OK);
    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["sender"]["username"], json!(host.username));
    assert_eq!(messages[1]["sender"]["username"], json!(member.username));
}
