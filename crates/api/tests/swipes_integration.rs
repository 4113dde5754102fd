//! Integration tests for the swipe/match engine and the discovery feed.

mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};

use common::{make_match, register_onboarded_user, request, test_app, TestUser};

async fn swipe(app: &axum::Router, actor: &TestUser, target: &TestUser, direction: &str) -> Value {
    let (status, body) = request(
        app,
        "POST",
        "/api/v1/swipes",
        Some(&actor.access_token),
        Some(json!({ "target_id": target.id, "direction": direction })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "swipe failed: {}", body);
    body
}

#[tokio::test]
async fn one_sided_like_is_not_a_match() {
    let app = test_app().await;
    let a = register_onboarded_user(&app).await;
    let b = register_onboarded_user(&app).await;

    let body = swipe(&app, &a, &b, "like").await;
    assert_eq!(body["is_match"], json!(false));

    let (_, matches) = request(&app, "GET", "/api/v1/matches", Some(&a.access_token), None).await;
    assert_eq!(matches["matches"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn mutual_like_creates_exactly_one_match() {
    let app = test_app().await;
    let a = register_onboarded_user(&app).await;
    let b = register_onboarded_user(&app).await;

    let match_id = make_match(&app, &a, &b).await;

    // Both users see the same single match.
    for (user, partner) in [(&a, &b), (&b, &a)] {
        let (status, body) =
            request(&app, "GET", "/api/v1/matches", Some(&user.access_token), None).await;
        assert_eq!(status, StatusCode::OK);

        let matches = body["matches"].as_array().unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0]["match_id"], json!(match_id.to_string()));
        assert_eq!(matches[0]["partner_id"], json!(partner.id.to_string()));
    }

    // Re-liking after the match reports the same match, not a second row.
    let body = swipe(&app, &a, &b, "like").await;
    assert_eq!(body["is_match"], json!(true));
    assert_eq!(body["match_id"], json!(match_id.to_string()));

    let (_, body) = request(&app, "GET", "/api/v1/matches", Some(&a.access_token), None).await;
    assert_eq!(body["matches"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn pass_never_creates_a_match() {
    let app = test_app().await;
    let a = register_onboarded_user(&app).await;
    let b = register_onboarded_user(&app).await;

    swipe(&app, &a, &b, "like").await;
    let body = swipe(&app, &b, &a, "pass").await;
    assert_eq!(body["is_match"], json!(false));

    let (_, body) = request(&app, "GET", "/api/v1/matches", Some(&b.access_token), None).await;
    assert_eq!(body["matches"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn later_swipe_supersedes_earlier_decision() {
    let app = test_app().await;
    let a = register_onboarded_user(&app).await;
    let b = register_onboarded_user(&app).await;

    // A first passes on B, then reconsiders with a like.
    swipe(&app, &a, &b, "pass").await;
    swipe(&app, &a, &b, "like").await;

    // B's like now completes the pair.
    let body = swipe(&app, &b, &a, "like").await;
    assert_eq!(body["is_match"], json!(true));
}

#[tokio::test]
async fn discovery_excludes_liked_but_not_passed_profiles() {
    let app = test_app().await;
    let me = register_onboarded_user(&app).await;
    let liked = register_onboarded_user(&app).await;
    let passed = register_onboarded_user(&app).await;

    swipe(&app, &me, &liked, "like").await;
    swipe(&app, &me, &passed, "pass").await;

    let (status, body) =
        request(&app, "GET", "/api/v1/discover", Some(&me.access_token), None).await;
    assert_eq!(status, StatusCode::OK);

    let ids: Vec<&str> = body["profiles"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap())
        .collect();

    assert!(!ids.contains(&liked.id.to_string().as_str()), "liked profile reappeared");
    assert!(ids.contains(&passed.id.to_string().as_str()), "passed profile was excluded");
    assert!(!ids.contains(&me.id.to_string().as_str()), "own profile in feed");
}

#[tokio::test]
async fn discovery_hides_profiles_that_never_onboarded() {
    let app = test_app().await;
    let me = register_onboarded_user(&app).await;
    let ghost = common::register_user(&app).await; // never onboarded

    let (_, body) = request(&app, "GET", "/api/v1/discover", Some(&me.access_token), None).await;
    let ids: Vec<&str> = body["profiles"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap())
        .collect();

    assert!(!ids.contains(&ghost.id.to_string().as_str()));
}

#[tokio::test]
async fn self_swipe_is_rejected() {
    let app = test_app().await;
    let me = register_onboarded_user(&app).await;

    let (status, _) = request(
        &app,
        "POST",
        "/api/v1/swipes",
        Some(&me.access_token),
        Some(json!({ "target_id": me.id, "direction": "like" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn swiping_an_unknown_profile_is_not_found() {
    let app = test_app().await;
    let me = register_onboarded_user(&app).await;

    let (status, _) = request(
        &app,
        "POST",
        "/api/v1/swipes",
        Some(&me.access_token),
        Some(json!({ "target_id": uuid::Uuid::new_v4(), "direction": "like" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn matched_partners_include_each_other() {
    let app = test_app().await;
    let a = register_onboarded_user(&app).await;
    let b = register_onboarded_user(&app).await;

    make_match(&app, &a, &b).await;

    for (user, partner) in [(&a, &b), (&b, &a)] {
        let (status, body) = request(
            &app,
            "GET",
            "/api/v1/matches/partners",
            Some(&user.access_token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let ids: Vec<&str> = body["partners"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["id"].as_str().unwrap())
            .collect();
        assert!(ids.contains(&partner.id.to_string().as_str()));
    }
}
