use axum::http::{Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use crate::test_support;

#[tokio::test]
async fn signup_creates_instructor_and_login_round_trips() {
    let ctx = test_support::setup_test_context().await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/auth/signup",
            None,
            Some(json!({
                "name": "Ada Lovelace",
                "email": "Ada.Signup@Example.com",
                "password": "instructor-pass"
            })),
        ))
        .await
        .expect("signup");

    let status = response.status();
    let created = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::CREATED, "response: {created}");
    assert_eq!(created["user"]["role"], "instructor");
    assert_eq!(created["user"]["email"], "ada.signup@example.com");
    assert!(created["access_token"].as_str().is_some());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({
                "email": "ada.signup@example.com",
                "password": "instructor-pass"
            })),
        ))
        .await
        .expect("login");

    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {body}");
    let token = body["access_token"].as_str().expect("token").to_string();

    let response = ctx
        .app
        .oneshot(test_support::json_request(Method::GET, "/api/v1/auth/me", Some(&token), None))
        .await
        .expect("me");

    let status = response.status();
    let me = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {me}");
    assert_eq!(me["full_name"], "Ada Lovelace");
}

#[tokio::test]
async fn duplicate_signup_email_conflicts() {
    let ctx = test_support::setup_test_context().await;

    test_support::insert_instructor(
        ctx.state.db(),
        "Ada Lovelace",
        "dup@example.com",
        "instructor-pass",
    )
    .await;

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/auth/signup",
            None,
            Some(json!({
                "name": "Copycat",
                "email": "dup@example.com",
                "password": "instructor-pass"
            })),
        ))
        .await
        .expect("signup");

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn wrong_credentials_are_unauthorized() {
    let ctx = test_support::setup_test_context().await;

    test_support::insert_instructor(
        ctx.state.db(),
        "Ada Lovelace",
        "login@example.com",
        "instructor-pass",
    )
    .await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({"email": "login@example.com", "password": "wrong"})),
        ))
        .await
        .expect("login");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({"email": "nobody@example.com", "password": "wrong"})),
        ))
        .await
        .expect("login unknown user");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
