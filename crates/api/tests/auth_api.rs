//! Integration tests for the auth endpoints.

mod common;

use axum::body::Body;
use axum::http::header::COOKIE;
use axum::http::{Method, Request, StatusCode};
use common::{body_json, create_onboarding, patch_json, post_json, session_cookie_for};
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

const LOGIN_URI: &str = "/api/v1/auth/onboarding-login";

// ---------------------------------------------------------------------------
// Onboarding login
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn onboarding_login_with_unknown_uid_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json(app, LOGIN_URI, json!({ "onboardingUid": Uuid::new_v4() })).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn onboarding_login_with_unlinked_record_returns_401(pool: PgPool) {
    let app = common::build_test_app(pool);
    let id = create_onboarding(&app).await;

    let response = post_json(app, LOGIN_URI, json!({ "onboardingUid": id })).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn onboarding_login_sets_session_cookie(pool: PgPool) {
    let app = common::build_test_app(pool);
    let id = create_onboarding(&app).await;

    patch_json(
        app.clone(),
        &format!("/api/v1/onboarding/{id}"),
        json!({ "userId": 7 }),
    )
    .await;

    let response = post_json(app, LOGIN_URI, json!({ "onboardingUid": id })).await;
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get("set-cookie")
        .expect("login must set the session cookie")
        .to_str()
        .unwrap()
        .to_string();
    assert!(set_cookie.starts_with("session="));
    assert!(set_cookie.contains("HttpOnly"));

    let json = body_json(response).await;
    assert_eq!(json["data"]["userId"], 7);
    assert_eq!(json["data"]["expiresIn"], 3600);
}

// ---------------------------------------------------------------------------
// Session check
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn session_check_without_cookie_returns_401(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/auth/session")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn session_check_with_valid_cookie_returns_subject(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/auth/session")
                .header(COOKIE, session_cookie_for(9))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["userId"], 9);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn session_check_with_garbage_cookie_returns_401(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/auth/session")
                .header(COOKIE, "session=not-a-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Logout
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn logout_clears_the_session_cookie(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/v1/auth/logout")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let set_cookie = response
        .headers()
        .get("set-cookie")
        .expect("logout must clear the session cookie")
        .to_str()
        .unwrap();
    assert!(set_cookie.starts_with("session=;"));
    assert!(set_cookie.contains("Max-Age=0"));
}
