//! Auth-gate API tests. These drive the real router with the lazily
//! connecting test state, so nothing here needs a database: every request
//! either fails at the gate or is served by a handler that never queries.

use axum::{
    body::Body,
    extract::FromRef,
    http::{header, Method, Request, StatusCode},
    Router,
};
use giftlist::{
    app::build_app,
    auth::{claims::Claims, token::JwtKeys},
    state::AppState,
};
use jsonwebtoken::{encode, Header};
use serde_json::Value;
use time::OffsetDateTime;
use tower::ServiceExt;
use uuid::Uuid;

fn test_app() -> (Router, JwtKeys) {
    let state = AppState::fake();
    let keys = JwtKeys::from_ref(&state);
    (build_app(state), keys)
}

async fn body_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn protected_request(auth_header: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri("/api/me").method(Method::GET);
    if let Some(value) = auth_header {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    builder.body(Body::empty()).unwrap()
}

fn expired_token(keys: &JwtKeys, user_id: Uuid) -> String {
    let now = OffsetDateTime::now_utc().unix_timestamp();
    let claims = Claims {
        sub: user_id,
        iat: (now - 120) as usize,
        exp: (now - 60) as usize,
    };
    encode(&Header::default(), &claims, &keys.encoding).unwrap()
}

#[tokio::test]
async fn health_needs_no_auth() {
    let (app, _) = test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .method(Method::GET)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn missing_header_is_unauthorized() {
    let (app, _) = test_app();
    let response = app.oneshot(protected_request(None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(response).await,
        serde_json::json!({ "error": "Authentication required" })
    );
}

#[tokio::test]
async fn wrong_scheme_is_unauthorized() {
    let (app, _) = test_app();
    let response = app
        .oneshot(protected_request(Some("Basic YWxpY2U6czNjcmV0")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn garbage_token_is_unauthorized_not_a_crash() {
    let (app, _) = test_app();
    let response = app
        .oneshot(protected_request(Some("Bearer not.a.token")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn expired_token_is_unauthorized() {
    let (app, keys) = test_app();
    let token = expired_token(&keys, Uuid::new_v4());
    let response = app
        .oneshot(protected_request(Some(&format!("Bearer {token}"))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn forged_token_is_unauthorized() {
    let (app, keys) = test_app();
    let first = keys.sign(Uuid::new_v4()).unwrap();
    let second = keys.sign(Uuid::new_v4()).unwrap();

    // First token's signature over the second token's claims.
    let header = first.split('.').next().unwrap();
    let payload = second.split('.').nth(1).unwrap();
    let signature = first.split('.').nth(2).unwrap();
    let forged = format!("Bearer {header}.{payload}.{signature}");

    let response = app.oneshot(protected_request(Some(&forged))).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// The gate must not leak which way a token failed: missing, malformed,
/// expired and forged all produce byte-identical bodies.
#[tokio::test]
async fn all_gate_failures_share_one_response() {
    let (_, keys) = test_app();
    let expired = format!("Bearer {}", expired_token(&keys, Uuid::new_v4()));
    let cases = [
        None,
        Some("Basic YWxpY2U6czNjcmV0"),
        Some("Bearer not.a.token"),
        Some(expired.as_str()),
    ];

    let mut bodies = Vec::new();
    for case in cases {
        let (app, _) = test_app();
        let response = app.oneshot(protected_request(case)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        bodies.push(body_json(response).await);
    }
    assert!(bodies.windows(2).all(|pair| pair[0] == pair[1]));
}

#[tokio::test]
async fn valid_token_reaches_handler_with_resolved_identity() {
    let (app, keys) = test_app();
    let user_id = Uuid::new_v4();
    let token = keys.sign(user_id).unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/auth/refresh")
                .method(Method::POST)
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let fresh = body["token"].as_str().expect("refresh returns a token");

    // The handler saw the identity from the gate, nothing else.
    let claims = keys.verify(fresh).expect("fresh token verifies");
    assert_eq!(claims.sub, user_id);
}
