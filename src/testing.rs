//! Router-level helpers shared by handler tests.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use crate::{app::build_app, state::AppState};

/// Full router over a fresh in-memory store.
pub fn test_app() -> (Router, AppState) {
    let state = AppState::fake();
    (build_app(state.clone()), state)
}

/// Sends one request and returns the status with the body parsed as JSON
/// (`Null` when empty, a JSON string when not JSON).
pub async fn call(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(t) = token {
        req = req.header(header::AUTHORIZATION, format!("Bearer {t}"));
    }
    let req = match body {
        Some(b) => req
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(b.to_string())),
        None => req.body(Body::empty()),
    }
    .expect("valid request");

    let res = app.clone().oneshot(req).await.expect("infallible router");
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .expect("read body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, value)
}

/// Registers `username` with password `pw-<username>` and returns its id.
pub async fn signup(app: &Router, username: &str) -> Uuid {
    let (status, body) = call(
        app,
        Method::POST,
        "/users/",
        None,
        Some(json!({
            "username": username,
            "email": format!("{username}@example.com"),
            "password": format!("pw-{username}"),
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "signup {username}: {body}");
    body["id"].as_str().and_then(|s| s.parse().ok()).expect("id")
}

/// Access token for an account created by `signup`.
pub async fn login(app: &Router, username: &str) -> String {
    let (status, body) = call(
        app,
        Method::POST,
        "/token/",
        None,
        Some(json!({ "username": username, "password": format!("pw-{username}") })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login {username}: {body}");
    body["access"].as_str().expect("access token").to_string()
}

pub fn entry_body(title: &str) -> Value {
    json!({
        "Title": title,
        "Type": "Movie",
        "Director": "Michael Mann",
        "Budget": "$60M",
        "Location": "Los Angeles",
        "Duration": "170 min",
        "year": "1995-12-15",
    })
}
