use std::{sync::Arc, time::Duration};

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use study_buddy::{api::create_router, services::InMemoryAuthService, state::AppState};

fn app() -> (Arc<AppState>, Arc<InMemoryAuthService>, Router) {
    let auth = Arc::new(InMemoryAuthService::default());
    let state = Arc::new(AppState::new(
        0,
        "127.0.0.1".to_string(),
        Duration::from_secs(1),
        auth.clone(),
    ));
    let router = create_router(Arc::clone(&state));
    (state, auth, router)
}

async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = router
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn test_health() {
    let (_, _, router) = app();
    let (status, body) = send(&router, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test(start_paused = true)]
async fn test_timer_lifecycle() {
    let (_, _, router) = app();

    let (status, body) = send(&router, Method::POST, "/timer/start", Some(json!({"subject": ""}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "subject required");
    assert_eq!(body["timer"]["status"], "idle");

    let (status, body) = send(
        &router,
        Method::POST,
        "/timer/start",
        Some(json!({"subject": "physics", "topic": "Mechanics"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer"]["status"], "running");

    tokio::time::sleep(Duration::from_millis(30_500)).await;
    let (status, body) = send(&router, Method::POST, "/timer/save", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "session too short");
    assert_eq!(body["timer"]["elapsed_seconds"], 30);
    assert_eq!(body["timer"]["status"], "running");

    let (_, body) = send(&router, Method::POST, "/timer/pause", None).await;
    assert_eq!(body["timer"]["status"], "paused");
    tokio::time::sleep(Duration::from_secs(60)).await;

    let (_, body) = send(&router, Method::GET, "/timer", None).await;
    assert_eq!(body["timer"]["elapsed_seconds"], 30);
    assert_eq!(body["timer"]["display"], "30s");

    send(&router, Method::POST, "/timer/start", Some(json!({"subject": "physics", "topic": "Mechanics"}))).await;
    tokio::time::sleep(Duration::from_millis(30_500)).await;

    let (status, body) = send(&router, Method::POST, "/timer/save", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["session"]["duration_seconds"], 60);
    assert_eq!(body["session"]["subject"], "physics");
    assert_eq!(body["timer"]["status"], "idle");
    assert_eq!(body["timer"]["elapsed_seconds"], 0);

    let (_, body) = send(&router, Method::GET, "/notifications", None).await;
    let titles: Vec<&str> = body["notifications"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Subject required", "Session too short", "Study session saved"]);
}

#[tokio::test(start_paused = true)]
async fn test_reset_and_templates() {
    let (_, _, router) = app();

    let (status, body) = send(&router, Method::GET, "/timer/templates", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 3);

    let (status, body) = send(&router, Method::POST, "/timer/templates/physics-mechanics/start", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer"]["subject"], "physics");
    assert_eq!(body["timer"]["topic"], "Mechanics");

    tokio::time::sleep(Duration::from_millis(5_500)).await;
    let (_, body) = send(&router, Method::POST, "/timer/reset", None).await;
    assert_eq!(body["timer"]["status"], "idle");
    assert_eq!(body["timer"]["elapsed_seconds"], 0);

    let (status, _) = send(&router, Method::POST, "/timer/templates/unknown/start", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(&router, Method::GET, "/timer/subjects", None).await;
    assert_eq!(body.as_array().unwrap().len(), 8);
}

#[tokio::test]
async fn test_login_validation_errors() {
    let (_, _, router) = app();

    let (status, body) = send(
        &router,
        Method::POST,
        "/auth/login",
        Some(json!({"email": "not-an-email", "password": "abcdef"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["kind"], "validation");
    assert_eq!(body["errors"], json!({"email": "Please enter a valid email address"}));

    let (_, body) = send(
        &router,
        Method::POST,
        "/auth/register",
        Some(json!({"name": "A", "email": "ada@example.com", "password": "abc"})),
    )
    .await;
    let errors = body["errors"].as_object().unwrap();
    assert_eq!(errors.len(), 2);
    assert!(errors.contains_key("name"));
    assert!(errors.contains_key("password"));
}

#[tokio::test]
async fn test_register_login_logout() {
    let (_, _, router) = app();

    let (status, body) = send(
        &router,
        Method::POST,
        "/auth/register",
        Some(json!({"name": "Ada", "email": "ada@example.com", "password": "secret1"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["redirect"], "/dashboard");
    assert_eq!(body["user"]["name"], "Ada");

    let (_, body) = send(&router, Method::GET, "/auth/session", None).await;
    assert_eq!(body["signed_in"], true);

    let (_, body) = send(&router, Method::GET, "/status", None).await;
    assert_eq!(body["user"]["email"], "ada@example.com");
    assert_eq!(body["last_action"], "register");

    let (status, _) = send(&router, Method::POST, "/auth/logout", None).await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = send(&router, Method::GET, "/auth/session", None).await;
    assert_eq!(body["signed_in"], false);

    let (status, body) = send(
        &router,
        Method::POST,
        "/auth/login",
        Some(json!({"email": "ada@example.com", "password": "wrong-one"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["kind"], "credential");
    assert_eq!(body["message"], "Invalid email or password. Please try again.");

    let (status, body) = send(
        &router,
        Method::POST,
        "/auth/login",
        Some(json!({"email": "ada@example.com", "password": "secret1"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["redirect"], "/dashboard");
}

#[tokio::test]
async fn test_auth_service_unreachable() {
    let (_, auth, router) = app();
    auth.set_offline(true);

    let (status, body) = send(
        &router,
        Method::POST,
        "/auth/login",
        Some(json!({"email": "ada@example.com", "password": "secret1"})),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["kind"], "connectivity");

    let (_, body) = send(&router, Method::GET, "/notifications", None).await;
    assert_eq!(body["notifications"][0]["title"], "Error logging in");
    assert_eq!(body["notifications"][0]["variant"], "destructive");
}

#[tokio::test]
async fn test_coming_soon_features() {
    let (_, _, router) = app();

    let (status, body) = send(&router, Method::GET, "/timer/history", None).await;
    assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
    assert_eq!(body["message"], "Study history feature is coming soon!");

    let (status, body) = send(&router, Method::POST, "/auth/oauth/GitHub", None).await;
    assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
    assert_eq!(body["feature"], "GitHub authentication");
}

#[tokio::test(start_paused = true)]
async fn test_template_start_while_running_reports_active_subject() {
    let (_, _, router) = app();

    let (_, body) = send(
        &router,
        Method::POST,
        "/timer/start",
        Some(json!({"subject": "physics", "topic": "Mechanics"})),
    )
    .await;
    assert_eq!(body["message"], "Timer running: Physics (Mechanics)");

    let (status, body) = send(
        &router,
        Method::POST,
        "/timer/templates/computer-science-algorithms/start",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Timer running: Physics (Mechanics)");
    assert_eq!(body["timer"]["subject"], "physics");
    assert_eq!(body["timer"]["topic"], "Mechanics");
}

#[tokio::test]
async fn test_expired_session_is_signed_out() {
    let auth = Arc::new(InMemoryAuthService::new(chrono::Duration::seconds(-1)));
    let state = Arc::new(AppState::new(
        0,
        "127.0.0.1".to_string(),
        Duration::from_secs(1),
        auth,
    ));
    let router = create_router(Arc::clone(&state));

    let (status, _) = send(
        &router,
        Method::POST,
        "/auth/register",
        Some(json!({"name": "Ada", "email": "ada@example.com", "password": "secret1"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&router, Method::GET, "/auth/session", None).await;
    assert_eq!(body["signed_in"], false);

    let (_, body) = send(&router, Method::GET, "/status", None).await;
    assert_eq!(body["user"], Value::Null);
}
