//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use tracing::{info, warn};

use crate::{
    error::AppError,
    services::DASHBOARD_PATH,
    state::{AppState, TimerState},
    timer::{find_template, QuickStartTemplate, Subject, QUICK_START_TEMPLATES, SUBJECTS},
    validation::{LoginForm, RegisterForm},
};
use super::responses::{
    AuthResponse, ComingSoonResponse, HealthResponse, NotificationsResponse, SessionResponse,
    StatusResponse, TimerResponse,
};

type TimerResult = Result<Json<TimerResponse>, (StatusCode, Json<TimerResponse>)>;
type AuthResult = Result<Json<AuthResponse>, (StatusCode, Json<AuthResponse>)>;

/// Body of POST /timer/start
#[derive(Debug, Deserialize)]
pub struct StartRequest {
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub topic: Option<String>,
}

fn timer_error(state: &AppState, err: AppError) -> (StatusCode, Json<TimerResponse>) {
    (
        err.status_code(),
        Json(TimerResponse::error(&err, state.timer.state())),
    )
}

/// Describe what the timer is tracking. Start is a no-op while already
/// running, so this reads the returned snapshot rather than the request.
fn running_message(timer: &TimerState) -> String {
    let subject = timer.subject.as_deref().map(|id| {
        SUBJECTS
            .iter()
            .find(|s| s.id == id)
            .map_or(id, |s| s.label)
    });
    match (subject, timer.topic.as_deref()) {
        (Some(subject), Some(topic)) => format!("Timer running: {} ({})", subject, topic),
        (Some(subject), None) => format!("Timer running: {}", subject),
        _ => "Timer running".to_string(),
    }
}

fn auth_error(err: AppError) -> (StatusCode, Json<AuthResponse>) {
    (err.status_code(), Json(AuthResponse::error(&err)))
}

/// Handle GET /timer - Current timer snapshot
pub async fn timer_handler(State(state): State<Arc<AppState>>) -> Json<TimerResponse> {
    let timer = state.timer.state();
    Json(TimerResponse::ok(format!("Timer is {:?}", timer.status), timer))
}

/// Handle POST /timer/start - Start or resume tracking
pub async fn timer_start_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<StartRequest>,
) -> TimerResult {
    match state.start_tracking(&request.subject, request.topic.as_deref()) {
        Ok(timer) => {
            info!("Timer start endpoint called - subject={}", request.subject);
            Ok(Json(TimerResponse::ok(running_message(&timer), timer)))
        }
        Err(e) => {
            warn!("Failed to start timer: {}", e);
            Err(timer_error(&state, e))
        }
    }
}

/// Handle POST /timer/templates/:id/start - Start from a quick-start template
pub async fn template_start_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> TimerResult {
    let Some(template) = find_template(&id) else {
        warn!("Unknown quick-start template: {}", id);
        let timer = state.timer.state();
        return Err((
            StatusCode::NOT_FOUND,
            Json(TimerResponse::new(
                "error",
                format!("Template not found: {}", id),
                timer,
            )),
        ));
    };

    match state.start_tracking(template.subject, Some(template.topic)) {
        Ok(timer) => {
            info!("Timer started from template {}", template.id);
            Ok(Json(TimerResponse::ok(running_message(&timer), timer)))
        }
        Err(e) => Err(timer_error(&state, e)),
    }
}

/// Handle POST /timer/pause - Pause tracking
pub async fn timer_pause_handler(State(state): State<Arc<AppState>>) -> Json<TimerResponse> {
    let timer = state.pause_tracking();
    info!("Timer pause endpoint called - elapsed={}s", timer.elapsed_seconds);
    Json(TimerResponse::ok("Timer paused".to_string(), timer))
}

/// Handle POST /timer/reset - Stop and zero the timer
pub async fn timer_reset_handler(State(state): State<Arc<AppState>>) -> Json<TimerResponse> {
    let timer = state.reset_tracking();
    info!("Timer reset endpoint called");
    Json(TimerResponse::ok("Timer reset".to_string(), timer))
}

/// Handle POST /timer/save - Finish the current session
pub async fn timer_save_handler(State(state): State<Arc<AppState>>) -> TimerResult {
    match state.save_session() {
        Ok(session) => {
            info!("Timer save endpoint called - {}", session.summary());
            Ok(Json(
                TimerResponse::ok("Study session saved".to_string(), state.timer.state())
                    .with_session(session),
            ))
        }
        Err(e) => {
            warn!("Failed to save session: {}", e);
            Err(timer_error(&state, e))
        }
    }
}

/// Handle GET /timer/subjects - Subject catalog
pub async fn subjects_handler() -> Json<&'static [Subject]> {
    Json(SUBJECTS)
}

/// Handle GET /timer/templates - Quick-start templates
pub async fn templates_handler() -> Json<&'static [QuickStartTemplate]> {
    Json(QUICK_START_TEMPLATES)
}

/// Handle POST /auth/login
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(form): Json<LoginForm>,
) -> AuthResult {
    match state.auth.sign_in(&form).await {
        Ok(session) => {
            state.record_action("login");
            info!("Login endpoint called - {} signed in", session.user.email);
            Ok(Json(
                AuthResponse::ok("Logged in successfully", Some(session.user))
                    .redirect_to(DASHBOARD_PATH),
            ))
        }
        Err(e) => {
            warn!("Login failed: {}", e);
            Err(auth_error(e))
        }
    }
}

/// Handle POST /auth/register
pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    Json(form): Json<RegisterForm>,
) -> AuthResult {
    match state.auth.sign_up(&form).await {
        Ok(session) => {
            state.record_action("register");
            info!("Register endpoint called - {} created", session.user.email);
            Ok(Json(
                AuthResponse::ok("Account created", Some(session.user))
                    .redirect_to(DASHBOARD_PATH),
            ))
        }
        Err(e) => {
            warn!("Registration failed: {}", e);
            Err(auth_error(e))
        }
    }
}

/// Handle POST /auth/logout
pub async fn logout_handler(State(state): State<Arc<AppState>>) -> AuthResult {
    match state.auth.sign_out().await {
        Ok(()) => {
            state.record_action("logout");
            info!("Logout endpoint called");
            Ok(Json(AuthResponse::ok("Logged out", None)))
        }
        Err(e) => {
            warn!("Logout failed: {}", e);
            Err(auth_error(e))
        }
    }
}

/// Handle GET /auth/session
pub async fn session_handler(State(state): State<Arc<AppState>>) -> Json<SessionResponse> {
    let session = state.auth.current_session();
    Json(SessionResponse {
        signed_in: session.is_some(),
        session,
    })
}

fn coming_soon(
    state: &AppState,
    feature: &str,
    message: &str,
) -> (StatusCode, Json<ComingSoonResponse>) {
    state.coming_soon(feature, message);
    (
        StatusCode::NOT_IMPLEMENTED,
        Json(ComingSoonResponse::new(feature, message)),
    )
}

/// Handle GET /timer/history
pub async fn history_handler(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<ComingSoonResponse>) {
    coming_soon(&state, "History", "Study history feature is coming soon!")
}

/// Handle POST /timer/templates
pub async fn add_template_handler(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<ComingSoonResponse>) {
    coming_soon(&state, "Add Template", "Template creation feature is coming soon!")
}

/// Handle POST /auth/reset-password
pub async fn reset_password_handler(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<ComingSoonResponse>) {
    coming_soon(&state, "Reset Password", "This feature is coming soon!")
}

/// Handle POST /auth/oauth/:provider
pub async fn oauth_handler(
    State(state): State<Arc<AppState>>,
    Path(provider): Path<String>,
) -> (StatusCode, Json<ComingSoonResponse>) {
    let feature = format!("{} authentication", provider);
    coming_soon(&state, &feature, "This feature is coming soon!")
}

/// Handle GET /notifications - Recently emitted toasts
pub async fn notifications_handler(
    State(state): State<Arc<AppState>>,
) -> Json<NotificationsResponse> {
    Json(NotificationsResponse {
        notifications: state.notifications.recent(),
    })
}

/// Handle GET /status - Return current dashboard status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let (last_action, last_action_time) = state.get_last_action();

    Json(StatusResponse {
        timer: state.timer.state().into(),
        user: state.auth.current_session().map(|s| s.user),
        auth_pending: state.auth.is_busy(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    })
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
