//! StudyBuddy - dashboard backend for the study-session tracker
//!
//! This is the main entry point for the study-buddy server.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use study_buddy::{
    api::create_router,
    config::Config,
    services::InMemoryAuthService,
    state::AppState,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("study_buddy={},tower_http=info", config.log_level()))
        .init();

    info!("Starting study-buddy server v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, tick={}ms",
        config.host, config.port, config.tick_ms
    );

    // Accounts and sessions are kept in memory for this process only
    let auth_service = Arc::new(InMemoryAuthService::new(config.session_ttl()));

    let state = Arc::new(AppState::new(
        config.port,
        config.host.clone(),
        config.tick_period(),
        auth_service,
    ));
    state.auth.initialize().await;

    let app = create_router(Arc::clone(&state));

    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET  /timer            - Current timer");
    info!("  POST /timer/start      - Start or resume tracking");
    info!("  POST /timer/pause      - Pause tracking");
    info!("  POST /timer/reset      - Reset the timer");
    info!("  POST /timer/save       - Save the current session");
    info!("  POST /auth/login       - Sign in");
    info!("  POST /auth/register    - Create an account");
    info!("  POST /auth/logout      - Sign out");
    info!("  GET  /status           - Dashboard status");
    info!("  GET  /health           - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    state.shutdown();
    info!("Server shutdown complete");
    Ok(())
}
