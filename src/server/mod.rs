use crate::clip::{ClipOrchestrator, ClipSettings};
use crate::config::Config;
use anyhow::{Context, Result};
use axum::{
    http::{header, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod routes_clip;

/// Shared application context
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<Config>,
    /// Clip pipeline shared by all requests
    pub clipper: Arc<ClipOrchestrator>,
}

impl AppContext {
    /// Build the context from loaded configuration
    pub fn new(config: Config) -> Self {
        let settings = ClipSettings::from_config(&config);
        Self::with_settings(config, settings)
    }

    /// Build the context with explicitly resolved clip settings
    pub fn with_settings(config: Config, settings: ClipSettings) -> Self {
        Self {
            config: Arc::new(config),
            clipper: Arc::new(ClipOrchestrator::new(settings)),
        }
    }
}

/// Create the Axum router with all routes
pub fn create_router(ctx: AppContext) -> Router {
    let app = Router::new()
        // Health check
        .route("/health", get(health_check))
        // API routes
        .nest("/api", routes_clip::clip_routes());

    let app = if ctx.config.server.cors {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE])
            .expose_headers([header::CONTENT_DISPOSITION, header::CONTENT_LENGTH]);
        app.layer(cors)
    } else {
        app
    };

    app.layer(TraceLayer::new_for_http()).with_state(ctx)
}

async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}

/// Start the HTTP server
pub async fn start_server(config: Config) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    let ctx = AppContext::new(config);

    let settings = ctx.clipper.settings();
    tracing::info!("Using yt-dlp at {:?}", settings.tool_path);
    tracing::info!("Temporary clips go to {:?}", settings.temp_dir);
    tracing::info!(
        "Up to {} concurrent jobs, {:?} timeout each",
        settings.max_concurrent_jobs,
        settings.timeout
    );

    let report = ctx.clipper.health().await;
    if !report.is_healthy() {
        tracing::warn!(
            "yt-dlp is not available at {:?}; clip requests will fail until it is installed",
            settings.tool_path
        );
    }

    let app = create_router(ctx);

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => {}
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
