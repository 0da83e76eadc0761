//! Content AI HTTP Server
//!
//! Main entry point for the HTTP API server.

use std::{sync::Arc, time::Duration};

use application::{CacheStore, InferencePort, ProcessingService};
use axum::http::{HeaderValue, Method};
use infrastructure::{
    AppConfig, DEFAULT_LOG_FILTER, GeminiInferenceAdapter, LogFormat, ServerConfig,
    connect_cache, init_tracing,
};
use presentation_http::{AppState, routes, set_expose_internal_errors};
use tokio::{net::TcpListener, signal};
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration before tracing so the log format can be honored
    let loaded = AppConfig::load();
    let log_format = loaded.as_ref().map_or(LogFormat::Text, |config| {
        LogFormat::from_name(&config.server.log_format)
    });
    init_tracing(log_format, DEFAULT_LOG_FILTER)?;

    info!("Content AI server v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = loaded.unwrap_or_else(|e| {
        warn!("Failed to load config, using defaults: {}", e);
        AppConfig::default()
    });

    info!(
        host = %config.server.host,
        port = %config.server.port,
        model = %config.inference.default_model,
        cache_backend = ?config.cache.backend,
        batch_size = config.processing.batch_size,
        "Configuration loaded"
    );

    set_expose_internal_errors(config.server.expose_error_details);

    // Model client is built once and shared by every request
    let inference: Arc<dyn InferencePort> = Arc::new(
        GeminiInferenceAdapter::new(config.inference.clone())
            .map_err(|e| anyhow::anyhow!("Failed to initialize inference: {e}"))?,
    );

    let cache = CacheStore::new(connect_cache(&config.cache).await);
    if !cache.is_connected() {
        warn!("Cache not connected, results will not be cached");
    }

    let processing =
        ProcessingService::new(inference, cache).with_cache_ttl(config.cache.default_ttl());
    let state = AppState::new(processing, config.processing.batch_config());

    let app = routes::create_router(state)
        .layer(RequestBodyLimitLayer::new(
            config.server.max_body_size_json_bytes,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.server));

    let addr = config.server.bind_addr();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server listening on http://{}", addr);

    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_secs);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_timeout))
        .await?;

    info!("Server shutdown complete");

    Ok(())
}

/// Open CORS without configured origins, otherwise restrict to them
fn cors_layer(server: &ServerConfig) -> CorsLayer {
    if server.allowed_origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = server
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "Ignoring invalid CORS origin");
                None
            },
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any)
}

/// Wait for shutdown signals (SIGINT, SIGTERM)
async fn shutdown_signal(timeout: Duration) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }

    info!("Waiting up to {:?} for connections to close...", timeout);
}
