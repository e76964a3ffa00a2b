//! AgriChain server binary
//!
//! Wires the storage backend, JWT config, and statistics constants
//! into the API router and serves it until Ctrl+C or SIGTERM.

use std::sync::Arc;
use std::time::Duration;

use axum::http::{header::AUTHORIZATION, header::CONTENT_TYPE, Method};
use axum::Router;
use tokio::net::TcpListener;
use tokio::signal::{
    ctrl_c,
    unix::{signal, SignalKind},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use agrichain_api::{
    create_router, stats_config_from_env, AppState, AuthState, JwtConfig, ServerConfig,
    JWT_SECRET_ENV,
};
use agrichain_core::storage::{MemoryStore, SledStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let config = ServerConfig::from_env();
    let stats = stats_config_from_env();
    let auth = AuthState::new(JwtConfig::try_from_env(JWT_SECRET_ENV)?);

    let app = match &config.storage_path {
        Some(path) => {
            info!(path = %path, "Opening sled storage");
            let store = Arc::new(SledStore::open(path)?);
            create_router(AppState::new(store, stats, auth))
        }
        None => {
            info!("No storage path configured, using in-memory backend");
            let store = Arc::new(MemoryStore::new());
            create_router(AppState::new(store, stats, auth))
        }
    };

    serve(app, &config).await
}

async fn serve(app: Router, config: &ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    let app = app.layer(cors).layer(TraceLayer::new_for_http());

    let address = config.bind_address();
    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
