//! Application entry point and server initialization
//!
//! This module contains the main function that:
//! - Loads environment configuration
//! - Opens the persisted link set
//! - Starts the HTTP server with graceful shutdown support

use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use quicklink::config::Config;
use quicklink::database::open_backend;
use quicklink::handler::AppState;
use quicklink::route::create_app;
use quicklink::service::LinkService;
use quicklink::store::LinkStore;

/// Application entry point
///
/// 1. Reads configuration (see `Config::from_env`)
/// 2. Installs the tracing subscriber
/// 3. Opens the storage backend and loads the link set
/// 4. Serves the router until SIGINT/SIGTERM
#[tokio::main]
async fn main() {
    let config = Config::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log_filter))
        .init();

    let store = match open_backend(&config).and_then(LinkStore::open) {
        Ok(store) => store,
        Err(err) => {
            error!(path = %config.data_file.display(), %err, "failed to open link store");
            std::process::exit(1);
        }
    };

    let state = AppState::new(LinkService::new(store));
    let app = create_app(state).layer(TraceLayer::new_for_http());

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err) => {
            error!(%addr, %err, "failed to bind");
            std::process::exit(1);
        }
    };

    info!(
        port = config.port,
        backend = ?config.backend,
        data_file = %config.data_file.display(),
        "server running at http://localhost:{}",
        config.port
    );

    if let Err(err) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!(%err, "server error");
        std::process::exit(1);
    }
}

/// Resolves when SIGINT (Ctrl+C) or, on Unix, SIGTERM arrives
///
/// Every store write is synchronous, so once in-flight requests finish
/// the link set on disk is complete.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received, stopping server");
}
