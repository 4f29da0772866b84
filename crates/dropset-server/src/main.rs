//! Dropset waitlist server entry point.
//!
//! Builds the waitlist service and starts the Axum HTTP server with graceful
//! shutdown. In-flight requests get a bounded grace period to finish once a
//! shutdown signal arrives.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{info, warn};

use dropset_core::waitlist::Waitlist;

use dropset_server::config::ServerConfig;
use dropset_server::routes;
use dropset_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from environment.
    let config = ServerConfig::from_env();

    // Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .json()
        .init();

    let waitlist = Waitlist::new();
    let policy = waitlist.limiter().policy();
    info!(
        max_requests = policy.max_requests,
        window_ms = u64::try_from(policy.window.as_millis()).unwrap_or(u64::MAX),
        "waitlist starting (in-memory, not persisted)"
    );

    let state = Arc::new(AppState::new(waitlist));
    let app = routes::build_router(state, &config);

    // Bind and serve.
    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind to {}", config.bind_addr))?;

    info!(addr = %config.bind_addr, "waitlist server listening");

    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

    let server = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal(shutdown_tx));
    let mut server = tokio::spawn(async move { server.await });

    tokio::select! {
        result = &mut server => {
            result.context("server task failed")?.context("server error")?;
            info!("waitlist server stopped");
            return Ok(());
        }
        _ = shutdown_rx.changed() => {}
    }

    // Drain in-flight requests, but not forever.
    info!(grace_secs = config.shutdown_grace.as_secs(), "draining in-flight requests");
    match tokio::time::timeout(config.shutdown_grace, server).await {
        Ok(result) => {
            result.context("server task failed")?.context("server error")?;
        }
        Err(_) => {
            warn!("grace period elapsed with requests still in flight, exiting");
        }
    }

    info!("waitlist server stopped");
    Ok(())
}

/// Wait for SIGINT or SIGTERM, then broadcast shutdown.
async fn shutdown_signal(shutdown_tx: watch::Sender<bool>) {
    let ctrl_c = async {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("shutdown signal received, stopping server");
    let _ = shutdown_tx.send(true);
}
