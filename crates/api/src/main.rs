use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use corkboard_api::background;
use corkboard_api::cards::CardRegistry;
use corkboard_api::config::ServerConfig;
use corkboard_api::router::build_app_router;
use corkboard_api::session::SessionService;
use corkboard_api::sse::ConnectionRegistry;
use corkboard_api::state::AppState;
use corkboard_events::KvRelay;
use corkboard_kv::{KvStore, MemoryKv};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "corkboard_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- KV store + broadcast relay ---
    let store: Arc<dyn KvStore> = Arc::new(MemoryKv::new());
    let relay = Arc::new(KvRelay::new(Arc::clone(&store), config.relay_capacity));
    tracing::info!(capacity = config.relay_capacity, "KV relay created");

    // --- SSE connection registry ---
    let connections = Arc::new(ConnectionRegistry::new());

    // --- Card type registry ---
    let card_registry = Arc::new(CardRegistry::builtin());

    // --- Sessions ---
    let sessions = SessionService::new(Arc::clone(&relay));

    // Spawn the expired-session sweep.
    let sweep_cancel = tokio_util::sync::CancellationToken::new();
    let sweep_handle = tokio::spawn(background::session_sweep::run(
        sessions.clone(),
        config.session_sweep_interval_secs,
        sweep_cancel.clone(),
    ));

    // --- App state ---
    let state = AppState {
        relay: Arc::clone(&relay),
        config: Arc::new(config.clone()),
        connections: Arc::clone(&connections),
        cards: card_registry,
        sessions,
    };

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    // Stop the session sweep.
    sweep_cancel.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(5), sweep_handle).await;
    tracing::info!("Session sweep stopped");

    // Dropping the relay closes the broadcast channel, which ends every
    // remaining SSE stream and releases its registry guard.
    let sse_count = connections.count();
    tracing::info!(sse_count, "Closing remaining SSE connections");
    drop(relay);

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager (e.g. systemd, Docker, Kubernetes).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
