//! HTTP server initialization and runtime setup.
//!
//! Handles engine selection, session store setup, worker spawning, and Axum
//! server lifecycle.

use crate::application::services::AuthService;
use crate::config::Config;
use crate::engine::EngineRegistry;
use crate::infrastructure::session::{MemorySessionStore, RedisSessionStore, SessionStore};

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - The storage engine named by `DB_ENGINE` (migrations and indexes included)
/// - The token session store (Redis, or in-process when Redis is not configured)
/// - Background visit worker
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - The engine is unknown or cannot connect
/// - Redis is configured but unreachable
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let engine = EngineRegistry::default()
        .open(&config.db_engine, &config)
        .await
        .context("Failed to open storage engine")?;

    let sessions = session_store(&config).await?;
    let auth_service = Arc::new(AuthService::new(sessions, config.token_config()));

    let app = engine.app(auth_service, &config);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Redis when configured, otherwise an in-process store.
///
/// A configured Redis that cannot be reached is fatal: tokens issued against
/// a store that other instances cannot see would not be revocable.
async fn session_store(config: &Config) -> Result<Arc<dyn SessionStore>> {
    match &config.redis_url {
        Some(redis_url) => {
            let store = RedisSessionStore::connect(redis_url)
                .await
                .context("Failed to connect to Redis session store")?;
            tracing::info!("Session store: Redis");
            Ok(Arc::new(store))
        }
        None => {
            tracing::warn!(
                "REDIS_URL not set, sessions are kept in process memory and lost on restart"
            );
            Ok(Arc::new(MemorySessionStore::new()))
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
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
