//! quotebox server binary.
//!
//! Loads configuration, opens the quote store before binding (a missing
//! storage binding stops the process here), then serves until SIGINT or
//! SIGTERM.

use quotebox_server::{api::ApiError, app, config, telemetry, AppState};
use std::net::SocketAddr;
use std::process::ExitCode;
use thiserror::Error;
use tokio::net::TcpListener;

const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] config::ConfigError),

    #[error("quote store unavailable, check database.path / QUOTEBOX_DB_PATH: {0}")]
    Store(#[from] ApiError),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },

    #[error("server stopped with an error: {0}")]
    Serve(std::io::Error),
}

/// First CLI argument, else `QUOTEBOX_CONFIG_PATH`, else `config.toml`.
fn config_path() -> String {
    std::env::args()
        .nth(1)
        .or_else(|| std::env::var("QUOTEBOX_CONFIG_PATH").ok())
        .filter(|path| !path.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string())
}

async fn run() -> Result<(), StartupError> {
    let path = config_path();
    let config = config::load_config(Some(&path))?;
    telemetry::init_tracing(&config.logging);
    tracing::info!(config = %path, "configuration loaded");

    let state = AppState::new(
        config.database.path.clone(),
        config.database.runtime_settings(),
    );
    state.store().await?;

    let addr = SocketAddr::new(config.server.host, config.server.port);
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| StartupError::Bind { addr, source })?;
    tracing::info!(%addr, "quotebox listening");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(StartupError::Serve)?;

    tracing::info!("quotebox stopped");
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "quotebox exiting");
            eprintln!("quotebox-server: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Resolves on Ctrl+C, or on SIGTERM where the platform has it.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = terminate.recv() => {}
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "SIGTERM handler unavailable, waiting for Ctrl+C");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }

    tracing::info!("shutdown signal received, draining connections");
}
