use std::future::IntoFuture;
use std::time::Duration;

use anyhow::{Context, Result};
use katastr_core::Config;
use katastr_server::{build_router, AppState};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> Result<()> {
    katastr_core::init_logging();

    let (config, _) = Config::load_validated().context("Failed to load configuration")?;

    let state = AppState::from_config(&config).await?;
    let app = build_router(state, &config.cors);

    let addr = config.server.bind_addr();
    let listener = TcpListener::bind(addr.as_str())
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Katastr gateway listening on {}", addr);

    let shutdown = CancellationToken::new();
    tokio::spawn(forward_shutdown_signal(shutdown.clone()));

    let server = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.clone().cancelled_owned())
        .into_future();
    let grace = config.server.shutdown_grace();

    tokio::select! {
        result = server => result.context("Server error")?,
        _ = grace_elapsed(&shutdown, grace) => {
            tracing::warn!("Shutdown grace period of {:?} elapsed, closing open connections", grace);
        }
    }

    tracing::info!("Katastr gateway stopped");
    Ok(())
}

/// Cancels `shutdown` on Ctrl-C or SIGTERM.
async fn forward_shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
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
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    tracing::info!("Shutting down...");
    shutdown.cancel();
}

async fn grace_elapsed(shutdown: &CancellationToken, grace: Duration) {
    shutdown.cancelled().await;
    tokio::time::sleep(grace).await;
}
