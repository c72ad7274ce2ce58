//! Dobby HTTP server.
//!
//! Serves `POST /predict` and `GET /` on `DOBBY_BIND` (default
//! `0.0.0.0:5000`). Refuses to start if the model or reference data
//! cannot be loaded.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use dobby::adapters::sanitize::{Redactor, SanitizingMakeWriter};
use dobby::api::api_router;
use dobby::config::AppConfig;
use dobby::{CheckerContext, SymptomChecker};

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::from_env();

    let (writer, _guard) = tracing_appender::non_blocking(std::io::stdout());
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(SanitizingMakeWriter::new(
            writer,
            Redactor::new(config.sanitize_max_bytes),
        )))
        .init();

    tracing::info!("Starting Dobby server...");

    let context = CheckerContext::load(&config).context("Failed to load symptom checker")?;
    let checker = Arc::new(SymptomChecker::new(Arc::new(context)));
    let app = api_router(checker);

    let listener = tokio::net::TcpListener::bind(&config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Dobby server shutdown complete.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
