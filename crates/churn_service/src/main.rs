//! Churn service entry point
//!
//! Startup ordering matters here: the model artifact is loaded and
//! verified before the listener binds, so no request is ever served
//! against a missing or corrupt model. Load failure exits the process.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use churn_core::artifact::ChurnModelArtifact;
use churn_core::engine::InferenceEngine;
use churn_service::config::{DataSourceConfig, ServiceConfig};
use churn_service::orchestrator::Orchestrator;
use churn_service::server::{router, AppState};
use churn_service::source::{DataSource, JsonFileSource};
use clap::Parser;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "churn-service", about = "Customer churn inference service")]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let cli = Cli::parse();

    info!("Starting churn service v{}", env!("CARGO_PKG_VERSION"));

    let mut config = ServiceConfig::load(cli.config.as_deref())?;
    config.apply_env_overrides();
    config.validate()?;

    // The one serialization point: artifact load completes before any
    // request can arrive, and a bad artifact is fatal.
    let artifact = ChurnModelArtifact::load_json(&config.model.artifact_path)
        .map_err(|e| {
            error!(
                path = %config.model.artifact_path.display(),
                error = %e,
                "model artifact load failed"
            );
            e
        })
        .context("cannot serve without a verified model artifact")?;

    let engine = InferenceEngine::new(Arc::new(artifact));
    let source = build_source(&config.data_source)?;
    let orchestrator = Arc::new(Orchestrator::new(
        engine,
        source,
        config.query.default_window,
        config.query.max_window,
    ));

    let state = AppState::new(orchestrator);
    let app = router(state);

    let addr = config.bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("churn service stopped");
    Ok(())
}

fn build_source(config: &DataSourceConfig) -> anyhow::Result<Arc<dyn DataSource>> {
    match config {
        DataSourceConfig::File { path } => {
            info!(path = %path.display(), "using local snapshot data source");
            Ok(Arc::new(JsonFileSource::new(path.clone())))
        }
        #[cfg(feature = "remote_source")]
        DataSourceConfig::Http { url } => {
            info!(url, "using remote data source");
            Ok(Arc::new(churn_service::source::HttpDataSource::new(
                url.clone(),
            )))
        }
        #[cfg(not(feature = "remote_source"))]
        DataSourceConfig::Http { .. } => anyhow::bail!(
            "http data source requires the remote_source feature"
        ),
    }
}

fn init_logging() {
    let env = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(env)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Received shutdown signal"),
        Err(err) => error!("Unable to listen for shutdown signal: {}", err),
    }
}
