//! citelink-api - citation resolution service
//!
//! Serves `GET /data` (resolved content) and `GET /health`.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use citelink_api::{build_router, AppState};
use citelink_common::config::{CliOverrides, ServiceConfig};
use citelink_common::{CitationResolver, FileDocumentLoader};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for citelink-api
#[derive(Parser, Debug)]
#[command(name = "citelink-api")]
#[command(about = "Serves content with citation markers resolved into links")]
#[command(version)]
struct Args {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON document of content records
    #[arg(short, long)]
    data_file: Option<PathBuf>,

    /// Address to bind
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Favicon lookup service base URL
    #[arg(long)]
    favicon_service: Option<String>,
}

impl From<Args> for CliOverrides {
    fn from(args: Args) -> Self {
        CliOverrides {
            config: args.config,
            data_file: args.data_file,
            host: args.host,
            port: args.port,
            favicon_service: args.favicon_service,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config is resolved before tracing so the log level can come from it
    let (config, config_source) = ServiceConfig::resolve(&CliOverrides::from(args))
        .context("Failed to resolve configuration")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("citelink_api={0},citelink_common={0},tower_http={0}", config.log_level)
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting citelink-api v{}", env!("CARGO_PKG_VERSION"));
    config_source.log();
    info!("Bind address: {}", config.bind_address());
    info!("Log level: {}", config.log_level);
    info!("Data file: {}", config.data_file.display());
    info!("Favicon service: {}", config.favicon_service);

    if !config.data_file.exists() {
        // Requests will answer 404 until the file appears
        warn!("Data file does not exist yet: {}", config.data_file.display());
    }

    let loader = Arc::new(FileDocumentLoader::new(config.data_file.clone()));
    let resolver = CitationResolver::new(config.favicon_service.clone());
    let app = build_router(AppState::new(loader, resolver));

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("citelink-api listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received SIGTERM, shutting down");
        },
    }
}
