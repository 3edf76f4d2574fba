//! Level control server.
//!
//! Runs a `tracing` logger whose level can be changed over HTTP:
//!
//! ```text
//! GET    /log          → 200 "INFO"
//! PUT    /log/debug    → 202
//! DELETE /log          → 202 (back to the configured level)
//! GET    /status       → 200 {"version": …, "level": …, "build": …}
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use tracelevel::config::{load_config, LoggingConfig, ServerConfig};
use tracelevel::http::LevelServer;
use tracelevel::lifecycle::{shutdown_signal, Shutdown};
use tracelevel::observability::metrics;
use tracelevel::{fatal, log_build_info, logger, Level};

#[derive(Parser)]
#[command(name = "tracelevel")]
#[command(about = "HTTP server with a runtime-adjustable log level", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address
    #[arg(short, long)]
    bind: Option<String>,

    /// Override logging.level
    #[arg(short, long)]
    level: Option<Level>,

    /// Emit JSON records
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => match load_config(path) {
            Ok(config) => config,
            Err(e) => {
                let (bootstrap, _) = logger::create(&LoggingConfig::default());
                fatal!(bootstrap, path = %path.display(), error = %e, "Failed to load configuration");
            }
        },
        None => ServerConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }
    if let Some(level) = cli.level {
        config.logging.level = level;
    }
    if cli.json {
        config.logging.json = true;
    }

    let (logger, handle) = logger::create(&config.logging);
    logger.install()?;

    if !log_build_info(&logger) {
        tracing::debug!("No build metadata available");
    }

    tracing::info!(
        bind_address = %config.listener.bind_address,
        prefix = %config.control.path_prefix,
        level = %config.logging.level,
        "Configuration loaded"
    );

    if config.metrics.enabled {
        match config.metrics.address.parse() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics exporter");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %config.metrics.address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = match TcpListener::bind(&config.listener.bind_address).await {
        Ok(listener) => listener,
        Err(e) => fatal!(
            logger,
            address = %config.listener.bind_address,
            error = %e,
            "Failed to bind listener"
        ),
    };

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        shutdown_signal().await;
        shutdown.trigger();
    });

    LevelServer::new(config, handle)
        .run(listener, server_shutdown)
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
