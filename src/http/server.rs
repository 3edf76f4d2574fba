//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Mount the level control handler under the configured prefix
//! - Serve `GET /status` (version, current and initial level, build info)
//! - Wire up middleware (tracing, request timeout)
//! - Serve until the shutdown signal fires

use std::time::Duration;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::build_info::BuildInfo;
use crate::config::ServerConfig;
use crate::control::LevelHandle;
use crate::level::Level;

pub const STATUS_PATH: &str = "/status";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub handle: LevelHandle,
    pub build: Option<BuildInfo>,
}

#[derive(Debug, Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub level: Level,
    pub initial_level: Level,
    pub build: Option<BuildInfo>,
}

/// HTTP server exposing the level control endpoint.
pub struct LevelServer {
    router: Router,
    config: ServerConfig,
}

impl LevelServer {
    pub fn new(config: ServerConfig, handle: LevelHandle) -> Self {
        let state = AppState {
            handle,
            build: BuildInfo::detect(),
        };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServerConfig, state: AppState) -> Router {
        let mut router = state
            .handle
            .mount(Router::<AppState>::new(), &config.control.path_prefix);
        if config.control.status_endpoint {
            router = router.route(STATUS_PATH, get(get_status));
        }
        router
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.listener.request_timeout_secs,
            )))
            .layer(TraceLayer::new_for_http())
    }

    /// The router, for embedding or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Serve on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            prefix = %self.config.control.path_prefix,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn get_status(State(state): State<AppState>) -> Json<SystemStatus> {
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        level: state.handle.level(),
        initial_level: state.handle.initial_level(),
        build: state.build,
    })
}
