//! Prixli Edge Server
//!
//! HTTP edge for the Prixli price-comparison application. Every inbound
//! request passes the access gate ([`prixli_gate::RequestGate`]) before
//! anything else happens; allowed requests are forwarded to the upstream
//! application origin, everything else is redirected per the gate's
//! decision.
//!
//! The server is built on Axum with a layered architecture:
//!
//! - **Middleware**: the gate layer plus the usual cross-cutting stack
//!   (request IDs, panic recovery, timeouts, compression, tracing)
//! - **Proxy**: upstream forwarding for allowed requests
//! - **Config**: layered file/env configuration with startup validation

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod middleware;
pub mod proxy;
pub mod routes;
pub mod state;

pub use config::ServerConfig;
pub use error::{EdgeError, EdgeResult};
pub use state::AppState;

use axum::Router;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Server builder for constructing and running the edge server.
pub struct Server {
    config: ServerConfig,
    state: AppState,
}

impl Server {
    /// Create a new server with the given configuration.
    ///
    /// Fails fast on invalid configuration: the active gate mode must have
    /// a usable secret before the server accepts a single request.
    pub fn new(config: ServerConfig) -> Result<Self, anyhow::Error> {
        if let Err(errors) = config::validate_config(&config) {
            let summary = errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            anyhow::bail!("Invalid configuration: {summary}");
        }

        let state = AppState::new(&config)?;
        Ok(Self { config, state })
    }

    /// Build the router with all routes and middleware.
    pub fn router(&self) -> Router {
        routes::create_router(self.state.clone()).layer(TraceLayer::new_for_http())
    }

    /// Run the server, binding to the configured address.
    pub async fn run(self) -> Result<(), anyhow::Error> {
        let addr = self.config.socket_addr();
        let listener = TcpListener::bind(addr).await?;

        info!(mode = ?self.config.gate.mode, "Edge listening on {}", addr);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }

    /// Get the server's socket address.
    pub fn addr(&self) -> SocketAddr {
        self.config.socket_addr()
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown");
}
