//! Shared application state.

use crate::{config::ServerConfig, proxy::UpstreamProxy};
use prixli_gate::RequestGate;
use std::sync::Arc;

/// State shared by every request handler.
#[derive(Clone)]
pub struct AppState {
    /// Resolved server configuration.
    pub config: Arc<ServerConfig>,
    /// The request gate, evaluated before routing.
    pub gate: Arc<RequestGate>,
    /// Upstream forwarder for allowed requests.
    pub proxy: Arc<UpstreamProxy>,
}

impl AppState {
    /// Build state from resolved configuration.
    pub fn new(config: &ServerConfig) -> anyhow::Result<Self> {
        let gate = Arc::new(RequestGate::new(config.gate.clone()));
        let proxy = Arc::new(UpstreamProxy::new(&config.upstream)?);

        Ok(Self {
            config: Arc::new(config.clone()),
            gate,
            proxy,
        })
    }
}
