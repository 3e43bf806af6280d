//! Configuration validation.

use super::types::ServerConfig;
use prixli_gate::GateMode;
use thiserror::Error;

/// A single configuration problem.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid JWT secret: must be at least 32 characters in auth mode")]
    InvalidJwtSecret,

    #[error("Preview secret must be set in coming-soon mode")]
    MissingPreviewSecret,

    #[error("Tech-access secret must be set in tech-access mode")]
    MissingTechAccessSecret,

    #[error("Invalid upstream origin: {0}")]
    InvalidUpstreamOrigin(String),

    #[error("Invalid port: {0}")]
    InvalidPort(u16),

    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),
}

/// Validate server configuration, collecting every problem.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    // The active mode must have a usable secret
    match config.gate.mode {
        GateMode::Auth => {
            if config.gate.jwt_secret.len() < 32 {
                errors.push(ConfigError::InvalidJwtSecret);
            }
        }
        GateMode::ComingSoon => {
            if config.gate.preview_secret.is_empty() {
                errors.push(ConfigError::MissingPreviewSecret);
            }
        }
        GateMode::TechAccess => {
            if config.gate.tech_access_secret.is_empty() {
                errors.push(ConfigError::MissingTechAccessSecret);
            }
        }
    }

    // Validate upstream origin
    match url::Url::parse(&config.upstream.origin) {
        Ok(origin) if origin.scheme() == "http" || origin.scheme() == "https" => {}
        _ => errors.push(ConfigError::InvalidUpstreamOrigin(
            config.upstream.origin.clone(),
        )),
    }

    // Validate port
    if config.server.port == 0 {
        errors.push(ConfigError::InvalidPort(0));
    }

    // Validate log level
    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.logging.level.to_lowercase().as_str()) {
        errors.push(ConfigError::InvalidLogLevel(config.logging.level.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
