//! Gate configuration.

use serde::{Deserialize, Serialize};

/// Which gating mode is live for this deployment.
///
/// The modes are alternate configurations of the same pipeline, never
/// composed: exactly one is active, selected at process start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateMode {
    /// Pre-launch: everything funnels to `/coming-soon` unless a preview
    /// secret or cookie is presented.
    ComingSoon,
    /// Soft launch: full access behind a shared tech secret, the public
    /// only reaches the signup/signin pages.
    TechAccess,
    /// Launched: JWT session cookie drives role-based routing.
    Auth,
}

/// Injected gate configuration, resolved once at process start.
///
/// Secrets are deployment configuration, never compiled in; empty secrets
/// are rejected by server-side validation and never match a query
/// parameter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    /// Active gating mode.
    pub mode: GateMode,
    /// Shared secret used to verify session tokens (auth mode).
    #[serde(default)]
    pub jwt_secret: String,
    /// Secret for the `?preview=` unlock (coming-soon mode).
    #[serde(default)]
    pub preview_secret: String,
    /// Secret for the `?access=` unlock (tech-access mode).
    #[serde(default)]
    pub tech_access_secret: String,
    /// Lifetime of the `preview_mode` cookie.
    #[serde(default = "default_preview_cookie_days")]
    pub preview_cookie_days: u32,
    /// Lifetime of the `tech_access` cookie.
    #[serde(default = "default_tech_cookie_days")]
    pub tech_cookie_days: u32,
}

fn default_preview_cookie_days() -> u32 {
    7
}

fn default_tech_cookie_days() -> u32 {
    30
}

impl GateConfig {
    /// Configuration for the given mode with empty secrets and default
    /// cookie lifetimes.
    pub fn for_mode(mode: GateMode) -> Self {
        Self {
            mode,
            jwt_secret: String::new(),
            preview_secret: String::new(),
            tech_access_secret: String::new(),
            preview_cookie_days: default_preview_cookie_days(),
            tech_cookie_days: default_tech_cookie_days(),
        }
    }
}
