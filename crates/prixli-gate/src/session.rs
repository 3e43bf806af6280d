//! Session-token verification.
//!
//! The session token is an HS256 JWT issued by the external auth backend
//! and stored in the `token` cookie. This module only verifies and reads
//! it; issuance and rotation live on the backend.

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Claims carried by the session token. Unknown claims are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (user identifier), opaque to the gate.
    #[serde(default)]
    pub sub: String,
    /// Authorization role claim.
    pub role: String,
    /// Issued-at timestamp.
    #[serde(default)]
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl SessionClaims {
    /// Claims for a token expiring `expires_in` seconds from now.
    pub fn new(sub: impl Into<String>, role: impl Into<String>, expires_in: i64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: sub.into(),
            role: role.into(),
            iat: now,
            exp: now + expires_in,
        }
    }
}

/// Authorization role embedded in the session token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Back-office user; routed to the dashboard.
    Admin,
    /// Ordinary shopper account.
    Client,
}

impl Role {
    /// Classify a raw `role` claim. Anything that is not `admin` gets
    /// client-level access.
    pub fn from_claim(role: &str) -> Self {
        if role == "admin" {
            Self::Admin
        } else {
            Self::Client
        }
    }

    /// Whether this role may enter the admin area.
    pub fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

/// Result of verifying a session token.
///
/// A forged, malformed and expired token are deliberately
/// indistinguishable: all of them are `Invalid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionVerdict {
    /// Signature and expiry check out; the role claim was read.
    Valid {
        /// Role extracted from the token.
        role: Role,
    },
    /// Anything else.
    Invalid,
}

/// Verify a session token against the shared secret.
///
/// Synchronous and local: the single cryptographic operation the gate
/// performs per request.
pub fn verify_session(token: &str, secret: &str) -> SessionVerdict {
    let mut validation = Validation::default();
    validation.validate_exp = true;

    match decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    ) {
        Ok(data) => SessionVerdict::Valid {
            role: Role::from_claim(&data.claims.role),
        },
        Err(err) => {
            debug!(error = %err, "session token rejected");
            SessionVerdict::Invalid
        }
    }
}

/// Encode claims into a session token. The backend owns issuance in
/// production; this exists for tests and local tooling.
pub fn encode_session(
    claims: &SessionClaims,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}
