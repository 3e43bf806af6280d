//! Prixli Request Gate
//!
//! The decision pipeline that runs in front of routing for the Prixli
//! price-comparison application. Every inbound request is classified
//! (bot vs human, coming-soon vs launched, authenticated vs anonymous,
//! admin vs client) and resolved to exactly one outcome: pass-through,
//! a redirect, or a redirect that also mutates cookies.
//!
//! The pipeline is a pure function of the request context — path, query,
//! user-agent and cookies — so it can be evaluated concurrently without
//! coordination and tested without an HTTP layer. The HTTP-facing crate
//! (`prixli-server`) is responsible for building the [`RequestContext`]
//! and materializing the returned [`Decision`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod context;
pub mod decision;
pub mod pipeline;
pub mod routes;
pub mod session;

pub use config::{GateConfig, GateMode};
pub use context::RequestContext;
pub use decision::{CookieOp, Decision};
pub use pipeline::RequestGate;
pub use session::{Role, SessionVerdict};
