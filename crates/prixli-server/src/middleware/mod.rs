//! Middleware for the Prixli edge server.

pub mod gate;

pub use gate::{GateLayer, GateMiddleware};
