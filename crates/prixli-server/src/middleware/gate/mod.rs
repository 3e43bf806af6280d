//! Request-gate middleware.

pub mod layer;

pub use layer::{GateLayer, GateMiddleware};
