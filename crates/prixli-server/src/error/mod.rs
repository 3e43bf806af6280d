//! Error handling for the Prixli edge server.

pub mod response;
pub mod types;

pub use types::{EdgeError, EdgeResult};
