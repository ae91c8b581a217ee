//! Shared types for the orchestrator proxy.
//!
//! Everything here is request-scoped data: chain identifiers and their
//! testnet classification, the backend environment, upstream methods, and
//! the results produced by a proxied call.

pub mod chains;
pub mod environment;
pub mod errors;
pub mod proxy;

pub use chains::*;
pub use environment::*;
pub use errors::*;
pub use proxy::*;
