//! HTTP service for the orchestrator proxy.
//!
//! # Components
//!
//! - `api`: router assembly and the server loop
//! - `apis`: one adapter per proxied route, plus the health check
//! - `response`: CORS and JSON response shaping
//! - `state`: immutable state shared by the handlers
//! - `telemetry`: tracing subscriber setup
//! - `cli`: command-line arguments

pub mod api;
pub mod apis;
pub mod cli;
pub mod response;
pub mod state;
pub mod telemetry;

pub use api::{router, ApiServer};
pub use state::AppState;
