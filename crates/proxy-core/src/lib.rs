//! Environment detection and resilient dual-endpoint proxying.
//!
//! A request is routed by the chain IDs it mentions: testnet-only requests go
//! to the staging orchestrator, mainnet-only requests go to production, and
//! anything else is tried against production first and staging second.
//!
//! # Components
//!
//! - `extract`: tolerant chain ID extraction from query strings and bodies
//! - `classifier`: chain IDs to [`Environment`]
//! - `endpoints`: environment to candidate upstream URLs
//! - `transport`: a single timed upstream call
//! - `executor`: retries and fallback across the candidates
//!
//! [`Environment`]: proxy_types::Environment

pub mod classifier;
pub mod endpoints;
pub mod executor;
pub mod extract;
pub mod policy;
pub mod request_id;
pub mod schedule;
pub mod transport;

pub use classifier::classify;
pub use endpoints::{append_query, build_endpoints, encode_path, Upstreams};
pub use executor::{ProxyExecutor, ProxyRequest};
pub use policy::{BackoffMode, RetryPolicy};
pub use request_id::generate_request_id;
pub use schedule::JitteredBackoff;
pub use transport::{fetch_with_timing, HttpTransport, Transport, UpstreamRequest};
