//! Configuration types for the proxy.

use serde::{Deserialize, Serialize};

pub const PROD_BASE_URL: &str = "https://v1.orchestrator.rhinestone.dev";
pub const STAGING_BASE_URL: &str = "https://staging.v1.orchestrator.rhinestone.dev";

/// Complete proxy configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ProxyConfig {
	/// Inbound HTTP server settings
	pub server: ServerConfig,
	/// Orchestrator deployments and credentials
	pub upstream: UpstreamConfig,
	/// Attempt budget, deadlines and backoff
	pub retry: RetryConfig,
	/// Log output
	pub logging: LoggingConfig,
}

/// Inbound HTTP server settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
	pub host: String,
	pub port: u16,
	/// Prefix every proxy route is mounted under
	pub base_path: String,
	/// Largest accepted request body
	pub max_body_bytes: usize,
}

impl Default for ServerConfig {
	fn default() -> Self {
		Self {
			host: "0.0.0.0".to_string(),
			port: 3000,
			base_path: "/api".to_string(),
			max_body_bytes: 2 * 1024 * 1024,
		}
	}
}

/// Orchestrator deployments
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
	pub prod_base_url: String,
	pub staging_base_url: String,
	/// Sent as `x-api-key`; usually supplied through `RHINESTONE_API_KEY`
	#[serde(skip_serializing)]
	pub api_key: Option<String>,
}

impl Default for UpstreamConfig {
	fn default() -> Self {
		Self {
			prod_base_url: PROD_BASE_URL.to_string(),
			staging_base_url: STAGING_BASE_URL.to_string(),
			api_key: None,
		}
	}
}

impl UpstreamConfig {
	/// The configured key, ignoring empty values.
	pub fn api_key(&self) -> Option<&str> {
		self.api_key.as_deref().filter(|key| !key.is_empty())
	}
}

/// Attempt budget, deadlines and backoff
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
	/// Extra attempts per endpoint for idempotent requests
	pub max_retries: u32,
	/// Overall deadline for one attempt, body included
	pub timeout_ms: u64,
	pub connect_timeout_ms: u64,
	pub pool_idle_timeout_ms: u64,
	/// Backoff before retry `n` is `base_delay_ms * 2^n + rand(0, jitter_ms)`
	pub base_delay_ms: u64,
	pub jitter_ms: u64,
	/// Upper bound on a single backoff
	pub max_delay_ms: u64,
}

impl Default for RetryConfig {
	fn default() -> Self {
		Self {
			max_retries: 2,
			timeout_ms: 30_000,
			connect_timeout_ms: 3_000,
			pool_idle_timeout_ms: 4_000,
			base_delay_ms: 1_000,
			jitter_ms: 1_000,
			max_delay_ms: 5_000,
		}
	}
}

/// Log output
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
	pub level: String,
	/// One JSON object per line instead of human readable output
	pub json: bool,
}

impl Default for LoggingConfig {
	fn default() -> Self {
		Self {
			level: "info".to_string(),
			json: false,
		}
	}
}
