//! Error types for the proxy.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProxyError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProxyError {
	/// The per-attempt deadline fired before the body was read.
	#[error("Request timeout after {elapsed_ms}ms: {url}")]
	Timeout { elapsed_ms: u64, url: String },

	/// Connect, DNS, TLS or body read failure.
	#[error("{0}")]
	Transport(String),

	#[error("Invalid upstream URL: {0}")]
	InvalidUrl(String),

	#[error("No upstream endpoints to try")]
	NoEndpoints,

	#[error("Configuration error: {0}")]
	Config(String),
}

impl ProxyError {
	/// Short error kind used in attempt log lines.
	pub fn kind(&self) -> &'static str {
		match self {
			ProxyError::Timeout { .. } => "TimeoutError",
			ProxyError::Transport(_) => "TransportError",
			ProxyError::InvalidUrl(_) => "InvalidUrlError",
			ProxyError::NoEndpoints => "NoEndpointsError",
			ProxyError::Config(_) => "ConfigError",
		}
	}
}
