//! Shared, immutable application state.

use proxy_config::ProxyConfig;
use proxy_core::{HttpTransport, ProxyExecutor, Transport, Upstreams};
use proxy_types::Result;
use std::sync::Arc;

/// Cloned into every handler. Holds nothing mutable.
#[derive(Clone)]
pub struct AppState {
	pub config: Arc<ProxyConfig>,
	pub executor: ProxyExecutor,
	pub upstreams: Upstreams,
}

impl AppState {
	pub fn new(config: ProxyConfig, transport: Arc<dyn Transport>) -> Self {
		let executor = ProxyExecutor::new(transport, config.retry.clone());
		let upstreams = Upstreams::from_config(&config.upstream);

		Self {
			config: Arc::new(config),
			executor,
			upstreams,
		}
	}

	/// State backed by one pooled reqwest client.
	pub fn from_config(config: ProxyConfig) -> Result<Self> {
		let transport = HttpTransport::from_config(&config.retry)?;
		Ok(Self::new(config, Arc::new(transport)))
	}

	pub fn api_key(&self) -> Option<&str> {
		self.config.upstream.api_key()
	}
}
