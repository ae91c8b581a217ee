//! Tracing subscriber setup.

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Tracing configuration
#[derive(Debug, Clone)]
pub struct TracingConfig {
	/// Filter directive, e.g. `info` or `proxy_core=debug,info`
	pub level: String,
	pub json_format: bool,
	pub with_target: bool,
	pub with_file_and_line: bool,
}

impl Default for TracingConfig {
	fn default() -> Self {
		Self {
			level: "info".to_string(),
			json_format: false,
			with_target: true,
			with_file_and_line: false,
		}
	}
}

impl TracingConfig {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_level(mut self, level: impl Into<String>) -> Self {
		self.level = level.into();
		self
	}

	/// One flat JSON object per event, no file locations.
	pub fn production() -> Self {
		Self {
			level: "info".to_string(),
			json_format: true,
			with_target: false,
			with_file_and_line: false,
		}
	}
}

/// Installs the global subscriber. `RUST_LOG` wins over the configured level.
pub fn init_tracing(config: &TracingConfig) -> anyhow::Result<()> {
	let env_filter =
		EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.level))?;

	let registry = tracing_subscriber::registry().with(env_filter);

	if config.json_format {
		let json_layer = tracing_subscriber::fmt::layer()
			.json()
			.flatten_event(true)
			.with_target(config.with_target)
			.with_file(config.with_file_and_line)
			.with_line_number(config.with_file_and_line);

		registry
			.with(json_layer)
			.try_init()
			.map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;
	} else {
		let fmt_layer = tracing_subscriber::fmt::layer()
			.with_target(config.with_target)
			.with_file(config.with_file_and_line)
			.with_line_number(config.with_file_and_line);

		registry
			.with(fmt_layer)
			.try_init()
			.map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;
	}

	info!("Tracing initialized with level: {}", config.level);
	Ok(())
}
