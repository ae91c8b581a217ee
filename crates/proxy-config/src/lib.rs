//! Configuration loading for the orchestrator proxy.
//!
//! Configuration comes from an optional TOML file with `${VAR}` substitution,
//! followed by environment overrides. The API key is normally only present in
//! the environment (`RHINESTONE_API_KEY`).

pub mod types;

pub use types::*;

use regex::Regex;
use std::collections::HashMap;
use std::env;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

pub const API_KEY_ENV: &str = "RHINESTONE_API_KEY";

/// Prefix of the server and upstream override variables
pub const ENV_PREFIX: &str = "PROXY_";

#[derive(Error, Debug)]
pub enum ConfigError {
	#[error("File not found: {0}")]
	FileNotFound(String),

	#[error("Parse error: {0}")]
	ParseError(String),

	#[error("Validation error: {0}")]
	ValidationError(String),

	#[error("Environment variable not found: {0}")]
	EnvVarNotFound(String),

	#[error("IO error: {0}")]
	IoError(#[from] std::io::Error),
}

/// Configuration loader with environment variable substitution
pub struct ConfigLoader {
	file_path: Option<String>,
	/// Replaces the process environment when set
	vars: Option<HashMap<String, String>>,
}

impl Default for ConfigLoader {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigLoader {
	pub fn new() -> Self {
		Self {
			file_path: None,
			vars: None,
		}
	}

	pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
		self.file_path = Some(path.as_ref().to_string_lossy().to_string());
		self
	}

	/// Reads variables from `vars` instead of the process environment.
	pub fn with_vars(mut self, vars: HashMap<String, String>) -> Self {
		self.vars = Some(vars);
		self
	}

	pub async fn load(&self) -> Result<ProxyConfig, ConfigError> {
		let mut config = match &self.file_path {
			Some(file_path) => self.load_from_file(file_path).await?,
			None => ProxyConfig::default(),
		};

		self.apply_env_overrides(&mut config)?;
		normalize(&mut config);
		validate_config(&config)?;

		Ok(config)
	}

	async fn load_from_file(&self, file_path: &str) -> Result<ProxyConfig, ConfigError> {
		if !Path::new(file_path).exists() {
			return Err(ConfigError::FileNotFound(file_path.to_string()));
		}
		let content = tokio::fs::read_to_string(file_path).await?;

		let substituted_content = self.substitute_env_vars(&content)?;

		let config: ProxyConfig = toml::from_str(&substituted_content)
			.map_err(|e| ConfigError::ParseError(e.to_string()))?;

		Ok(config)
	}

	fn var(&self, name: &str) -> Option<String> {
		match &self.vars {
			Some(vars) => vars.get(name).cloned(),
			None => env::var(name).ok(),
		}
	}

	fn substitute_env_vars(&self, content: &str) -> Result<String, ConfigError> {
		let mut result = content.to_string();

		let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ConfigError::ParseError(e.to_string()))?;

		for cap in re.captures_iter(content) {
			let full_match = &cap[0];
			let var_name = &cap[1];

			let env_value = self
				.var(var_name)
				.ok_or_else(|| ConfigError::EnvVarNotFound(var_name.to_string()))?;

			result = result.replace(full_match, &env_value);
		}

		Ok(result)
	}

	fn apply_env_overrides(&self, config: &mut ProxyConfig) -> Result<(), ConfigError> {
		if let Some(api_key) = self.var(API_KEY_ENV) {
			debug!("Using API key from {}", API_KEY_ENV);
			config.upstream.api_key = Some(api_key);
		}

		if let Some(host) = self.var(&format!("{}HOST", ENV_PREFIX)) {
			config.server.host = host;
		}

		if let Some(port) = self.var(&format!("{}PORT", ENV_PREFIX)) {
			config.server.port = port
				.parse()
				.map_err(|e| ConfigError::ValidationError(format!("Invalid port: {}", e)))?;
		}

		if let Some(log_level) = self.var(&format!("{}LOG_LEVEL", ENV_PREFIX)) {
			config.logging.level = log_level;
		}

		if let Some(url) = self.var(&format!("{}PROD_BASE_URL", ENV_PREFIX)) {
			config.upstream.prod_base_url = url;
		}

		if let Some(url) = self.var(&format!("{}STAGING_BASE_URL", ENV_PREFIX)) {
			config.upstream.staging_base_url = url;
		}

		Ok(())
	}
}

fn normalize(config: &mut ProxyConfig) {
	let trim = |url: &mut String| {
		while url.ends_with('/') {
			url.pop();
		}
	};
	trim(&mut config.upstream.prod_base_url);
	trim(&mut config.upstream.staging_base_url);

	if config.server.base_path.len() > 1 {
		trim(&mut config.server.base_path);
	}
}

/// Checks a loaded configuration for values the proxy cannot run with.
pub fn validate_config(config: &ProxyConfig) -> Result<(), ConfigError> {
	for (name, url) in [
		("prod_base_url", &config.upstream.prod_base_url),
		("staging_base_url", &config.upstream.staging_base_url),
	] {
		if !(url.starts_with("http://") || url.starts_with("https://")) {
			return Err(ConfigError::ValidationError(format!(
				"upstream.{} must be an absolute http(s) URL, got '{}'",
				name, url
			)));
		}
	}

	if !config.server.base_path.starts_with('/') {
		return Err(ConfigError::ValidationError(format!(
			"server.base_path must start with '/', got '{}'",
			config.server.base_path
		)));
	}

	if config.retry.timeout_ms == 0 {
		return Err(ConfigError::ValidationError(
			"retry.timeout_ms must be greater than zero".to_string(),
		));
	}

	if config.retry.max_delay_ms < config.retry.base_delay_ms {
		return Err(ConfigError::ValidationError(format!(
			"retry.max_delay_ms ({}) is below retry.base_delay_ms ({})",
			config.retry.max_delay_ms, config.retry.base_delay_ms
		)));
	}

	Ok(())
}
