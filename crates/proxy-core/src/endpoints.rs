//! Candidate upstream URLs for a request.

use proxy_config::{UpstreamConfig, PROD_BASE_URL, STAGING_BASE_URL};
use proxy_types::{Environment, ProxyError, Result};
use reqwest::Url;

/// Base URLs of the two orchestrator deployments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upstreams {
	prod_base_url: String,
	staging_base_url: String,
}

impl Default for Upstreams {
	fn default() -> Self {
		Self::new(PROD_BASE_URL, STAGING_BASE_URL)
	}
}

impl Upstreams {
	pub fn new(prod_base_url: impl Into<String>, staging_base_url: impl Into<String>) -> Self {
		Self {
			prod_base_url: prod_base_url.into(),
			staging_base_url: staging_base_url.into(),
		}
	}

	pub fn from_config(config: &UpstreamConfig) -> Self {
		Self::new(&config.prod_base_url, &config.staging_base_url)
	}

	/// Upstream URLs to try, in order. Undetermined requests get prod first.
	pub fn build_endpoints(&self, path: &str, env: Environment) -> Vec<String> {
		match env {
			Environment::Prod => vec![format!("{}{}", self.prod_base_url, path)],
			Environment::Staging => vec![format!("{}{}", self.staging_base_url, path)],
			Environment::Undetermined => vec![
				format!("{}{}", self.prod_base_url, path),
				format!("{}{}", self.staging_base_url, path),
			],
		}
	}
}

/// [`Upstreams::build_endpoints`] against the public orchestrator hosts.
pub fn build_endpoints(path: &str, env: Environment) -> Vec<String> {
	Upstreams::default().build_endpoints(path, env)
}

/// Joins raw path values into an absolute upstream path, one segment each.
///
/// `/`, `?`, `#` and `%` inside a value are percent-encoded, so a value can
/// never leave its segment. `.` and `..` are refused since they would be
/// resolved away.
pub fn encode_path<S: AsRef<str>>(segments: &[S]) -> Result<String> {
	if let Some(dot) = segments
		.iter()
		.map(AsRef::as_ref)
		.find(|segment| matches!(*segment, "." | ".."))
	{
		return Err(ProxyError::InvalidUrl(format!(
			"Dot segment '{}' in upstream path",
			dot
		)));
	}

	let mut url = Url::parse("http://upstream/")
		.map_err(|e| ProxyError::InvalidUrl(e.to_string()))?;
	url.path_segments_mut()
		.map_err(|_| ProxyError::InvalidUrl("Cannot build upstream path".to_string()))?
		.pop_if_empty()
		.extend(segments.iter().map(AsRef::as_ref));

	Ok(url.path().to_string())
}

/// Copies the inbound query parameters, in order, onto every endpoint.
pub fn append_query(endpoints: Vec<String>, query: &[(String, String)]) -> Result<Vec<String>> {
	if query.is_empty() {
		return Ok(endpoints);
	}

	endpoints
		.into_iter()
		.map(|endpoint| {
			let mut url = Url::parse(&endpoint)
				.map_err(|e| ProxyError::InvalidUrl(format!("{}: {}", endpoint, e)))?;
			url.query_pairs_mut().extend_pairs(query);
			Ok(url.to_string())
		})
		.collect()
}
