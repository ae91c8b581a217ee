//! Retrying proxy executor.
//!
//! Walks the candidate endpoints in order. Idempotent requests get
//! `max_retries` extra attempts per endpoint, non-idempotent requests get a
//! single attempt per endpoint and only fall back to the next one. Attempts
//! are strictly sequential: whether a later one is needed depends on the
//! earlier outcome.
//!
//! The executor only fails when no attempt produced an HTTP response at all.
//! If the route's policy asked for a retry on every response it got, the last
//! of those responses is returned instead.

use crate::policy::{BackoffMode, RetryPolicy};
use crate::schedule::JitteredBackoff;
use crate::transport::{Transport, UpstreamRequest};
use backoff::backoff::Backoff;
use proxy_config::RetryConfig;
use proxy_types::{FetchTiming, HttpMethod, ProxyError, ProxyOutcome, Result};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

const MAX_LOGGED_ERROR_CHARS: usize = 200;

/// Everything the executor needs to proxy one inbound request.
#[derive(Debug, Clone)]
pub struct ProxyRequest {
	pub endpoints: Vec<String>,
	pub method: HttpMethod,
	pub api_key: String,
	pub body: Option<String>,
	pub policy: RetryPolicy,
	pub backoff: BackoffMode,
	/// Overrides the configured retry budget for this request
	pub max_retries: Option<u32>,
	pub request_id: String,
}

impl ProxyRequest {
	pub fn new(
		endpoints: Vec<String>,
		method: HttpMethod,
		api_key: impl Into<String>,
		request_id: impl Into<String>,
	) -> Self {
		Self {
			endpoints,
			method,
			api_key: api_key.into(),
			body: None,
			policy: RetryPolicy::Never,
			backoff: BackoffMode::Exponential,
			max_retries: None,
			request_id: request_id.into(),
		}
	}

	pub fn with_body(mut self, body: impl Into<String>) -> Self {
		self.body = Some(body.into());
		self
	}

	pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
		self.policy = policy;
		self
	}

	pub fn with_backoff(mut self, backoff: BackoffMode) -> Self {
		self.backoff = backoff;
		self
	}

	pub fn with_max_retries(mut self, max_retries: u32) -> Self {
		self.max_retries = Some(max_retries);
		self
	}
}

/// Proxies requests across candidate endpoints with retries.
#[derive(Clone)]
pub struct ProxyExecutor {
	transport: Arc<dyn Transport>,
	config: RetryConfig,
}

impl ProxyExecutor {
	pub fn new(transport: Arc<dyn Transport>, config: RetryConfig) -> Self {
		Self { transport, config }
	}

	pub async fn execute(&self, request: ProxyRequest) -> Result<ProxyOutcome> {
		if request.endpoints.is_empty() {
			return Err(ProxyError::NoEndpoints);
		}

		let max_retries = request.max_retries.unwrap_or(self.config.max_retries);
		let retries_per_endpoint = if request.method.is_idempotent() {
			max_retries
		} else {
			0
		};
		let endpoint_count = request.endpoints.len();
		let total_attempts = endpoint_count * (retries_per_endpoint as usize + 1);

		let mut attempt = 0usize;
		let mut last_error: Option<ProxyError> = None;
		let mut last_response: Option<FetchTiming> = None;
		let mut backoff = JitteredBackoff::from_config(&self.config, request.backoff);

		for endpoint in &request.endpoints {
			backoff.reset();

			for retry in 0..=retries_per_endpoint {
				attempt += 1;
				let attempt_started = Instant::now();

				info!(
					event = "proxy_attempt_start",
					request_id = %request.request_id,
					endpoint = %endpoint,
					attempt,
					retry,
					method = %request.method,
					"Proxy attempt started"
				);

				let upstream = UpstreamRequest {
					url: endpoint,
					method: request.method,
					api_key: &request.api_key,
					body: request.body.as_deref(),
				};

				match self.transport.fetch(&upstream).await {
					Ok(result) => {
						info!(
							event = "proxy_attempt_success",
							request_id = %request.request_id,
							endpoint = %endpoint,
							attempt,
							retry,
							ttfb_ms = result.ttfb_ms,
							total_ms = result.total_ms,
							status = result.status,
							elapsed_ms = elapsed_ms(attempt_started),
							"Proxy attempt completed"
						);

						if !request.policy.should_retry(result.status, endpoint_count) {
							return Ok(result.into());
						}

						debug!(
							request_id = %request.request_id,
							status = result.status,
							"Response is retryable under {:?}",
							request.policy
						);
						last_response = Some(result);
					}
					Err(e) => {
						let message: String = e.to_string().chars().take(MAX_LOGGED_ERROR_CHARS).collect();
						warn!(
							event = "proxy_attempt_error",
							request_id = %request.request_id,
							endpoint = %endpoint,
							attempt,
							retry,
							error_name = e.kind(),
							error_message = %message,
							elapsed_ms = elapsed_ms(attempt_started),
							"Proxy attempt failed"
						);
						last_error = Some(e);
					}
				}

				// Waits only while the configured retry budget for this
				// endpoint is not used up, so POST fallbacks wait too.
				if attempt < total_attempts && retry < max_retries {
					if let Some(delay) = backoff.next_backoff().filter(|d| !d.is_zero()) {
						debug!(
							request_id = %request.request_id,
							"Backing off for {}ms",
							delay.as_millis()
						);
						tokio::time::sleep(delay).await;
					}
				}
			}
		}

		if let Some(response) = last_response {
			info!(
				request_id = %request.request_id,
				status = response.status,
				"All attempts exhausted, returning last upstream response"
			);
			return Ok(response.into());
		}

		Err(last_error.unwrap_or(ProxyError::NoEndpoints))
	}
}

fn elapsed_ms(started: Instant) -> f64 {
	proxy_types::round_ms(started.elapsed().as_secs_f64() * 1000.0)
}
