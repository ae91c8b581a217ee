//! A single timed call to an orchestrator endpoint.

use async_trait::async_trait;
use proxy_config::RetryConfig;
use proxy_types::{round_ms, FetchTiming, HttpMethod, ProxyError, Result};
use reqwest::{header::CONTENT_TYPE, Client, Method};
use std::error::Error as _;
use std::time::{Duration, Instant};

/// One upstream call as the executor issues it.
#[derive(Debug, Clone, Copy)]
pub struct UpstreamRequest<'a> {
	pub url: &'a str,
	pub method: HttpMethod,
	pub api_key: &'a str,
	pub body: Option<&'a str>,
}

/// Performs one upstream call, without retrying.
#[async_trait]
pub trait Transport: Send + Sync {
	async fn fetch(&self, request: &UpstreamRequest<'_>) -> Result<FetchTiming>;
}

/// reqwest-backed transport with an overall per-attempt deadline.
#[derive(Debug, Clone)]
pub struct HttpTransport {
	client: Client,
	timeout: Duration,
}

impl HttpTransport {
	pub fn new(client: Client, timeout: Duration) -> Self {
		Self { client, timeout }
	}

	/// Builds the shared client: short connect timeout and idle keep-alive.
	/// The overall deadline is enforced per attempt, not by the client.
	pub fn from_config(config: &RetryConfig) -> Result<Self> {
		let client = Client::builder()
			.connect_timeout(Duration::from_millis(config.connect_timeout_ms))
			.pool_idle_timeout(Duration::from_millis(config.pool_idle_timeout_ms))
			.build()
			.map_err(|e| ProxyError::Config(format!("Failed to create HTTP client: {}", e)))?;

		Ok(Self::new(client, Duration::from_millis(config.timeout_ms)))
	}
}

#[async_trait]
impl Transport for HttpTransport {
	async fn fetch(&self, request: &UpstreamRequest<'_>) -> Result<FetchTiming> {
		fetch_with_timing(&self.client, request, self.timeout).await
	}
}

/// Sends `request` and reads the whole body before `timeout` expires.
///
/// The deadline covers connect, headers and body. When it fires the request
/// future is dropped, which closes the connection.
pub async fn fetch_with_timing(
	client: &Client,
	request: &UpstreamRequest<'_>,
	timeout: Duration,
) -> Result<FetchTiming> {
	let started = Instant::now();

	let call = async {
		let method = match request.method {
			HttpMethod::Get => Method::GET,
			HttpMethod::Post => Method::POST,
		};
		let mut builder = client
			.request(method, request.url)
			.header(CONTENT_TYPE, "application/json")
			.header("x-api-key", request.api_key);
		if let Some(body) = request.body {
			builder = builder.body(body.to_string());
		}

		let response = builder.send().await?;
		let ttfb = started.elapsed();
		let status = response.status().as_u16();
		let body = response.text().await?;

		Ok::<_, reqwest::Error>((ttfb, status, body))
	};

	match tokio::time::timeout(timeout, call).await {
		Ok(Ok((ttfb, status, body))) => Ok(FetchTiming {
			ttfb_ms: round_ms(ttfb.as_secs_f64() * 1000.0),
			total_ms: round_ms(started.elapsed().as_secs_f64() * 1000.0),
			status,
			body,
		}),
		Ok(Err(e)) => Err(ProxyError::Transport(describe(&e))),
		Err(_) => Err(ProxyError::Timeout {
			elapsed_ms: started.elapsed().as_millis() as u64,
			url: request.url.to_string(),
		}),
	}
}

/// reqwest's top-level message plus its causes, e.g.
/// `error sending request for url (...): client error (Connect): tcp connect error: Connection refused`.
fn describe(error: &reqwest::Error) -> String {
	let mut message = error.to_string();
	let mut source = error.source();
	while let Some(cause) = source {
		let cause_message = cause.to_string();
		if !message.contains(&cause_message) {
			message.push_str(": ");
			message.push_str(&cause_message);
		}
		source = cause.source();
	}
	message
}
