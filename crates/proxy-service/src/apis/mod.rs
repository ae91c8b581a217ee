//! Orchestrator proxy routes.
//!
//! Every route runs the same admission sequence before doing anything
//! route-specific:
//!
//! 1. `OPTIONS` is answered with a 204 preflight
//! 2. any verb other than the route's own is a 405
//! 3. a missing API key is a 500
//!
//! Handlers take their extractors as `Result`s so that malformed paths,
//! queries and bodies are reported after admission, in the same JSON and
//! CORS shape as every other answer.
//!
//! After the route has validated its own input, [`forward`] classifies the
//! request, builds the candidate endpoints and hands them to the executor
//! with the route's retry settings.

pub mod health;
pub mod intent_operation;
pub mod intent_operations;
pub mod intents_route;
pub mod portfolio;

use crate::response::{self, api_key_missing, method_not_allowed, preflight};
use crate::state::AppState;
use axum::{
	http::{HeaderValue, Method, StatusCode},
	response::Response,
};
use bytes::Bytes;
use proxy_core::{
	append_query, classify, encode_path, generate_request_id, BackoffMode, ProxyRequest,
	RetryPolicy,
};
use proxy_types::{ChainId, Environment, HttpMethod};
use serde_json::Value;
use tracing::{debug, error, info};

/// Per-route proxy settings.
#[derive(Debug, Clone, Copy)]
pub struct RouteSettings {
	pub name: &'static str,
	pub verb: HttpMethod,
	/// Value of `Access-Control-Allow-Methods`
	pub allowed: &'static str,
	pub policy: RetryPolicy,
	pub backoff: BackoffMode,
	pub max_retries: Option<u32>,
}

impl RouteSettings {
	fn accepts(&self, method: &Method) -> bool {
		match self.verb {
			HttpMethod::Get => method == Method::GET,
			HttpMethod::Post => method == Method::POST,
		}
	}

	pub fn bad_request(&self, message: &str) -> Response {
		response::error_response(StatusCode::BAD_REQUEST, message, self.allowed)
	}

	/// An extractor rejection in the route's JSON and CORS shape, keeping
	/// axum's status and message.
	pub fn rejected(&self, status: StatusCode, message: &str) -> Response {
		debug!(route = self.name, status = status.as_u16(), "Rejected request: {}", message);
		response::error_response(status, message, self.allowed)
	}

	/// A single path value, trimmed. Blank values and dot segments are
	/// refused with `missing`.
	pub fn path_value<'a>(&self, raw: &'a str, missing: &str) -> Result<&'a str, Response> {
		let value = raw.trim();
		match value {
			"" => Err(self.bad_request(missing)),
			"." | ".." => Err(self.bad_request(&format!("Invalid path parameter '{}'", value))),
			_ => Ok(value),
		}
	}

	/// Parses a JSON body. The raw text is kept for forwarding.
	pub fn json_body(&self, body: &Bytes) -> Result<(Value, String), Response> {
		let value = serde_json::from_slice::<Value>(body).map_err(|e| {
			debug!(route = self.name, "Invalid JSON body: {}", e);
			self.bad_request("Invalid JSON body")
		})?;
		let text = String::from_utf8_lossy(body).into_owned();
		Ok((value, text))
	}
}

/// Runs the shared admission checks and yields the API key, or the response
/// that ends the request.
pub fn admit(
	route: &RouteSettings,
	state: &AppState,
	method: &Method,
) -> Result<String, Response> {
	if method == Method::OPTIONS {
		return Err(preflight(route.allowed));
	}

	if !route.accepts(method) {
		debug!(route = route.name, method = %method, "Rejected method");
		return Err(method_not_allowed(route.allowed));
	}

	match state.api_key() {
		Some(key) => Ok(key.to_string()),
		None => {
			error!(route = route.name, "API key not configured");
			Err(api_key_missing(route.allowed))
		}
	}
}

/// One admitted request, ready to be proxied.
pub struct Forward<'a> {
	/// Upstream path as raw, unencoded segments
	pub segments: Vec<&'a str>,
	pub chain_ids: Vec<ChainId>,
	pub query: &'a [(String, String)],
	pub body: Option<String>,
}

/// Classifies, builds endpoints and executes. Always produces a response.
pub async fn forward(
	route: &RouteSettings,
	state: &AppState,
	api_key: String,
	request: Forward<'_>,
) -> Response {
	let request_id = generate_request_id();
	let env = classify(&request.chain_ids);

	info!(
		request_id = %request_id,
		route = route.name,
		path = ?request.segments,
		environment = %env,
		chain_ids = ?request.chain_ids,
		"Proxying request"
	);

	let response = match proxy(route, state, api_key, env, &request_id, request).await {
		Ok(outcome) => response::proxy_response(outcome, route.allowed),
		Err(e) => {
			error!(request_id = %request_id, route = route.name, "Proxy request failed: {}", e);
			response::proxy_failure(e.to_string(), route.allowed)
		}
	};

	with_request_id(response, &request_id)
}

async fn proxy(
	route: &RouteSettings,
	state: &AppState,
	api_key: String,
	env: Environment,
	request_id: &str,
	request: Forward<'_>,
) -> proxy_types::Result<proxy_types::ProxyOutcome> {
	let path = encode_path(&request.segments)?;
	let endpoints = state.upstreams.build_endpoints(&path, env);
	let endpoints = append_query(endpoints, request.query)?;

	let mut proxy_request = ProxyRequest::new(endpoints, route.verb, api_key, request_id)
		.with_policy(route.policy)
		.with_backoff(route.backoff);
	if let Some(max_retries) = route.max_retries {
		proxy_request = proxy_request.with_max_retries(max_retries);
	}
	if let Some(body) = request.body {
		proxy_request = proxy_request.with_body(body);
	}

	state.executor.execute(proxy_request).await
}

fn with_request_id(mut response: Response, request_id: &str) -> Response {
	if let Ok(value) = HeaderValue::from_str(request_id) {
		response.headers_mut().insert("x-request-id", value);
	}
	response
}
