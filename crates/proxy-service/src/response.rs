//! Response shaping shared by every route.
//!
//! All responses carry the permissive CORS headers with the route's own method
//! list. Everything except the preflight is labeled `application/json`.

use axum::{
	http::{
		header::{
			ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
			ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE,
		},
		HeaderName, StatusCode,
	},
	response::{IntoResponse, Response},
};
use proxy_types::ProxyOutcome;
use serde::{Deserialize, Serialize};

/// Method list used where no route is known.
pub const DEFAULT_METHODS: &str = "GET, POST, OPTIONS";

/// Error body returned by the proxy itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
	pub error: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub details: Option<String>,
}

pub fn cors_headers(methods: &'static str) -> [(HeaderName, &'static str); 3] {
	[
		(ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
		(ACCESS_CONTROL_ALLOW_METHODS, methods),
		(ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
	]
}

/// `OPTIONS` answer: 204, no body.
pub fn preflight(methods: &'static str) -> Response {
	(StatusCode::NO_CONTENT, cors_headers(methods)).into_response()
}

fn json_response(status: StatusCode, body: String, methods: &'static str) -> Response {
	(
		status,
		[(CONTENT_TYPE, "application/json")],
		cors_headers(methods),
		body,
	)
		.into_response()
}

fn error_body(body: &ErrorResponse) -> String {
	serde_json::to_string(body).unwrap_or_else(|_| format!(r#"{{"error":"{}"}}"#, body.error))
}

/// `{"error": message}` with the given status.
pub fn error_response(status: StatusCode, message: &str, methods: &'static str) -> Response {
	let body = ErrorResponse {
		error: message.to_string(),
		details: None,
	};
	json_response(status, error_body(&body), methods)
}

pub fn method_not_allowed(methods: &'static str) -> Response {
	error_response(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed", methods)
}

pub fn api_key_missing(methods: &'static str) -> Response {
	error_response(
		StatusCode::INTERNAL_SERVER_ERROR,
		"API key not configured",
		methods,
	)
}

/// Catch-all 500 carrying the failure message in `details`.
pub fn proxy_failure(details: impl Into<String>, methods: &'static str) -> Response {
	let body = ErrorResponse {
		error: "Failed to proxy request".to_string(),
		details: Some(details.into()),
	};
	json_response(StatusCode::INTERNAL_SERVER_ERROR, error_body(&body), methods)
}

/// Upstream status and body, verbatim.
pub fn proxy_response(outcome: ProxyOutcome, methods: &'static str) -> Response {
	let status = StatusCode::from_u16(outcome.status).unwrap_or(StatusCode::BAD_GATEWAY);
	json_response(status, outcome.body, methods)
}
