//! `POST /intent-operations`

use super::{admit, forward, Forward, RouteSettings};
use crate::state::AppState;
use axum::{
	extract::{rejection::BytesRejection, State},
	http::Method,
	response::Response,
};
use bytes::Bytes;
use proxy_core::{extract, policy::GATEWAY_ERRORS, BackoffMode, RetryPolicy};
use proxy_types::HttpMethod;

pub const ROUTE: RouteSettings = RouteSettings {
	name: "intent-operations",
	verb: HttpMethod::Post,
	allowed: "POST, OPTIONS",
	policy: RetryPolicy::SpecificServerErrors(GATEWAY_ERRORS),
	backoff: BackoffMode::Exponential,
	max_retries: None,
};

/// Submits a signed intent operation. The environment comes from the chain
/// IDs of its elements and the body is forwarded as received.
pub async fn post_intent_operations(
	State(state): State<AppState>,
	method: Method,
	body: Result<Bytes, BytesRejection>,
) -> Response {
	let api_key = match admit(&ROUTE, &state, &method) {
		Ok(key) => key,
		Err(response) => return response,
	};

	let body = match body {
		Ok(body) => body,
		Err(rejection) => return ROUTE.rejected(rejection.status(), &rejection.body_text()),
	};
	let (json, text) = match ROUTE.json_body(&body) {
		Ok(parsed) => parsed,
		Err(response) => return response,
	};

	let request = Forward {
		segments: vec!["intent-operations"],
		chain_ids: extract::from_signed_intent_op(&json),
		query: &[],
		body: Some(text),
	};

	forward(&ROUTE, &state, api_key, request).await
}
