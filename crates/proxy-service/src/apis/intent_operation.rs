//! Intent operation status lookups.
//!
//! A GET carries no chain IDs, so both deployments are tried, production
//! first. Only a 404 moves on to the next one and there is no wait between
//! the two.

use super::{admit, forward, Forward, RouteSettings};
use crate::state::AppState;
use axum::{
	extract::{
		rejection::{PathRejection, QueryRejection},
		Path, Query, State,
	},
	http::Method,
	response::Response,
};
use proxy_core::{BackoffMode, RetryPolicy};
use proxy_types::HttpMethod;

pub const ROUTE: RouteSettings = RouteSettings {
	name: "intent-operation",
	verb: HttpMethod::Get,
	allowed: "GET, OPTIONS",
	policy: RetryPolicy::NotFoundOnly,
	backoff: BackoffMode::Immediate,
	max_retries: Some(0),
};

/// `GET /intent-operation/{id}`
pub async fn get_intent_operation(
	State(state): State<AppState>,
	method: Method,
	id: Result<Path<String>, PathRejection>,
) -> Response {
	let api_key = match admit(&ROUTE, &state, &method) {
		Ok(key) => key,
		Err(response) => return response,
	};

	let Path(id) = match id {
		Ok(id) => id,
		Err(rejection) => return ROUTE.rejected(rejection.status(), &rejection.body_text()),
	};

	lookup(&state, api_key, &id, "Missing id path parameter").await
}

/// `GET /intent-operation-status?id=<id>`
pub async fn get_intent_operation_status(
	State(state): State<AppState>,
	method: Method,
	query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Response {
	let api_key = match admit(&ROUTE, &state, &method) {
		Ok(key) => key,
		Err(response) => return response,
	};

	let Query(query) = match query {
		Ok(query) => query,
		Err(rejection) => return ROUTE.rejected(rejection.status(), &rejection.body_text()),
	};

	let id = query
		.iter()
		.find(|(key, _)| key == "id")
		.map(|(_, value)| value.as_str())
		.unwrap_or_default();

	lookup(&state, api_key, id, "Missing intentId parameter").await
}

async fn lookup(state: &AppState, api_key: String, id: &str, missing: &str) -> Response {
	let id = match ROUTE.path_value(id, missing) {
		Ok(id) => id,
		Err(response) => return response,
	};

	let request = Forward {
		segments: vec!["intent-operation", id],
		chain_ids: Vec::new(),
		query: &[],
		body: None,
	};

	forward(&ROUTE, state, api_key, request).await
}
