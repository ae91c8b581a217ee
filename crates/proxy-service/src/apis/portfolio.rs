//! `GET /accounts/{address}/portfolio`

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
use proxy_core::{extract, BackoffMode, RetryPolicy};
use proxy_types::HttpMethod;

pub const ROUTE: RouteSettings = RouteSettings {
	name: "portfolio",
	verb: HttpMethod::Get,
	allowed: "GET, OPTIONS",
	policy: RetryPolicy::ServerErrorOnly,
	backoff: BackoffMode::Exponential,
	max_retries: None,
};

/// Environment comes from `chainIds` and `tokens`; the whole query string is
/// forwarded.
///
/// A blank address (`%20`) is a 400 "Missing address parameter". So is an
/// empty segment, whenever the router hands one to this handler instead of
/// the 404 fallback.
pub async fn get_portfolio(
	State(state): State<AppState>,
	method: Method,
	address: Result<Path<String>, PathRejection>,
	query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Response {
	let api_key = match admit(&ROUTE, &state, &method) {
		Ok(key) => key,
		Err(response) => return response,
	};

	let Path(address) = match address {
		Ok(address) => address,
		Err(rejection) => return ROUTE.rejected(rejection.status(), &rejection.body_text()),
	};
	let Query(query) = match query {
		Ok(query) => query,
		Err(rejection) => return ROUTE.rejected(rejection.status(), &rejection.body_text()),
	};

	let address = match ROUTE.path_value(&address, "Missing address parameter") {
		Ok(address) => address,
		Err(response) => return response,
	};

	let request = Forward {
		segments: vec!["accounts", address, "portfolio"],
		chain_ids: extract::from_portfolio_query(&query),
		query: &query,
		body: None,
	};

	forward(&ROUTE, &state, api_key, request).await
}
