//! HTTP server for the orchestrator proxy.

use crate::apis::{health, intent_operation, intent_operations, intents_route, portfolio};
use crate::response::{self, DEFAULT_METHODS};
use crate::state::AppState;
use anyhow::Context;
use axum::{
	extract::DefaultBodyLimit,
	http::StatusCode,
	response::Response,
	routing::{any, get},
	Router,
};
use std::any::Any;
use std::future::Future;
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use tracing::{error, info, instrument};

/// Builds the full router: proxy routes under the configured base path,
/// `/health` at the root and a JSON 404 for everything else.
pub fn router(state: AppState) -> Router {
	let server = &state.config.server;
	let base_path = server.base_path.clone();
	let max_body_bytes = server.max_body_bytes;

	// `any` so that OPTIONS and wrong verbs reach the handlers
	let proxy_routes = Router::new()
		.route("/accounts/{address}/portfolio", any(portfolio::get_portfolio))
		.route(
			"/intent-operation/{id}",
			any(intent_operation::get_intent_operation),
		)
		.route(
			"/intent-operation-status",
			any(intent_operation::get_intent_operation_status),
		)
		.route(
			"/intent-operations",
			any(intent_operations::post_intent_operations),
		)
		.route("/intents/route", any(intents_route::post_intent_route));

	let routes = if base_path == "/" {
		proxy_routes
	} else {
		Router::new().nest(&base_path, proxy_routes)
	};

	routes
		.route("/health", get(health::health_check))
		.fallback(not_found)
		.layer(DefaultBodyLimit::max(max_body_bytes))
		.layer(
			ServiceBuilder::new()
				.layer(TraceLayer::new_for_http())
				.layer(CatchPanicLayer::custom(handle_panic)),
		)
		.with_state(state)
}

async fn not_found() -> Response {
	response::error_response(StatusCode::NOT_FOUND, "Not found", DEFAULT_METHODS)
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
	let details = if let Some(s) = err.downcast_ref::<String>() {
		s.clone()
	} else if let Some(s) = err.downcast_ref::<&str>() {
		s.to_string()
	} else {
		"Unknown panic".to_string()
	};

	error!("Handler panicked: {}", details);
	response::proxy_failure(details, DEFAULT_METHODS)
}

/// Serves the proxy until `shutdown` resolves.
pub struct ApiServer {
	state: AppState,
}

impl ApiServer {
	pub fn new(state: AppState) -> Self {
		Self { state }
	}

	#[instrument(skip_all)]
	pub async fn run<F>(self, shutdown: F) -> anyhow::Result<()>
	where
		F: Future<Output = ()> + Send + 'static,
	{
		let addr = format!(
			"{}:{}",
			self.state.config.server.host, self.state.config.server.port
		);
		let listener = tokio::net::TcpListener::bind(&addr)
			.await
			.with_context(|| format!("Failed to bind {}", addr))?;

		info!(
			"Orchestrator proxy listening on {} (base path {})",
			addr, self.state.config.server.base_path
		);

		axum::serve(listener, router(self.state))
			.with_graceful_shutdown(shutdown)
			.await
			.context("HTTP server error")?;

		Ok(())
	}
}
