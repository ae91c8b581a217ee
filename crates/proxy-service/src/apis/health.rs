//! Liveness check.

use crate::state::AppState;
use axum::{extract::State, response::Json};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
	pub status: &'static str,
	pub api_key_configured: bool,
}

/// Always 200 while the process is serving.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
	Json(HealthResponse {
		status: "ok",
		api_key_configured: state.api_key().is_some(),
	})
}
