//! Values produced while proxying a single inbound request.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Methods the proxy forwards upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
	Get,
	Post,
}

impl HttpMethod {
	/// GET may be repeated against the same endpoint; POST only moves on to
	/// the next endpoint.
	pub fn is_idempotent(&self) -> bool {
		matches!(self, HttpMethod::Get)
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			HttpMethod::Get => "GET",
			HttpMethod::Post => "POST",
		}
	}
}

impl fmt::Display for HttpMethod {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Result of one upstream call that produced an HTTP response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchTiming {
	/// Milliseconds until the response head arrived, two decimals.
	pub ttfb_ms: f64,
	/// Milliseconds until the body was fully read, two decimals.
	pub total_ms: f64,
	pub status: u16,
	pub body: String,
}

/// Final upstream status and body handed back to the caller.
///
/// Response headers are attached by the HTTP boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyOutcome {
	pub status: u16,
	pub body: String,
}

impl From<FetchTiming> for ProxyOutcome {
	fn from(result: FetchTiming) -> Self {
		Self {
			status: result.status,
			body: result.body,
		}
	}
}

/// Rounds a millisecond measurement to two decimal places.
pub fn round_ms(ms: f64) -> f64 {
	(ms * 100.0).round() / 100.0
}
