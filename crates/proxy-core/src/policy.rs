//! Per-route retry decisions.

/// Upstream statuses that route submissions retry on.
pub const GATEWAY_ERRORS: &[u16] = &[500, 502, 503];

/// Decides whether an upstream HTTP response should be retried.
///
/// Transport failures are always retried; this only looks at responses that
/// actually arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryPolicy {
	/// Every response is final.
	Never,
	/// Any 5xx, when there is another endpoint to fall back to.
	ServerErrorOnly,
	/// 404 only, to try the other deployment.
	NotFoundOnly,
	/// The listed statuses, when there is another endpoint to fall back to.
	SpecificServerErrors(&'static [u16]),
}

impl RetryPolicy {
	pub fn should_retry(&self, status: u16, endpoint_count: usize) -> bool {
		match self {
			RetryPolicy::Never => false,
			RetryPolicy::ServerErrorOnly => endpoint_count > 1 && (500..600).contains(&status),
			RetryPolicy::NotFoundOnly => status == 404,
			RetryPolicy::SpecificServerErrors(codes) => {
				endpoint_count > 1 && codes.contains(&status)
			}
		}
	}
}

/// Wait applied between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackoffMode {
	/// Exponential backoff with jitter, capped.
	Exponential,
	/// Move on to the next attempt without waiting.
	Immediate,
}
