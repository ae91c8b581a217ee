//! Delay schedule between upstream attempts.

use crate::policy::BackoffMode;
use backoff::backoff::Backoff;
use proxy_config::RetryConfig;
use rand::Rng;
use std::time::Duration;

/// Exponential backoff with additive jitter.
///
/// The n-th call to `next_backoff` since the last reset yields
/// `min(base * 2^n + rand(0..=jitter), max)`. The schedule never runs out;
/// the executor bounds the number of attempts.
#[derive(Debug, Clone)]
pub struct JitteredBackoff {
	base: Duration,
	jitter: Duration,
	max: Duration,
	retry: u32,
}

impl JitteredBackoff {
	pub fn new(base: Duration, jitter: Duration, max: Duration) -> Self {
		Self {
			base,
			jitter,
			max,
			retry: 0,
		}
	}

	pub fn from_config(config: &RetryConfig, mode: BackoffMode) -> Self {
		match mode {
			BackoffMode::Exponential => Self::new(
				Duration::from_millis(config.base_delay_ms),
				Duration::from_millis(config.jitter_ms),
				Duration::from_millis(config.max_delay_ms),
			),
			BackoffMode::Immediate => Self::immediate(),
		}
	}

	/// A schedule that never waits.
	pub fn immediate() -> Self {
		Self::new(Duration::ZERO, Duration::ZERO, Duration::ZERO)
	}

	fn delay_for(&self, retry: u32) -> Duration {
		let exponential = self.base.saturating_mul(2u32.saturating_pow(retry));
		let jitter_ms = self.jitter.as_millis() as u64;
		let jitter = if jitter_ms == 0 {
			Duration::ZERO
		} else {
			Duration::from_millis(rand::thread_rng().gen_range(0..=jitter_ms))
		};

		exponential.saturating_add(jitter).min(self.max)
	}
}

impl Backoff for JitteredBackoff {
	fn next_backoff(&mut self) -> Option<Duration> {
		let delay = self.delay_for(self.retry);
		self.retry = self.retry.saturating_add(1);
		Some(delay)
	}

	fn reset(&mut self) {
		self.retry = 0;
	}
}
