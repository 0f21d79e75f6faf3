//! Bounded retry for fallible async operations.

use std::future::Future;
use std::time::Duration;

/// Runs `op` up to `attempts` times, sleeping `interval` between attempts.
///
/// Returns the first success, or the last error once the attempt budget is
/// exhausted. Intended for startup races such as connecting to a socket the
/// peer has not bound yet, not as a general availability mechanism.
///
/// # Panics
///
/// Panics if `attempts` is zero.
pub async fn retry_with_interval<T, E, F, Fut>(attempts: usize, interval: Duration, mut op: F) -> Result<T, E>
where
	F: FnMut() -> Fut,
	Fut: Future<Output = Result<T, E>>,
	E: std::fmt::Display,
{
	assert!(attempts > 0, "retry budget must be > 0");
	let mut remaining = attempts;
	loop {
		match op().await {
			Ok(value) => return Ok(value),
			Err(err) => {
				remaining -= 1;
				if remaining == 0 {
					return Err(err);
				}
				tracing::debug!(error = %err, remaining, "retrying after failed attempt");
				tokio::time::sleep(interval).await;
			}
		}
	}
}
