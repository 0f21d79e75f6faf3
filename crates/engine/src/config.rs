//! Engine tuning knobs.

use std::time::Duration;

/// Configuration for the fetch coordinator.
#[derive(Debug, Clone)]
pub struct EngineConfig {
	/// Delay between observing a new signature and dispatching its fetch.
	///
	/// Rapid successive changes within this window collapse into a single
	/// dispatch for the last signature observed.
	pub quiet_period: Duration,
}

impl Default for EngineConfig {
	fn default() -> Self {
		Self {
			quiet_period: Duration::from_millis(200),
		}
	}
}
