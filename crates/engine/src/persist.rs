//! Debounced preference persistence.
//!
//! Preference snapshots follow the same cancel-then-restart discipline as
//! the fetch coordinator: scheduling a write for a key cancels the pending
//! write for that key, so bursts of preference churn collapse into a single
//! store per quiet window. The storage itself is behind [`PreferenceSink`];
//! its format is not this crate's concern.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

/// Destination for serialized preference snapshots.
pub trait PreferenceSink: Send + Sync {
	/// Stores `value` under `key`, replacing any previous value.
	fn write(&self, key: &str, value: &str);
}

/// Debounced writer of serialized preferences.
pub struct PreferenceWriter {
	sink: Arc<dyn PreferenceSink>,
	pending: Mutex<HashMap<&'static str, CancellationToken>>,
	delay: Duration,
}

impl PreferenceWriter {
	/// Creates a writer flushing to `sink` after `delay` of quiet.
	pub fn new(sink: Arc<dyn PreferenceSink>, delay: Duration) -> Self {
		Self {
			sink,
			pending: Mutex::new(HashMap::new()),
			delay,
		}
	}

	/// Schedules a write of the current `prefs` snapshot under `key`.
	///
	/// The snapshot is serialized immediately; later mutations of the source
	/// value do not affect an already scheduled write. A pending write for
	/// the same key is cancelled and replaced. Serialization failures are
	/// logged and dropped.
	///
	/// Must be called from within a tokio runtime.
	pub fn schedule<P: Serialize>(&self, key: &'static str, prefs: &P) {
		let value = match serde_json::to_string(prefs) {
			Ok(value) => value,
			Err(error) => {
				tracing::warn!(key, error = %error, "failed to serialize preferences");
				return;
			}
		};

		let cancel = CancellationToken::new();
		if let Some(prev) = self.pending.lock().insert(key, cancel.clone()) {
			prev.cancel();
		}

		let sink = Arc::clone(&self.sink);
		let delay = self.delay;
		tokio::spawn(async move {
			tokio::select! {
				() = cancel.cancelled() => {}
				() = tokio::time::sleep(delay) => {
					sink.write(key, &value);
					tracing::trace!(key, "preferences stored");
				}
			}
		});
	}
}
