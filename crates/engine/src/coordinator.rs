//! Debounce/cancellation coordinator.
//!
//! `observe` is invoked synchronously on every input change. It immediately
//! cancels the current pending fetch task and starts a new one bound to the
//! freshly observed signature. The new task waits out the quiet period
//! before doing any backend work; the wait happens inside the task itself
//! rather than as a delayed re-invocation, so the next `observe` call can
//! cancel it instantly with no residual timer to clear.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

use crate::config::EngineConfig;
use crate::executor::{FetchOutcome, QueryExecutor};
use crate::signature::QuerySignature;
use crate::token::GenerationClock;

struct PendingTask {
	cancel: CancellationToken,
	generation: u64,
}

struct CoordinatorInner {
	executor: QueryExecutor,
	slot: Mutex<Option<PendingTask>>,
	generations: GenerationClock,
	quiet_period: Duration,
}

/// Owns the single pending fetch task and the cancel-then-restart cycle.
///
/// The task slot is private; the only way to interact with it is `observe`,
/// so no other component can race-replace the pending task. Handles are
/// cheap clones sharing one slot.
#[derive(Clone)]
pub struct FetchCoordinator {
	inner: Arc<CoordinatorInner>,
}

impl FetchCoordinator {
	/// Creates a coordinator dispatching to `executor`.
	pub fn new(executor: QueryExecutor, config: EngineConfig) -> Self {
		Self {
			inner: Arc::new(CoordinatorInner {
				executor,
				slot: Mutex::new(None),
				generations: GenerationClock::default(),
				quiet_period: config.quiet_period,
			}),
		}
	}

	/// Reacts to a newly observed composite signature.
	///
	/// Synchronous and total: cancels the current pending task (whether it is
	/// still in its quiet period or mid-execution) and schedules a new one
	/// for the frozen `signature` snapshot. Executor failures never surface
	/// here; they are logged with the signature that produced them.
	///
	/// Must be called from within a tokio runtime.
	pub fn observe(&self, signature: QuerySignature) {
		let generation = self.inner.generations.next();
		let cancel = CancellationToken::new();
		{
			let mut slot = self.inner.slot.lock();
			if let Some(prev) = slot.replace(PendingTask {
				cancel: cancel.clone(),
				generation,
			}) {
				prev.cancel.cancel();
				tracing::trace!(superseded = prev.generation, by = generation, "pending fetch replaced");
			}
		}

		let inner = Arc::clone(&self.inner);
		tokio::spawn(async move {
			inner.run(signature, cancel, generation).await;
		});
	}

	/// Cancels the pending fetch task, if any, without starting a new one.
	///
	/// Used on shutdown; a later `observe` starts a fresh cycle as usual.
	pub fn cancel_pending(&self) {
		if let Some(task) = self.inner.slot.lock().take() {
			task.cancel.cancel();
			tracing::trace!(generation = task.generation, "pending fetch cancelled");
		}
	}
}

impl CoordinatorInner {
	async fn run(&self, signature: QuerySignature, cancel: CancellationToken, generation: u64) {
		tokio::select! {
			() = cancel.cancelled() => {
				tracing::debug!(generation, ?signature, "fetch cancelled during quiet period");
				return;
			}
			() = tokio::time::sleep(self.quiet_period) => {}
		}
		if cancel.is_cancelled() {
			tracing::debug!(generation, ?signature, "fetch cancelled before dispatch");
			return;
		}

		match self.executor.execute(&signature, &cancel).await {
			Ok(FetchOutcome::Committed { visible }) => {
				tracing::trace!(generation, visible, "fetch committed");
			}
			Ok(FetchOutcome::Superseded) => {
				tracing::debug!(generation, ?signature, "stale fetch discarded");
			}
			Err(error) => {
				// Deliberately swallowed: a stale or failed fetch must never
				// surface as an application-level error.
				tracing::debug!(generation, ?signature, error = %error, "fetch failed");
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use lumen_core::{FileId, FileList, ResolvedCondition, TagId};
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::testutil::{BackendCall, RecordingBackend, tagged};

	fn coordinator(backend: RecordingBackend) -> (FetchCoordinator, Arc<FileList>) {
		let files = Arc::new(FileList::new());
		let executor = QueryExecutor::new(Arc::new(backend), Arc::clone(&files));
		(FetchCoordinator::new(executor, EngineConfig::default()), files)
	}

	fn tag_query(id: u64) -> QuerySignature {
		QuerySignature {
			conditions: vec![ResolvedCondition::TagsInclude {
				tag_ids: vec![TagId(id)],
			}],
			..QuerySignature::default()
		}
	}

	async fn settle(duration: Duration) {
		// Under `start_paused`, sleeping auto-advances the clock through
		// intermediate timers (unlike `advance`, which skips timers that are
		// registered mid-advance, e.g. a backend delay behind a quiet period).
		tokio::time::sleep(duration).await;
		tokio::task::yield_now().await;
	}

	#[tokio::test(flavor = "current_thread", start_paused = true)]
	async fn rapid_changes_collapse_to_last_signature() {
		let backend = RecordingBackend::with_files(vec![tagged(1, &[1]), tagged(2, &[2])]);
		let calls = backend.calls();
		let (coordinator, _files) = coordinator(backend);

		coordinator.observe(QuerySignature::default());
		settle(Duration::from_millis(50)).await;
		coordinator.observe(tag_query(1));
		settle(Duration::from_millis(250)).await;

		// Exactly one backend call, for the tag-filtered query.
		assert_eq!(
			*calls.lock(),
			vec![BackendCall::Query {
				conditions: 1,
				match_any: false,
				order: Default::default(),
			}]
		);
	}

	#[tokio::test(flavor = "current_thread", start_paused = true)]
	async fn quiet_period_is_measured_from_the_last_change() {
		let backend = RecordingBackend::with_files(vec![tagged(1, &[1])]);
		let calls = backend.calls();
		let (coordinator, _files) = coordinator(backend);

		coordinator.observe(QuerySignature::default());
		settle(Duration::from_millis(150)).await;
		coordinator.observe(tag_query(1));
		// 150 ms after the second observe: still inside its quiet period.
		settle(Duration::from_millis(150)).await;
		assert!(calls.lock().is_empty());

		settle(Duration::from_millis(100)).await;
		assert_eq!(calls.lock().len(), 1);
	}

	#[tokio::test(flavor = "current_thread", start_paused = true)]
	async fn supersession_mid_fetch_never_commits_stale_result() {
		let backend = RecordingBackend::with_files(vec![tagged(1, &[1]), tagged(2, &[2])]).with_delay(Duration::from_millis(100));
		let calls = backend.calls();
		let (coordinator, files) = coordinator(backend);

		coordinator.observe(tag_query(1));
		// Quiet period elapses; the first fetch is now in its backend call.
		settle(Duration::from_millis(210)).await;
		coordinator.observe(tag_query(2));
		// First round-trip completes (cancelled, result discarded), then the
		// second task waits out its own quiet period and commits.
		settle(Duration::from_millis(400)).await;

		assert_eq!(calls.lock().len(), 2);
		let snapshot = files.snapshot();
		assert_eq!(snapshot.len(), 1);
		assert_eq!(snapshot[0].id, FileId(2));
	}

	#[tokio::test(flavor = "current_thread", start_paused = true)]
	async fn backend_failure_is_swallowed_and_list_untouched() {
		let backend = RecordingBackend::failing("store offline");
		let calls = backend.calls();
		let (coordinator, files) = coordinator(backend);
		files.replace(vec![tagged(9, &[])]);

		coordinator.observe(QuerySignature::default());
		settle(Duration::from_millis(250)).await;

		assert_eq!(calls.lock().len(), 1);
		// Last-good state preserved.
		assert_eq!(files.get_index(FileId(9)), Some(0));
	}

	#[tokio::test(flavor = "current_thread", start_paused = true)]
	async fn cancel_pending_stops_the_quiet_period() {
		let backend = RecordingBackend::with_files(vec![tagged(1, &[])]);
		let calls = backend.calls();
		let (coordinator, _files) = coordinator(backend);

		coordinator.observe(QuerySignature::default());
		settle(Duration::from_millis(50)).await;
		coordinator.cancel_pending();
		settle(Duration::from_millis(300)).await;

		assert!(calls.lock().is_empty());
	}

	#[tokio::test(flavor = "current_thread", start_paused = true)]
	async fn identical_signatures_still_restart_the_cycle() {
		let backend = RecordingBackend::with_files(vec![tagged(1, &[])]);
		let calls = backend.calls();
		let (coordinator, _files) = coordinator(backend);

		coordinator.observe(QuerySignature::default());
		settle(Duration::from_millis(250)).await;
		coordinator.observe(QuerySignature::default());
		settle(Duration::from_millis(250)).await;

		// The coordinator never inspects history; deduplication is the
		// caller's concern (a reaction only fires on actual change).
		assert_eq!(calls.lock().len(), 2);
	}
}
