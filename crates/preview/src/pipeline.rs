//! The preview fetch pipeline state machine.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use lumen_core::{Backend, FileList, LocationIndex};
use lumen_proto::{FramePayload, PreviewSnapshot, SyncSender, ViewMethod};
use parking_lot::Mutex;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

/// One-shot future resolved when the first fetch cycle completes.
pub type ReadinessSignal = oneshot::Receiver<()>;

/// Pipeline lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
	/// No snapshot received yet, or the last cycle failed.
	Idle,
	/// A fetch cycle is in flight.
	Fetching,
	/// The last cycle completed; content is presentable.
	Ready,
	/// The channel closed; terminal.
	Closed,
}

/// Presentation settings applied from the latest snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSettings {
	/// Directory the thumbnails live in.
	pub thumbnail_directory: std::path::PathBuf,
	/// Layout to present the items in.
	pub view_method: ViewMethod,
}

struct PipelineInner {
	backend: Arc<dyn Backend>,
	locations: Arc<dyn LocationIndex>,
	files: Arc<FileList>,
	slot: Mutex<Option<CancellationToken>>,
	state: Mutex<PipelineState>,
	view: Mutex<Option<ViewSettings>>,
	active_index: AtomicUsize,
	readiness: Mutex<Option<oneshot::Sender<()>>>,
	sequence: AtomicU64,
	acks: Mutex<Option<SyncSender>>,
}

/// Debounce-free mirror of the primary's fetch coordination: each received
/// snapshot cancels the in-progress cycle and starts a fresh one.
///
/// There is no quiet period here; the supersession trigger is message
/// arrival itself, mirroring the primary's cancel-then-restart discipline
/// across the process boundary instead of within one.
#[derive(Clone)]
pub struct PreviewPipeline {
	inner: Arc<PipelineInner>,
}

impl PreviewPipeline {
	/// Creates a pipeline writing into `files`.
	///
	/// Returns the readiness signal alongside; it resolves exactly once, on
	/// the completion of the first successful cycle.
	pub fn new(
		backend: Arc<dyn Backend>,
		locations: Arc<dyn LocationIndex>,
		files: Arc<FileList>,
	) -> (Self, ReadinessSignal) {
		let (ready_tx, ready_rx) = oneshot::channel();
		let pipeline = Self {
			inner: Arc::new(PipelineInner {
				backend,
				locations,
				files,
				slot: Mutex::new(None),
				state: Mutex::new(PipelineState::Idle),
				view: Mutex::new(None),
				active_index: AtomicUsize::new(0),
				readiness: Mutex::new(Some(ready_tx)),
				sequence: AtomicU64::new(0),
				acks: Mutex::new(None),
			}),
		};
		(pipeline, ready_rx)
	}

	/// Attaches the channel sender used for `Ready` acknowledgement frames.
	pub fn attach_acks(&self, sender: SyncSender) {
		*self.inner.acks.lock() = Some(sender);
	}

	/// Handles a newly received snapshot.
	///
	/// Cancels the in-progress cycle (if any), applies the presentation
	/// settings synchronously, and starts fetching the snapshot's ids.
	/// Ignored after the pipeline has closed.
	///
	/// Must be called from within a tokio runtime.
	pub fn receive(&self, snapshot: PreviewSnapshot) {
		{
			let mut state = self.inner.state.lock();
			if *state == PipelineState::Closed {
				tracing::debug!("snapshot received after close, ignoring");
				return;
			}
			*state = PipelineState::Fetching;
		}

		let cancel = CancellationToken::new();
		if let Some(prev) = self.inner.slot.lock().replace(cancel.clone()) {
			prev.cancel();
		}

		*self.inner.view.lock() = Some(ViewSettings {
			thumbnail_directory: snapshot.thumbnail_directory.clone(),
			view_method: snapshot.view_method,
		});

		let inner = Arc::clone(&self.inner);
		tokio::spawn(async move {
			inner.run_cycle(snapshot, cancel).await;
		});
	}

	/// Terminates the pipeline: cancels the in-flight cycle and clears the
	/// file list. Later snapshots are ignored.
	pub fn close(&self) {
		*self.inner.state.lock() = PipelineState::Closed;
		if let Some(task) = self.inner.slot.lock().take() {
			task.cancel();
		}
		// Dropping an unresolved readiness sender wakes a bootstrap that is
		// still waiting, so it can fail instead of hanging.
		self.inner.readiness.lock().take();
		self.inner.files.clear();
		tracing::info!("preview pipeline closed");
	}

	/// Current lifecycle state.
	pub fn state(&self) -> PipelineState {
		*self.inner.state.lock()
	}

	/// Index of the item to focus, resolved from the latest completed cycle.
	pub fn active_index(&self) -> usize {
		self.inner.active_index.load(Ordering::Acquire)
	}

	/// Presentation settings from the latest snapshot, if any was received.
	pub fn view_settings(&self) -> Option<ViewSettings> {
		self.inner.view.lock().clone()
	}
}

impl PipelineInner {
	async fn run_cycle(self: Arc<Self>, snapshot: PreviewSnapshot, cancel: CancellationToken) {
		let fetched = match self.backend.fetch_by_ids(&snapshot.ids).await {
			Ok(fetched) => fetched,
			Err(error) => {
				// A superseded cycle owns no state transition; the failure
				// belongs to a fetch that no longer matters.
				if cancel.is_cancelled() {
					tracing::debug!("preview cycle superseded during fetch");
					return;
				}
				tracing::warn!(error = %error, ids = snapshot.ids.len(), "preview fetch failed");
				let mut state = self.state.lock();
				if *state == PipelineState::Fetching {
					*state = PipelineState::Idle;
				}
				return;
			}
		};
		if cancel.is_cancelled() {
			tracing::debug!("preview cycle superseded before commit");
			return;
		}
		self.files.replace(fetched);

		// A file may reference a location added in the primary window after
		// this process started; re-initialize the index then. Best-effort
		// consistency repair, absence of the location is not an error.
		let unknown_location = self.files.snapshot().iter().any(|f| !self.locations.contains(f.location_id));
		if unknown_location {
			if let Err(error) = self.locations.init().await {
				tracing::warn!(error = %error, "location re-initialization failed");
			}
			if cancel.is_cancelled() {
				return;
			}
		}

		let active = snapshot
			.active_item_id
			.and_then(|id| self.files.get_index(id))
			.unwrap_or(0);
		self.active_index.store(active, Ordering::Release);
		*self.state.lock() = PipelineState::Ready;

		if let Some(ready) = self.readiness.lock().take() {
			// The receiver may have gone away; that is not our problem.
			let _ = ready.send(());
		}

		let sequence = self.sequence.fetch_add(1, Ordering::AcqRel) + 1;
		let ack = self.acks.lock().clone();
		if let Some(sender) = ack {
			tokio::spawn(async move {
				if let Err(error) = sender.send(FramePayload::Ready { sequence }).await {
					tracing::debug!(error = %error, sequence, "failed to acknowledge cycle");
				}
			});
		}
		tracing::trace!(sequence, active, "preview cycle complete");
	}
}
