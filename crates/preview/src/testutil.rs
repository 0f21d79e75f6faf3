//! Shared test doubles for preview tests.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use lumen_core::{Backend, FetchError, FileId, FileOrder, FileRecord, LocationId, LocationIndex, ResolvedCondition, TagId};
use lumen_proto::{PreviewSnapshot, ViewMethod};
use parking_lot::Mutex;

/// Builds a snapshot with default thumbnail directory and slide view.
pub fn snapshot(ids: &[u64], active: Option<u64>) -> PreviewSnapshot {
	PreviewSnapshot {
		ids: ids.iter().map(|id| FileId(*id)).collect(),
		thumbnail_directory: PathBuf::from("/tmp/thumbs"),
		view_method: ViewMethod::Slide,
		active_item_id: active.map(FileId),
	}
}

fn record(id: u64) -> FileRecord {
	FileRecord {
		id: FileId(id),
		location_id: LocationId(id % 3 + 1),
		absolute_path: PathBuf::from(format!("/library/{id}.jpg")),
		tags: BTreeSet::<TagId>::new(),
	}
}

/// In-memory backend serving fetch-by-ids; other modes are unreachable from
/// the preview pipeline.
pub struct MockBackend {
	files: Vec<FileRecord>,
	calls: Arc<Mutex<Vec<Vec<FileId>>>>,
	delay: Option<Duration>,
	fail: Option<String>,
}

impl MockBackend {
	pub fn with_ids(ids: &[u64]) -> Self {
		Self {
			files: ids.iter().map(|id| record(*id)).collect(),
			calls: Arc::new(Mutex::new(Vec::new())),
			delay: None,
			fail: None,
		}
	}

	pub fn failing(message: &str) -> Self {
		let mut backend = Self::with_ids(&[]);
		backend.fail = Some(message.to_string());
		backend
	}

	pub fn with_delay(mut self, delay: Duration) -> Self {
		self.delay = Some(delay);
		self
	}

	/// Observed id lists, one per `fetch_by_ids` call.
	pub fn calls(&self) -> Arc<Mutex<Vec<Vec<FileId>>>> {
		Arc::clone(&self.calls)
	}
}

#[async_trait]
impl Backend for MockBackend {
	async fn fetch_all(&self, _order: FileOrder) -> Result<Vec<FileRecord>, FetchError> {
		unreachable!("preview pipeline never fetches all files")
	}

	async fn fetch_by_query(
		&self,
		_conditions: &[ResolvedCondition],
		_match_any: bool,
		_order: FileOrder,
	) -> Result<Vec<FileRecord>, FetchError> {
		unreachable!("preview pipeline never runs conditional queries")
	}

	async fn fetch_missing(&self, _order: FileOrder) -> Result<Vec<FileRecord>, FetchError> {
		unreachable!("preview pipeline never fetches missing files")
	}

	async fn fetch_by_ids(&self, ids: &[FileId]) -> Result<Vec<FileRecord>, FetchError> {
		self.calls.lock().push(ids.to_vec());
		if let Some(delay) = self.delay {
			tokio::time::sleep(delay).await;
		}
		if let Some(message) = &self.fail {
			return Err(FetchError::Unavailable(message.clone()));
		}
		Ok(ids
			.iter()
			.filter_map(|id| self.files.iter().find(|f| f.id == *id).cloned())
			.collect())
	}
}

/// Location index double with a configurable known set.
pub struct MockLocations {
	known_all: bool,
	known: BTreeSet<LocationId>,
	init_calls: Arc<AtomicUsize>,
}

impl MockLocations {
	/// Index that recognizes every location.
	pub fn all_known() -> Self {
		Self {
			known_all: true,
			known: BTreeSet::new(),
			init_calls: Arc::new(AtomicUsize::new(0)),
		}
	}

	/// Index that recognizes only the given locations.
	pub fn knowing(ids: &[u64]) -> Self {
		Self {
			known_all: false,
			known: ids.iter().map(|id| LocationId(*id)).collect(),
			init_calls: Arc::new(AtomicUsize::new(0)),
		}
	}

	pub fn init_calls(&self) -> Arc<AtomicUsize> {
		Arc::clone(&self.init_calls)
	}
}

#[async_trait]
impl LocationIndex for MockLocations {
	async fn init(&self) -> Result<(), FetchError> {
		self.init_calls.fetch_add(1, Ordering::SeqCst);
		Ok(())
	}

	fn contains(&self, location: LocationId) -> bool {
		self.known_all || self.known.contains(&location)
	}
}
