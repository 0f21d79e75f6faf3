//! Shared test doubles for engine tests.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use lumen_core::{Backend, FetchError, FileId, FileOrder, FileRecord, LocationId, ResolvedCondition, TagId};
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

/// Builds a record with the given id and tags.
pub fn tagged(id: u64, tags: &[u64]) -> FileRecord {
	FileRecord {
		id: FileId(id),
		location_id: LocationId(1),
		absolute_path: PathBuf::from(format!("/library/{id}.jpg")),
		tags: tags.iter().map(|t| TagId(*t)).collect(),
	}
}

/// One observed backend call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
	All,
	Missing,
	Query {
		conditions: usize,
		match_any: bool,
		order: FileOrder,
	},
}

/// In-memory backend that records calls and actually evaluates queries.
pub struct RecordingBackend {
	files: Vec<FileRecord>,
	missing: Vec<FileRecord>,
	calls: Arc<Mutex<Vec<BackendCall>>>,
	delay: Option<Duration>,
	fail: Option<String>,
	cancel_on_fetch: Option<CancellationToken>,
}

impl RecordingBackend {
	pub fn with_files(files: Vec<FileRecord>) -> Self {
		Self {
			files,
			missing: Vec::new(),
			calls: Arc::new(Mutex::new(Vec::new())),
			delay: None,
			fail: None,
			cancel_on_fetch: None,
		}
	}

	/// Seeds the set returned by `fetch_missing`.
	pub fn with_missing(mut self, missing: Vec<FileRecord>) -> Self {
		self.missing = missing;
		self
	}

	/// Backend whose every call fails with [`FetchError::Unavailable`].
	pub fn failing(message: &str) -> Self {
		let mut backend = Self::with_files(Vec::new());
		backend.fail = Some(message.to_string());
		backend
	}

	/// Makes every round-trip take `delay` of (virtual) time.
	pub fn with_delay(mut self, delay: Duration) -> Self {
		self.delay = Some(delay);
		self
	}

	/// Cancels `token` while a fetch is in flight, simulating supersession
	/// mid round-trip.
	pub fn cancel_on_fetch(mut self, token: CancellationToken) -> Self {
		self.cancel_on_fetch = Some(token);
		self
	}

	pub fn calls(&self) -> Arc<Mutex<Vec<BackendCall>>> {
		Arc::clone(&self.calls)
	}

	async fn round_trip(&self) -> Result<(), FetchError> {
		if let Some(token) = &self.cancel_on_fetch {
			token.cancel();
		}
		if let Some(delay) = self.delay {
			tokio::time::sleep(delay).await;
		}
		match &self.fail {
			Some(message) => Err(FetchError::Unavailable(message.clone())),
			None => Ok(()),
		}
	}
}

fn matches_condition(file: &FileRecord, condition: &ResolvedCondition) -> bool {
	match condition {
		ResolvedCondition::TagsInclude { tag_ids } => tag_ids.iter().any(|t| file.tags.contains(t)),
		ResolvedCondition::TagsExclude { tag_ids } => !tag_ids.iter().any(|t| file.tags.contains(t)),
		ResolvedCondition::PathContains { needle } => file.absolute_path.to_string_lossy().contains(needle),
		ResolvedCondition::PathNotContains { needle } => !file.absolute_path.to_string_lossy().contains(needle),
		ResolvedCondition::PathEquals { value } => file.absolute_path.to_string_lossy().as_ref() == value.as_str(),
		ResolvedCondition::ExtensionIs { ext, equals } => {
			let has = file.absolute_path.extension().is_some_and(|e| e.eq_ignore_ascii_case(ext));
			has == *equals
		}
	}
}

#[async_trait]
impl Backend for RecordingBackend {
	async fn fetch_all(&self, _order: FileOrder) -> Result<Vec<FileRecord>, FetchError> {
		self.calls.lock().push(BackendCall::All);
		self.round_trip().await?;
		Ok(self.files.clone())
	}

	async fn fetch_by_query(
		&self,
		conditions: &[ResolvedCondition],
		match_any: bool,
		order: FileOrder,
	) -> Result<Vec<FileRecord>, FetchError> {
		self.calls.lock().push(BackendCall::Query {
			conditions: conditions.len(),
			match_any,
			order,
		});
		self.round_trip().await?;
		Ok(self
			.files
			.iter()
			.filter(|f| {
				if match_any {
					conditions.iter().any(|c| matches_condition(f, c))
				} else {
					conditions.iter().all(|c| matches_condition(f, c))
				}
			})
			.cloned()
			.collect())
	}

	async fn fetch_missing(&self, _order: FileOrder) -> Result<Vec<FileRecord>, FetchError> {
		self.calls.lock().push(BackendCall::Missing);
		self.round_trip().await?;
		Ok(self.missing.clone())
	}

	// Unused by the engine's query paths; implemented for trait completeness.
	async fn fetch_by_ids(&self, ids: &[FileId]) -> Result<Vec<FileRecord>, FetchError> {
		self.round_trip().await?;
		Ok(ids
			.iter()
			.filter_map(|id| self.files.iter().find(|f| f.id == *id).cloned())
			.collect())
	}
}

/// Tag context with no hierarchy.
pub struct FlatTags;

impl lumen_core::TagContext for FlatTags {
	fn descendants_of(&self, _tag: TagId) -> Vec<TagId> {
		Vec::new()
	}
}

/// Convenience: a hidden-tag set.
pub fn tag_set(tags: &[u64]) -> BTreeSet<TagId> {
	tags.iter().map(|t| TagId(*t)).collect()
}
