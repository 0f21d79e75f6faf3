//! The shared, atomically replaceable file list.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use arc_swap::ArcSwap;

use crate::file::{FileId, FileRecord};

/// Ordered file list shared between the engine and its readers.
///
/// Readers take cheap consistent snapshots; the single writer (the currently
/// uncancelled executor instance) replaces the whole content atomically.
/// Partial or interleaved replacement is never observable.
#[derive(Debug)]
pub struct FileList {
	files: ArcSwap<Vec<FileRecord>>,
	version: AtomicU64,
}

impl Default for FileList {
	fn default() -> Self {
		Self::new()
	}
}

impl FileList {
	/// Creates an empty list.
	pub fn new() -> Self {
		Self {
			files: ArcSwap::from_pointee(Vec::new()),
			version: AtomicU64::new(0),
		}
	}

	/// Returns a consistent snapshot of the current content.
	pub fn snapshot(&self) -> Arc<Vec<FileRecord>> {
		self.files.load_full()
	}

	/// Atomically replaces the whole content.
	pub fn replace(&self, files: Vec<FileRecord>) {
		self.files.store(Arc::new(files));
		self.version.fetch_add(1, Ordering::AcqRel);
	}

	/// Clears the list.
	pub fn clear(&self) {
		self.replace(Vec::new());
	}

	/// Number of files in the current snapshot.
	pub fn len(&self) -> usize {
		self.files.load().len()
	}

	/// Returns true when the current snapshot is empty.
	pub fn is_empty(&self) -> bool {
		self.files.load().is_empty()
	}

	/// Monotonic counter incremented on every replacement.
	///
	/// Lets readers detect that the content changed without comparing it.
	pub fn version(&self) -> u64 {
		self.version.load(Ordering::Acquire)
	}

	/// Position of `id` in the current snapshot, if present.
	pub fn get_index(&self, id: FileId) -> Option<usize> {
		self.files.load().iter().position(|f| f.id == id)
	}
}
