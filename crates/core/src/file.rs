//! File records and identifier newtypes.

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Unique identifier for files in the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FileId(pub u64);

/// Unique identifier for tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TagId(pub u64);

/// Unique identifier for storage locations (watched root directories).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LocationId(pub u64);

/// A single file entry as returned by the backend.
///
/// Records are value objects: the engine replaces whole lists rather than
/// mutating individual records in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
	/// Stable identity of the file.
	pub id: FileId,
	/// The storage location this file belongs to.
	pub location_id: LocationId,
	/// Absolute path on disk.
	pub absolute_path: PathBuf,
	/// Tags assigned to this file.
	pub tags: BTreeSet<TagId>,
}

impl FileRecord {
	/// Returns true when any of the file's tags is in `tags`.
	pub fn has_any_tag(&self, tags: &BTreeSet<TagId>) -> bool {
		self.tags.iter().any(|t| tags.contains(t))
	}
}
