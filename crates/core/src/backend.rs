//! Backend collaborator trait and fetch errors.

use async_trait::async_trait;
use thiserror::Error;

use crate::file::{FileId, FileRecord};
use crate::order::FileOrder;
use crate::search::ResolvedCondition;

/// Errors from backend round-trips.
///
/// The engine never treats these as fatal: a failed fetch leaves the file
/// list in its last-good state.
#[derive(Debug, Error)]
pub enum FetchError {
	/// The backend is not reachable or not initialized.
	#[error("backend unavailable: {0}")]
	Unavailable(String),
	/// The backend rejected or failed to execute the query.
	#[error("query failed: {0}")]
	Query(String),
	/// I/O failure talking to the backing store.
	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),
}

/// Asynchronous data store the engine queries against.
///
/// All methods may fail with a [`FetchError`]; none of them mutate engine
/// state. Ordering is applied backend-side.
#[async_trait]
pub trait Backend: Send + Sync {
	/// Fetches the unfiltered file list.
	async fn fetch_all(&self, order: FileOrder) -> Result<Vec<FileRecord>, FetchError>;

	/// Fetches files matching `conditions`, combined with OR when
	/// `match_any` is true and AND otherwise.
	async fn fetch_by_query(
		&self,
		conditions: &[ResolvedCondition],
		match_any: bool,
		order: FileOrder,
	) -> Result<Vec<FileRecord>, FetchError>;

	/// Fetches files whose backing content is absent on disk.
	async fn fetch_missing(&self, order: FileOrder) -> Result<Vec<FileRecord>, FetchError>;

	/// Fetches files by id, in the order given.
	async fn fetch_by_ids(&self, ids: &[FileId]) -> Result<Vec<FileRecord>, FetchError>;
}
