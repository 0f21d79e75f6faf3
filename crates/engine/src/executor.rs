//! Query execution against the backend.

use std::sync::Arc;

use lumen_core::{Backend, FetchError, FileList};
use tokio_util::sync::CancellationToken;

use crate::signature::{FetchMode, QuerySignature};

/// Result of one executor run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
	/// The file list was replaced with this many visible files.
	Committed {
		/// Files installed into the list, after hidden-tag filtering.
		visible: usize,
	},
	/// The run was superseded; the file list was left untouched.
	Superseded,
}

/// Issues one of the three fetch modes and installs the result.
///
/// Cancellation is cooperative: the token is observed after every backend
/// round-trip and once more immediately before commit, so a superseded run
/// never mutates the file list. An in-flight backend call is allowed to
/// complete; its result is discarded.
#[derive(Clone)]
pub struct QueryExecutor {
	backend: Arc<dyn Backend>,
	files: Arc<FileList>,
}

impl QueryExecutor {
	/// Creates an executor writing into `files`.
	pub fn new(backend: Arc<dyn Backend>, files: Arc<FileList>) -> Self {
		Self { backend, files }
	}

	/// The file list this executor commits into.
	pub fn files(&self) -> &Arc<FileList> {
		&self.files
	}

	/// Runs the query for a frozen signature snapshot.
	///
	/// `hidden_tags` is applied as a client-side post-filter rather than as
	/// part of the backend query: it is a client-local concern that may
	/// change faster than backend round-trips complete.
	pub async fn execute(&self, signature: &QuerySignature, cancel: &CancellationToken) -> Result<FetchOutcome, FetchError> {
		if cancel.is_cancelled() {
			return Ok(FetchOutcome::Superseded);
		}

		let fetched = match signature.mode() {
			FetchMode::Missing => self.backend.fetch_missing(signature.order).await?,
			FetchMode::All => self.backend.fetch_all(signature.order).await?,
			FetchMode::Query => {
				self.backend
					.fetch_by_query(&signature.conditions, signature.match_any, signature.order)
					.await?
			}
		};

		if cancel.is_cancelled() {
			return Ok(FetchOutcome::Superseded);
		}

		let visible: Vec<_> = if signature.hidden_tags.is_empty() {
			fetched
		} else {
			fetched.into_iter().filter(|f| !f.has_any_tag(&signature.hidden_tags)).collect()
		};

		// Final check before the only side effect.
		if cancel.is_cancelled() {
			return Ok(FetchOutcome::Superseded);
		}
		let count = visible.len();
		self.files.replace(visible);
		tracing::trace!(mode = ?signature.mode(), visible = count, "query committed");
		Ok(FetchOutcome::Committed { visible: count })
	}
}
