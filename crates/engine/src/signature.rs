//! The composite query signature.

use std::collections::BTreeSet;

use lumen_core::{FileOrder, ResolvedCondition, TagId};

/// The ordered tuple of reactive facts that jointly determine which query
/// should run.
///
/// Two signatures are equal iff every component is structurally equal; the
/// `conditions` comparison is deep and order-sensitive. The engine never
/// inspects signature history, only the latest value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QuerySignature {
	/// Overrides everything else: fetch files whose content is absent.
	pub shows_missing_content: bool,
	/// Resolved search conditions, in criteria order.
	pub conditions: Vec<ResolvedCondition>,
	/// Combine conditions with OR (true) or AND (false).
	pub match_any: bool,
	/// Result ordering, applied backend-side.
	pub order: FileOrder,
	/// Tags whose files are filtered out client-side after the fetch.
	pub hidden_tags: BTreeSet<TagId>,
	/// Monotonic counter bumped to force a refetch of an otherwise
	/// identical signature.
	pub refetch_token: u64,
}

/// The three mutually exclusive fetch modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
	/// Files whose backing content is absent.
	Missing,
	/// The unfiltered file list.
	All,
	/// Files matching the resolved conditions.
	Query,
}

impl QuerySignature {
	/// Selects the fetch mode for this signature.
	///
	/// Total in `(shows_missing_content, conditions.len())`: missing content
	/// wins, then empty conditions mean an unfiltered fetch, otherwise a
	/// conditional query.
	pub fn mode(&self) -> FetchMode {
		if self.shows_missing_content {
			FetchMode::Missing
		} else if self.conditions.is_empty() {
			FetchMode::All
		} else {
			FetchMode::Query
		}
	}
}
