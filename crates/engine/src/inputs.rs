//! Reactive query inputs.
//!
//! The Rust rendering of the reactive cells the coordinator watches: every
//! setter recomputes the composite signature synchronously and hands it to
//! the coordinator, exactly once per actual change. Setting a value to what
//! it already is does not fire; `refetch` always fires.

use std::collections::BTreeSet;
use std::sync::Arc;

use lumen_core::{FileOrder, SearchCriteria, TagContext, TagId};

use crate::coordinator::FetchCoordinator;
use crate::signature::QuerySignature;

/// The mutable facts a query depends on, with change notification wired to a
/// [`FetchCoordinator`].
pub struct QueryInputs {
	coordinator: FetchCoordinator,
	tags: Arc<dyn TagContext + Send + Sync>,
	criteria: Vec<SearchCriteria>,
	match_any: bool,
	order: FileOrder,
	hidden_tags: BTreeSet<TagId>,
	shows_missing_content: bool,
	refetch_token: u64,
}

impl QueryInputs {
	/// Creates inputs in their default state.
	///
	/// No fetch is dispatched until the first change; call [`Self::refetch`]
	/// once at startup to trigger the initial load.
	pub fn new(coordinator: FetchCoordinator, tags: Arc<dyn TagContext + Send + Sync>) -> Self {
		Self {
			coordinator,
			tags,
			criteria: Vec::new(),
			match_any: false,
			order: FileOrder::default(),
			hidden_tags: BTreeSet::new(),
			shows_missing_content: false,
			refetch_token: 0,
		}
	}

	/// The signature for the current input state.
	pub fn signature(&self) -> QuerySignature {
		QuerySignature {
			shows_missing_content: self.shows_missing_content,
			conditions: self.criteria.iter().map(|c| c.resolve(self.tags.as_ref())).collect(),
			match_any: self.match_any,
			order: self.order,
			hidden_tags: self.hidden_tags.clone(),
			refetch_token: self.refetch_token,
		}
	}

	fn notify(&self) {
		self.coordinator.observe(self.signature());
	}

	/// Replaces the search criteria list.
	pub fn set_search_criteria(&mut self, criteria: Vec<SearchCriteria>) {
		if self.criteria != criteria {
			self.criteria = criteria;
			self.notify();
		}
	}

	/// Sets whether conditions combine with OR (true) or AND (false).
	pub fn set_match_any(&mut self, match_any: bool) {
		if self.match_any != match_any {
			self.match_any = match_any;
			self.notify();
		}
	}

	/// Sets the result ordering.
	pub fn set_order(&mut self, order: FileOrder) {
		if self.order != order {
			self.order = order;
			self.notify();
		}
	}

	/// Replaces the hidden-tag exclusion set.
	pub fn set_hidden_tags(&mut self, hidden_tags: BTreeSet<TagId>) {
		if self.hidden_tags != hidden_tags {
			self.hidden_tags = hidden_tags;
			self.notify();
		}
	}

	/// Toggles the "show missing content" view.
	pub fn set_shows_missing_content(&mut self, shows_missing_content: bool) {
		if self.shows_missing_content != shows_missing_content {
			self.shows_missing_content = shows_missing_content;
			self.notify();
		}
	}

	/// Forces a refetch of the current state.
	pub fn refetch(&mut self) {
		self.refetch_token = self.refetch_token.wrapping_add(1);
		self.notify();
	}
}
