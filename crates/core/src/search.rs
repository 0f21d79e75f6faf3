//! Declarative search criteria and their resolution into backend conditions.
//!
//! Criteria are what the UI edits; conditions are what the backend executes.
//! Resolution is a pure, synchronous function. The only non-trivial step is
//! expanding a recursive tag criterion into the full set of descendant tag
//! ids, which requires a [`TagContext`] lookup.

use crate::file::TagId;

/// Operator for tag criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagOperator {
	/// File must carry (one of) the tag(s).
	Contains,
	/// File must not carry any of the tag(s).
	NotContains,
}

/// Operator for string criteria (paths, extensions).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringOperator {
	/// Substring match.
	Contains,
	/// Negated substring match.
	NotContains,
	/// Exact match.
	Equals,
}

/// A declarative search criterion as edited by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchCriteria {
	/// Match on an assigned tag, optionally including all descendant tags.
	Tag {
		/// The tag to match.
		id: TagId,
		/// Whether descendant tags also satisfy the criterion.
		recursive: bool,
		/// Match polarity.
		operator: TagOperator,
	},
	/// Match on the absolute path.
	Path {
		/// Substring or exact value, depending on `operator`.
		needle: String,
		/// Match kind.
		operator: StringOperator,
	},
	/// Match on the file extension.
	Extension {
		/// Extension without the leading dot.
		ext: String,
		/// Match kind.
		operator: StringOperator,
	},
}

/// Tag-hierarchy lookups needed to resolve criteria.
///
/// Implemented by the application's tag store. Pure and synchronous.
pub trait TagContext {
	/// Returns all descendants of `tag`, excluding `tag` itself.
	fn descendants_of(&self, tag: TagId) -> Vec<TagId>;
}

/// A backend-ready query condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedCondition {
	/// File carries at least one of these tags.
	TagsInclude {
		/// Candidate tags, in resolution order (criterion tag first).
		tag_ids: Vec<TagId>,
	},
	/// File carries none of these tags.
	TagsExclude {
		/// Excluded tags, in resolution order.
		tag_ids: Vec<TagId>,
	},
	/// Absolute path contains the needle.
	PathContains {
		/// Substring to look for.
		needle: String,
	},
	/// Absolute path does not contain the needle.
	PathNotContains {
		/// Substring that must be absent.
		needle: String,
	},
	/// Absolute path equals the value exactly.
	PathEquals {
		/// Full path to compare against.
		value: String,
	},
	/// Extension comparison.
	ExtensionIs {
		/// Extension without the leading dot.
		ext: String,
		/// True for equality, false for inequality.
		equals: bool,
	},
}

impl SearchCriteria {
	/// Resolves this criterion into a backend condition.
	///
	/// Recursive tag criteria expand to the tag plus all of its descendants;
	/// the criterion tag always comes first so that equal criteria resolve to
	/// structurally equal conditions.
	pub fn resolve(&self, tags: &dyn TagContext) -> ResolvedCondition {
		match self {
			Self::Tag { id, recursive, operator } => {
				let mut tag_ids = vec![*id];
				if *recursive {
					tag_ids.extend(tags.descendants_of(*id));
				}
				match operator {
					TagOperator::Contains => ResolvedCondition::TagsInclude { tag_ids },
					TagOperator::NotContains => ResolvedCondition::TagsExclude { tag_ids },
				}
			}
			Self::Path { needle, operator } => match operator {
				StringOperator::Contains => ResolvedCondition::PathContains { needle: needle.clone() },
				StringOperator::NotContains => ResolvedCondition::PathNotContains { needle: needle.clone() },
				StringOperator::Equals => ResolvedCondition::PathEquals { value: needle.clone() },
			},
			Self::Extension { ext, operator } => ResolvedCondition::ExtensionIs {
				ext: ext.clone(),
				equals: !matches!(operator, StringOperator::NotContains),
			},
		}
	}
}
