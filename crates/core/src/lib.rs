//! Core data model and collaborator traits for the lumen library engine.
//!
//! This crate defines the shared vocabulary of the query synchronization
//! engine: file records and their identifier newtypes, sort orders, search
//! criteria and their resolved backend conditions, the `Backend` and
//! `LocationIndex` collaborator traits, and the atomically replaceable
//! `FileList` that views read from.

#![warn(missing_docs)]

pub mod backend;
pub mod file;
pub mod list;
pub mod location;
pub mod order;
pub mod retry;
pub mod search;

pub use backend::{Backend, FetchError};
pub use file::{FileId, FileRecord, LocationId, TagId};
pub use list::FileList;
pub use location::LocationIndex;
pub use order::{FileOrder, OrderDirection, OrderField};
pub use retry::retry_with_interval;
pub use search::{ResolvedCondition, SearchCriteria, StringOperator, TagContext, TagOperator};
