//! Location index collaborator trait.

use async_trait::async_trait;

use crate::backend::FetchError;
use crate::file::LocationId;

/// Registry of known storage locations (watched root directories).
///
/// The preview process uses this to repair its view of locations when a
/// fetched file references a location it does not know about yet, e.g. when
/// a new location was added in the primary window after the preview started.
#[async_trait]
pub trait LocationIndex: Send + Sync {
	/// Re-synchronizes the set of known locations. Idempotent.
	async fn init(&self) -> Result<(), FetchError>;

	/// Returns true when `location` is known locally.
	fn contains(&self, location: LocationId) -> bool;
}
