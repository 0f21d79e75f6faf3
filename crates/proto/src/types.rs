//! Wire types for the preview sync protocol.

use std::path::PathBuf;

use lumen_core::FileId;
use serde::{Deserialize, Serialize};

/// Current protocol version, stamped on every frame.
///
/// Receivers drop frames from any other version instead of misparsing them.
pub const PROTOCOL_VERSION: u16 = 1;

/// Content layout of the preview window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewMethod {
	/// Vertical list.
	List,
	/// Uniform grid.
	Grid,
	/// Masonry, vertical flow.
	MasonryVertical,
	/// Masonry, horizontal flow.
	MasonryHorizontal,
	/// One item at a time.
	Slide,
}

/// The curated state subset sent to the preview process.
///
/// Immutable once sent; the receiver gets its own copy, never shared state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewSnapshot {
	/// Visible file ids, in display order.
	pub ids: Vec<FileId>,
	/// Directory the thumbnails live in.
	pub thumbnail_directory: PathBuf,
	/// Layout to present the items in.
	pub view_method: ViewMethod,
	/// Item to focus initially; the first item when absent or unknown.
	pub active_item_id: Option<FileId>,
}

/// Payload variants of a sync frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum FramePayload {
	/// A new preview snapshot; supersedes any in-progress handling of a
	/// previous one.
	Snapshot(PreviewSnapshot),
	/// The preview finished a fetch cycle.
	Ready {
		/// Sequence number of the completed cycle, starting at 1.
		sequence: u64,
	},
	/// The peer is closing the channel.
	Close,
}

/// One framed message on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
	/// Protocol version the sender speaks.
	pub version: u16,
	/// The message itself.
	pub payload: FramePayload,
}

impl Frame {
	/// Wraps a payload, stamping the current protocol version.
	#[must_use]
	pub fn new(payload: FramePayload) -> Self {
		Self {
			version: PROTOCOL_VERSION,
			payload,
		}
	}
}
