//! Wire schema and framed transport for the primary/preview sync channel.
//!
//! The primary process relays a curated state subset (visible file ids,
//! thumbnail directory, view mode, active item) to the separately running
//! preview process, and the preview acknowledges completed cycles back. The
//! transport is a Unix domain socket carrying postcard-encoded frames with a
//! u32-le length prefix. Frames are tagged and versioned so additive fields
//! do not silently break older receivers.

#![warn(missing_docs)]

pub mod channel;
pub mod paths;
pub mod types;

pub use channel::{ChannelError, FrameHandler, SyncReceiver, SyncSender, connect, listen, split};
pub use paths::default_socket_path;
pub use types::{Frame, FramePayload, PROTOCOL_VERSION, PreviewSnapshot, ViewMethod};
