//! Framed duplex channel over a Unix domain socket.
//!
//! Frames are postcard-encoded with a u32-le length prefix. The stream
//! preserves send order; there is no backpressure beyond the socket buffer,
//! so a fast sender can enqueue several snapshots before the receiver
//! processes the first. Acting on the latest one only is the receiver's
//! responsibility (each inbound snapshot supersedes the previous cycle).

use std::path::Path;
use std::sync::Arc;

use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::UnixStream;
use tokio::net::unix::{OwnedReadHalf, OwnedWriteHalf};

use crate::types::{Frame, FramePayload, PROTOCOL_VERSION};

/// Upper bound on the encoded size of one frame. A corrupt length prefix
/// must not turn into a giant buffer allocation.
const MAX_FRAME_LEN: u32 = 16 * 1024 * 1024;

/// Errors on the sync channel.
#[derive(Debug, Error)]
pub enum ChannelError {
	/// Socket I/O failure.
	#[error("channel I/O error: {0}")]
	Io(#[from] std::io::Error),
	/// A frame could not be encoded or decoded.
	#[error("frame codec error: {0}")]
	Codec(#[from] postcard::Error),
	/// A frame exceeded the maximum encoded size.
	#[error("frame of {0} bytes exceeds the frame size limit")]
	FrameTooLarge(usize),
}

async fn write_frame(output: &mut (impl AsyncWrite + Unpin), frame: &Frame) -> Result<(), ChannelError> {
	let buf = postcard::to_allocvec(frame)?;
	let len = u32::try_from(buf.len())
		.ok()
		.filter(|len| *len <= MAX_FRAME_LEN)
		.ok_or(ChannelError::FrameTooLarge(buf.len()))?;
	output.write_u32_le(len).await?;
	output.write_all(&buf).await?;
	output.flush().await?;
	Ok(())
}

/// Reads one frame, or `None` on clean end of stream.
async fn read_frame(input: &mut (impl AsyncRead + Unpin)) -> Result<Option<Frame>, ChannelError> {
	let len = match input.read_u32_le().await {
		Ok(len) => len,
		Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
		Err(e) => return Err(e.into()),
	};
	if len > MAX_FRAME_LEN {
		return Err(ChannelError::FrameTooLarge(len as usize));
	}
	let mut buf = vec![0u8; len as usize];
	input.read_exact(&mut buf).await?;
	Ok(Some(postcard::from_bytes(&buf)?))
}

/// Sending half of the sync channel. Cheap to clone.
#[derive(Clone)]
pub struct SyncSender {
	writer: Arc<tokio::sync::Mutex<OwnedWriteHalf>>,
}

impl SyncSender {
	/// Sends one payload, fire-and-forget at the protocol level.
	///
	/// Delivery is at-most-once: an I/O failure here means the peer is gone,
	/// not that a retransmit should happen.
	pub async fn send(&self, payload: FramePayload) -> Result<(), ChannelError> {
		let frame = Frame::new(payload);
		let mut writer = self.writer.lock().await;
		write_frame(&mut *writer, &frame).await
	}
}

/// Receiving half of the sync channel.
///
/// [`SyncReceiver::run`] consumes the receiver, which enforces the
/// once-per-process-lifetime handler registration at the type level.
pub struct SyncReceiver {
	reader: BufReader<OwnedReadHalf>,
}

/// Inbound frame dispatch, one method per payload variant.
pub trait FrameHandler: Send {
	/// A new snapshot arrived; supersedes any in-progress cycle.
	fn on_snapshot(&mut self, snapshot: crate::types::PreviewSnapshot);
	/// The peer completed a fetch cycle.
	fn on_ready(&mut self, sequence: u64);
	/// The peer is closing the channel.
	fn on_close(&mut self);
}

impl SyncReceiver {
	/// Dispatches inbound frames to `handler` until the peer closes.
	///
	/// Frames from an unknown protocol version are logged and dropped.
	/// Returns cleanly on end of stream or an explicit `Close` frame.
	pub async fn run<H: FrameHandler>(mut self, mut handler: H) -> Result<(), ChannelError> {
		loop {
			let Some(frame) = read_frame(&mut self.reader).await? else {
				tracing::info!("sync channel closed by peer");
				handler.on_close();
				return Ok(());
			};
			if frame.version != PROTOCOL_VERSION {
				tracing::warn!(got = frame.version, expected = PROTOCOL_VERSION, "dropping frame from unknown protocol version");
				continue;
			}
			match frame.payload {
				FramePayload::Snapshot(snapshot) => handler.on_snapshot(snapshot),
				FramePayload::Ready { sequence } => handler.on_ready(sequence),
				FramePayload::Close => {
					tracing::info!("sync channel closed by frame");
					handler.on_close();
					return Ok(());
				}
			}
		}
	}
}

/// Splits a connected stream into the channel halves.
pub fn split(stream: UnixStream) -> (SyncSender, SyncReceiver) {
	let (reader, writer) = stream.into_split();
	(
		SyncSender {
			writer: Arc::new(tokio::sync::Mutex::new(writer)),
		},
		SyncReceiver {
			reader: BufReader::new(reader),
		},
	)
}

/// Connects to the peer's socket.
pub async fn connect(socket_path: impl AsRef<Path>) -> std::io::Result<UnixStream> {
	UnixStream::connect(socket_path).await
}

/// Binds `socket_path` and accepts a single peer connection.
///
/// The channel links exactly one primary to one preview process; a stale
/// socket file from a previous run is removed first.
pub async fn listen(socket_path: impl AsRef<Path>) -> std::io::Result<UnixStream> {
	let path = socket_path.as_ref();
	if path.exists() {
		std::fs::remove_file(path)?;
	}
	let listener = tokio::net::UnixListener::bind(path)?;
	tracing::info!(path = %path.display(), "sync channel listening");
	let (stream, _addr) = listener.accept().await?;
	tracing::info!("preview peer connected");
	Ok(stream)
}
