//! Preview-process bootstrap sequence.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use lumen_core::{Backend, FileList, LocationIndex, retry_with_interval};
use lumen_proto::{FrameHandler, PreviewSnapshot, split};
use thiserror::Error;

use crate::pipeline::PreviewPipeline;

/// Connection retry budget: the primary may not have bound its socket yet
/// when the preview process starts.
const CONNECT_ATTEMPTS: usize = 10;
const CONNECT_INTERVAL: Duration = Duration::from_millis(100);

/// Failures of the preview bootstrap sequence.
#[derive(Debug, Error)]
pub enum PreviewError {
	/// The primary's socket never became reachable.
	#[error("could not reach the primary process: {0}")]
	Connect(#[source] std::io::Error),
	/// The channel closed before the first fetch cycle completed.
	#[error("channel closed before the first snapshot completed")]
	ClosedBeforeReady,
}

struct PreviewHandler {
	pipeline: PreviewPipeline,
}

impl FrameHandler for PreviewHandler {
	fn on_snapshot(&mut self, snapshot: PreviewSnapshot) {
		self.pipeline.receive(snapshot);
	}

	fn on_ready(&mut self, sequence: u64) {
		// Acknowledgements flow preview -> primary, not the other way.
		tracing::debug!(sequence, "unexpected ready frame on preview side");
	}

	fn on_close(&mut self) {
		self.pipeline.close();
	}
}

/// Connects to the primary, wires the pipeline to the channel, and waits for
/// the first fetch cycle to complete.
///
/// `socket_path` of `None` resolves to [`lumen_proto::default_socket_path`].
/// Returns the running pipeline once it is ready to present; the channel
/// receive loop keeps running in the background until the primary closes it.
pub async fn run_preview(
	socket_path: Option<PathBuf>,
	backend: Arc<dyn Backend>,
	locations: Arc<dyn LocationIndex>,
	files: Arc<FileList>,
) -> Result<PreviewPipeline, PreviewError> {
	let socket_path = socket_path.unwrap_or_else(lumen_proto::default_socket_path);
	let stream = retry_with_interval(CONNECT_ATTEMPTS, CONNECT_INTERVAL, || lumen_proto::connect(&socket_path))
		.await
		.map_err(PreviewError::Connect)?;
	tracing::info!(path = %socket_path.display(), "connected to primary");

	let (sender, receiver) = split(stream);
	let (pipeline, readiness) = PreviewPipeline::new(backend, locations, files);
	pipeline.attach_acks(sender);

	let handler = PreviewHandler {
		pipeline: pipeline.clone(),
	};
	let on_error = pipeline.clone();
	tokio::spawn(async move {
		if let Err(error) = receiver.run(handler).await {
			tracing::warn!(error = %error, "sync channel failed");
			on_error.close();
		}
	});

	match readiness.await {
		Ok(()) => Ok(pipeline),
		Err(_) => Err(PreviewError::ClosedBeforeReady),
	}
}
