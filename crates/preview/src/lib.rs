//! Preview-process fetch pipeline and readiness bootstrap.
//!
//! The preview process mirrors the primary's cancel-then-restart fetch
//! discipline, keyed off inbound sync frames instead of local reactive
//! inputs: every received snapshot supersedes the in-progress cycle. A
//! one-shot readiness signal resolves when the first cycle completes, which
//! is what the preview bootstrap sequence awaits before showing content.

#![warn(missing_docs)]

pub mod bootstrap;
pub mod pipeline;

pub use bootstrap::{PreviewError, run_preview};
pub use pipeline::{PipelineState, PreviewPipeline, ReadinessSignal, ViewSettings};

#[cfg(test)]
mod testutil;
