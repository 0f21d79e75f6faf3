//! Reactive query synchronization engine.
//!
//! Watches a set of mutable, interdependent query inputs and guarantees that
//! exactly one correct, up-to-date fetch is ever in flight against the
//! backend, even when inputs change faster than queries complete. The core
//! discipline is cancel-then-restart: every observed signature change
//! cancels the current pending fetch task and schedules a new one behind a
//! quiet period, so bursts of rapid changes collapse into a single dispatch.

#![warn(missing_docs)]

pub mod config;
pub mod coordinator;
pub mod executor;
pub mod inputs;
pub mod persist;
pub mod signature;

mod token;

pub use config::EngineConfig;
pub use coordinator::FetchCoordinator;
pub use executor::{FetchOutcome, QueryExecutor};
pub use inputs::QueryInputs;
pub use persist::{PreferenceSink, PreferenceWriter};
pub use signature::{FetchMode, QuerySignature};

#[cfg(test)]
mod testutil;
