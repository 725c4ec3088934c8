//! Lifecycle engine: orchestrator, precondition assertions, execution adapter

pub mod assertions;
pub mod executor;
pub mod lifecycle;

pub use executor::{ensure_extension, Executor, PgExecutor, RecordingExecutor};
pub use lifecycle::SchemaEngine;
