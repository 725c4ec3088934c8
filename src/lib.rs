//! Hypertable schema lifecycle engine for TimescaleDB
//!
//! Given a declarative table description (a time column with a bucketing
//! interval, optional compression and retention policies, an optional
//! continuous-aggregate definition), the engine synthesizes the ordered,
//! idempotent DDL sequence that brings the live schema into agreement with
//! that declaration — on table creation, column addition, and column
//! alteration. Destructive and extension-specific operations are gated by
//! single-statement catalog assertions.
//!
//! The surrounding migration framework owns transactions, diffing, and
//! retries; this crate only turns descriptors into statements and issues
//! them through a narrow [`engine::Executor`] boundary.

pub mod config;
pub mod ddl;
pub mod engine;
pub mod error;
pub mod interval;
pub mod model;

pub use config::EngineSettings;
pub use ddl::{MigrationReport, RenderedStatement};
pub use engine::{ensure_extension, Executor, PgExecutor, RecordingExecutor, SchemaEngine};
pub use error::{EngineError, EngineResult};
pub use interval::{Interval, IntervalUnit};
pub use model::{
    ColumnDescriptor, ColumnKind, ColumnOrder, CompressionPolicy, ContinuousAggregateDefinition,
    RefreshPolicy, RetentionPolicy, SchedulePolicy, TableDescriptor,
};
