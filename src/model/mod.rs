//! Descriptor and policy models consumed by the lifecycle engine
//!
//! These are resolved inputs: the declaration layer that produces them
//! (model/field definitions, admin surfaces) lives outside this crate.

pub mod column;
pub mod policy;
pub mod table;

pub use column::{ColumnDescriptor, ColumnKind};
pub use policy::{
    ColumnOrder, CompressionPolicy, ContinuousAggregateDefinition, RefreshPolicy, RetentionPolicy,
    SchedulePolicy,
};
pub use table::TableDescriptor;
