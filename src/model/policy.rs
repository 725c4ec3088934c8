//! Policy models
//!
//! Plain configuration structs with explicit defaults and builder methods.
//! The engine only reads these; it never mutates or persists them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::interval::Interval;

/// One entry of a compression order-by clause
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnOrder {
    pub column: String,
    pub descending: bool,
}

impl ColumnOrder {
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            descending: false,
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            descending: true,
        }
    }

    /// Parse the shorthand spelling: a leading `-` means descending,
    /// so `"-time"` orders by `time DESC`.
    pub fn parse(spec: &str) -> Self {
        match spec.strip_prefix('-') {
            Some(column) => Self::desc(column),
            None => Self::asc(spec),
        }
    }
}

/// Recurrence parameters shared by compression, retention, and
/// continuous-aggregate background jobs
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SchedulePolicy {
    pub schedule_interval: Option<Interval>,
    pub initial_start: Option<DateTime<Utc>>,
    pub timezone: Option<String>,
    pub if_not_exists: bool,
}

/// Compression declaration: the columnar layout plus an optional
/// background compression job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompressionPolicy {
    pub enable: bool,
    /// Ordered compress_orderby entries. Should not overlap `segment_by`
    /// (documented constraint, not enforced here).
    pub order_by: Option<Vec<ColumnOrder>>,
    pub segment_by: Option<Vec<String>>,
    pub chunk_time_interval: Option<Interval>,
    /// Age threshold for the background compression job; when set, an
    /// add_compression_policy call follows the compression enable.
    pub compress_after: Option<Interval>,
    pub schedule: SchedulePolicy,
    /// Only compress chunks created before this age.
    pub compress_created_before: Option<Interval>,
}

impl Default for CompressionPolicy {
    fn default() -> Self {
        Self {
            enable: true,
            order_by: None,
            segment_by: None,
            chunk_time_interval: None,
            compress_after: None,
            schedule: SchedulePolicy::default(),
            compress_created_before: None,
        }
    }
}

impl CompressionPolicy {
    /// Order-by entries from shorthand specs, e.g. `["device", "-time"]`
    pub fn with_order_by(mut self, specs: &[&str]) -> Self {
        self.order_by = Some(specs.iter().map(|s| ColumnOrder::parse(s)).collect());
        self
    }

    pub fn with_segment_by(mut self, columns: &[&str]) -> Self {
        self.segment_by = Some(columns.iter().map(|c| c.to_string()).collect());
        self
    }

    pub fn with_chunk_time_interval(mut self, interval: Interval) -> Self {
        self.chunk_time_interval = Some(interval);
        self
    }

    pub fn with_compress_after(mut self, interval: Interval) -> Self {
        self.compress_after = Some(interval);
        self
    }

    pub fn with_schedule(mut self, schedule: SchedulePolicy) -> Self {
        self.schedule = schedule;
        self
    }
}

/// Retention declaration: drop chunks older than `drop_after`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetentionPolicy {
    pub drop_after: Interval,
    pub schedule: SchedulePolicy,
    pub drop_created_before: bool,
}

impl RetentionPolicy {
    pub fn new(drop_after: Interval) -> Self {
        Self {
            drop_after,
            schedule: SchedulePolicy::default(),
            drop_created_before: false,
        }
    }

    pub fn with_schedule(mut self, schedule: SchedulePolicy) -> Self {
        self.schedule = schedule;
        self
    }

    pub fn with_drop_created_before(mut self) -> Self {
        self.drop_created_before = true;
        self
    }
}

/// Refresh job attached to a continuous aggregate
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RefreshPolicy {
    pub start_offset: Option<Interval>,
    pub end_offset: Option<Interval>,
    pub schedule: SchedulePolicy,
}

/// A continuous aggregate declaration. The defining query is opaque to the
/// engine: it is embedded verbatim into the CREATE MATERIALIZED VIEW body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContinuousAggregateDefinition {
    /// The pre-rendered SELECT defining the view.
    pub definition: String,
    /// Bucket width of the view's time_bucket, used to size default
    /// refresh windows.
    pub bucket_interval: Interval,
    pub materialized_only: Option<bool>,
    pub create_group_indexes: Option<bool>,
    pub finalized: Option<bool>,
    pub with_no_data: bool,
    pub refresh: Option<RefreshPolicy>,
}

impl ContinuousAggregateDefinition {
    pub fn new(definition: impl Into<String>, bucket_interval: Interval) -> Self {
        Self {
            definition: definition.into(),
            bucket_interval,
            materialized_only: None,
            create_group_indexes: None,
            finalized: None,
            with_no_data: false,
            refresh: None,
        }
    }

    pub fn with_no_data(mut self) -> Self {
        self.with_no_data = true;
        self
    }

    pub fn with_refresh(mut self, refresh: RefreshPolicy) -> Self {
        self.refresh = Some(refresh);
        self
    }
}
