//! Column descriptors
//!
//! Column kind is an explicit tagged variant inspected directly by the
//! orchestrator.

use serde::{Deserialize, Serialize};

use crate::interval::Interval;

/// Kind of a column as seen by the lifecycle engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ColumnKind {
    /// An ordinary column; the engine never acts on these.
    Plain,
    /// A time column carrying the chunking interval. `partition_key` marks
    /// it as the hypertable partition column; a table has at most one.
    Time {
        interval: Interval,
        partition_key: bool,
    },
}

/// Resolved column descriptor supplied by the migration framework
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub name: String,
    #[serde(flatten)]
    pub kind: ColumnKind,
}

impl ColumnDescriptor {
    /// An ordinary column
    pub fn plain(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ColumnKind::Plain,
        }
    }

    /// A time column acting as the hypertable partition key
    pub fn time(name: impl Into<String>, interval: Interval) -> Self {
        Self {
            name: name.into(),
            kind: ColumnKind::Time {
                interval,
                partition_key: true,
            },
        }
    }

    /// The chunking interval when this is a partition time column
    pub fn partition_interval(&self) -> Option<Interval> {
        match self.kind {
            ColumnKind::Time {
                interval,
                partition_key: true,
            } => Some(interval),
            _ => None,
        }
    }

    pub fn is_partition_time(&self) -> bool {
        self.partition_interval().is_some()
    }
}
