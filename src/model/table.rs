//! Table descriptors

use serde::{Deserialize, Serialize};

use crate::model::column::ColumnDescriptor;
use crate::model::policy::{CompressionPolicy, ContinuousAggregateDefinition, RetentionPolicy};

/// Resolved table descriptor supplied to every orchestrator entry point.
/// The name is immutable once any policy references it; the engine never
/// persists descriptors between invocations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableDescriptor {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    /// The partition time column declared on the table, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_column: Option<ColumnDescriptor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compression: Option<CompressionPolicy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retention: Option<RetentionPolicy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub continuous_aggregate: Option<ContinuousAggregateDefinition>,
}

impl TableDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: None,
            time_column: None,
            compression: None,
            retention: None,
            continuous_aggregate: None,
        }
    }

    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn with_time_column(mut self, column: ColumnDescriptor) -> Self {
        self.time_column = Some(column);
        self
    }

    pub fn with_compression(mut self, policy: CompressionPolicy) -> Self {
        self.compression = Some(policy);
        self
    }

    pub fn with_retention(mut self, policy: RetentionPolicy) -> Self {
        self.retention = Some(policy);
        self
    }

    pub fn with_continuous_aggregate(mut self, cagg: ContinuousAggregateDefinition) -> Self {
        self.continuous_aggregate = Some(cagg);
        self
    }
}
