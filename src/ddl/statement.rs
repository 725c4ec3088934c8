//! Rendered statements and execution reports

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ddl::template::ParamMap;

/// A fully rendered SQL statement plus the parameter map that produced it,
/// kept for auditing and testing. Ephemeral: built per operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedStatement {
    pub template: String,
    pub sql: String,
    pub params: ParamMap,
}

impl RenderedStatement {
    pub fn new(template: &str, sql: String, params: ParamMap) -> Self {
        Self {
            template: template.to_string(),
            sql,
            params,
        }
    }
}

/// Audit record of one orchestrator entry-point invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationReport {
    pub id: Uuid,
    pub entry_point: String,
    pub table: String,
    pub statements: Vec<RenderedStatement>,
    pub executed_at: DateTime<Utc>,
}

impl MigrationReport {
    pub fn new(entry_point: &str, table: &str, executed_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            entry_point: entry_point.to_string(),
            table: table.to_string(),
            statements: Vec::new(),
            executed_at,
        }
    }

    pub fn record(&mut self, statement: RenderedStatement) {
        self.statements.push(statement);
    }

    /// SQL strings in issue order
    pub fn sql(&self) -> Vec<&str> {
        self.statements.iter().map(|s| s.sql.as_str()).collect()
    }
}
