//! Engine configuration module
//!
//! Handles loading and validating engine settings from environment variables.

use serde::Deserialize;

use crate::error::{EngineError, EngineResult};

/// Engine settings controlling catalog scoping and migration behavior
#[derive(Debug, Clone, Deserialize)]
pub struct EngineSettings {
    /// Schema name used to scope hypertable catalog lookups. When `None`,
    /// the catalog checks run without a schema restriction.
    pub schema_name: Option<String>,
    /// Selects the fresh-table strategy when converting a populated table
    /// into a hypertable. The strategy is intentionally unimplemented and
    /// fails with `NotSupported` when selected.
    pub migrate_with_fresh_table: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            schema_name: None,
            migrate_with_fresh_table: false,
        }
    }
}

impl EngineSettings {
    /// Load settings from environment variables
    pub fn load() -> EngineResult<Self> {
        // Load .env file if it exists (ignore errors if file not found)
        let _ = dotenvy::dotenv();

        let schema_name = std::env::var("TIMESCALE_SCHEMA_NAME")
            .ok()
            .filter(|s| !s.is_empty());

        let migrate_with_fresh_table = match std::env::var("TIMESCALE_MIGRATE_WITH_FRESH_TABLE") {
            Ok(v) => parse_bool(&v).ok_or_else(|| {
                EngineError::Config(format!(
                    "TIMESCALE_MIGRATE_WITH_FRESH_TABLE must be a boolean, got '{}'",
                    v
                ))
            })?,
            Err(_) => EngineSettings::default().migrate_with_fresh_table,
        };

        Ok(Self {
            schema_name,
            migrate_with_fresh_table,
        })
    }

    /// Builder-style override for the catalog schema scope
    pub fn with_schema_name(mut self, schema: impl Into<String>) -> Self {
        self.schema_name = Some(schema.into());
        self
    }

    /// Builder-style override for the fresh-table migration switch
    pub fn with_migrate_with_fresh_table(mut self, enabled: bool) -> Self {
        self.migrate_with_fresh_table = enabled;
        self
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
