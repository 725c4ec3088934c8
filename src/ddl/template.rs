//! DDL template catalog
//!
//! The canonical text of every statement the engine can issue, with `{name}`
//! placeholders filled from a parameter map. Procedure names and argument
//! order match the TimescaleDB extension exactly; a missing parameter is a
//! programming error surfaced as `EngineError::Template`.

use std::collections::BTreeMap;

use crate::error::{EngineError, EngineResult};

/// Named parameters for one template rendering. Ordered map so audit output
/// is deterministic.
pub type ParamMap = BTreeMap<String, String>;

/// Identifier of a DDL template in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateId {
    AssertIsHypertable,
    AssertIsNotHypertable,
    CreateHypertable,
    DropPrimaryKey,
    SetChunkTimeInterval,
    EnableCompression,
    DisableCompression,
    AddCompressionPolicy,
    RemoveCompressionPolicy,
    AddRetentionPolicy,
    RemoveRetentionPolicy,
    CreateContinuousAggregate,
    AddContinuousAggregatePolicy,
    RefreshContinuousAggregate,
    DecompressChunks,
    AlterJobScheduled,
}

impl TemplateId {
    pub fn name(self) -> &'static str {
        match self {
            TemplateId::AssertIsHypertable => "assert_is_hypertable",
            TemplateId::AssertIsNotHypertable => "assert_is_not_hypertable",
            TemplateId::CreateHypertable => "create_hypertable",
            TemplateId::DropPrimaryKey => "drop_primary_key",
            TemplateId::SetChunkTimeInterval => "set_chunk_time_interval",
            TemplateId::EnableCompression => "enable_compression",
            TemplateId::DisableCompression => "disable_compression",
            TemplateId::AddCompressionPolicy => "add_compression_policy",
            TemplateId::RemoveCompressionPolicy => "remove_compression_policy",
            TemplateId::AddRetentionPolicy => "add_retention_policy",
            TemplateId::RemoveRetentionPolicy => "remove_retention_policy",
            TemplateId::CreateContinuousAggregate => "create_continuous_aggregate",
            TemplateId::AddContinuousAggregatePolicy => "add_continuous_aggregate_policy",
            TemplateId::RefreshContinuousAggregate => "refresh_continuous_aggregate",
            TemplateId::DecompressChunks => "decompress_chunks",
            TemplateId::AlterJobScheduled => "alter_job_scheduled",
        }
    }

    /// Canonical template text
    pub fn text(self) -> &'static str {
        match self {
            // Check-then-act guards folded into a single DO block so the
            // catalog check and the raise happen in one statement.
            TemplateId::AssertIsHypertable => {
                "DO $do$ BEGIN \
                 IF EXISTS (SELECT * FROM timescaledb_information.hypertables \
                 WHERE hypertable_name = {table}{extra_condition}) THEN NULL; \
                 ELSE RAISE EXCEPTION {error_message}; \
                 END IF; END; $do$"
            }
            TemplateId::AssertIsNotHypertable => {
                "DO $do$ BEGIN \
                 IF EXISTS (SELECT * FROM timescaledb_information.hypertables \
                 WHERE hypertable_name = {table}{extra_condition}) \
                 THEN RAISE EXCEPTION {error_message}; \
                 ELSE NULL; \
                 END IF; END; $do$"
            }
            TemplateId::CreateHypertable => {
                "SELECT create_hypertable({table}, {partition_column}, \
                 chunk_time_interval => interval {interval}, \
                 migrate_data => {migrate})"
            }
            TemplateId::DropPrimaryKey => "ALTER TABLE {table} DROP CONSTRAINT {constraint}",
            TemplateId::SetChunkTimeInterval => {
                "SELECT set_chunk_time_interval({table}, interval {interval})"
            }
            TemplateId::EnableCompression => {
                "ALTER TABLE {table} SET (timescaledb.compress = {enable}\
                 {order_by}{segment_by}{chunk_time_interval})"
            }
            TemplateId::DisableCompression => {
                "ALTER TABLE {table} SET (timescaledb.compress = false)"
            }
            TemplateId::AddCompressionPolicy => {
                "SELECT add_compression_policy({table}, \
                 compress_after => interval {compress_after}\
                 {schedule_interval}{initial_start}{timezone}{if_not_exists}\
                 {compress_created_before})"
            }
            TemplateId::RemoveCompressionPolicy => {
                "SELECT remove_compression_policy({table}{if_exists})"
            }
            TemplateId::AddRetentionPolicy => {
                "SELECT add_retention_policy({table}, \
                 drop_after => interval {drop_after}\
                 {schedule_interval}{initial_start}{timezone}{if_not_exists}\
                 {drop_created_before})"
            }
            TemplateId::RemoveRetentionPolicy => {
                "SELECT remove_retention_policy({table}{if_exists})"
            }
            TemplateId::CreateContinuousAggregate => {
                "CREATE MATERIALIZED VIEW {table} \
                 WITH (timescaledb.continuous{timescaledb_options}) \
                 AS {definition}{with_no_data}"
            }
            TemplateId::AddContinuousAggregatePolicy => {
                "SELECT add_continuous_aggregate_policy({table}, \
                 start_offset => {start_offset}, end_offset => {end_offset}\
                 {schedule_interval}{initial_start}{timezone}{if_not_exists})"
            }
            TemplateId::RefreshContinuousAggregate => {
                "CALL refresh_continuous_aggregate({table}, {window_start}, {window_end})"
            }
            TemplateId::DecompressChunks => {
                "SELECT decompress_chunk(c, true) \
                 FROM show_chunks({table}{older_than}{newer_than}) c"
            }
            TemplateId::AlterJobScheduled => "SELECT alter_job({job_id}, scheduled => {scheduled})",
        }
    }

    /// Fill the template from `params`. Pure string substitution; every
    /// value is expected to be pre-quoted by the renderers.
    pub fn render(self, params: &ParamMap) -> EngineResult<String> {
        let text = self.text();
        let mut out = String::with_capacity(text.len());
        let mut rest = text;
        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let close = after.find('}').ok_or_else(|| EngineError::Template {
                template: self.name().to_string(),
                parameter: "<unclosed placeholder>".to_string(),
            })?;
            let key = &after[..close];
            let value = params.get(key).ok_or_else(|| EngineError::Template {
                template: self.name().to_string(),
                parameter: key.to_string(),
            })?;
            out.push_str(value);
            rest = &after[close + 1..];
        }
        out.push_str(rest);
        Ok(out)
    }
}
