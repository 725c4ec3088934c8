//! Lifecycle orchestrator
//!
//! The three entry points invoked by the surrounding migration framework,
//! plus maintenance operations over existing hypertables. Each entry point
//! decides the ordered statement list for one migration step and issues it
//! sequentially through the execution adapter; the first failure aborts the
//! remaining statements and surfaces to the caller.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::config::EngineSettings;
use crate::ddl::params::{
    compression_params, compression_policy_params, continuous_aggregate_params,
    continuous_aggregate_policy_params, decompress_params, remove_policy_params,
    retention_policy_params,
};
use crate::ddl::quote::{bool_literal, quote_ident, quote_literal};
use crate::ddl::template::{ParamMap, TemplateId};
use crate::ddl::{MigrationReport, RenderedStatement};
use crate::engine::assertions::{assert_is_hypertable, assert_is_not_hypertable};
use crate::engine::executor::Executor;
use crate::error::{not_supported, schema_invariant, EngineResult};
use crate::interval::Interval;
use crate::model::{
    ColumnDescriptor, CompressionPolicy, ContinuousAggregateDefinition, RetentionPolicy,
    TableDescriptor,
};

/// The schema lifecycle engine. Holds no state across invocations: every
/// call is a function of (live catalog state, inputs, clock).
pub struct SchemaEngine<E: Executor> {
    executor: E,
    settings: EngineSettings,
    clock: fn() -> DateTime<Utc>,
}

impl<E: Executor> SchemaEngine<E> {
    pub fn new(executor: E, settings: EngineSettings) -> Self {
        Self {
            executor,
            settings,
            clock: Utc::now,
        }
    }

    /// Replace the clock, keeping renderers deterministic in tests.
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    /// Invoked after the framework creates the table. Converts the table to
    /// a hypertable when a partition time column is declared, then attaches
    /// compression, continuous aggregate, and retention in that order:
    /// compression precedes any materialization that may read chunks, and
    /// retention requires the hypertable to exist.
    pub async fn on_create_table(&self, table: &TableDescriptor) -> EngineResult<MigrationReport> {
        let mut report = MigrationReport::new("create_table", &table.name, (self.clock)());
        if let Some(column) = &table.time_column {
            if let Some(interval) = column.partition_interval() {
                // No pre-existing rows on first creation.
                self.convert_to_hypertable(table, &column.name, interval, false, &mut report)
                    .await?;
            }
        }
        if let Some(compression) = &table.compression {
            self.enable_compression_inner(table, compression, &mut report)
                .await?;
        }
        if let Some(cagg) = &table.continuous_aggregate {
            self.create_continuous_aggregate(table, cagg, &mut report)
                .await?;
        }
        if let Some(retention) = &table.retention {
            self.add_retention_policy(table, retention, &mut report)
                .await?;
        }
        info!(
            table = %table.name,
            statements = report.statements.len(),
            "create-table lifecycle complete"
        );
        Ok(report)
    }

    /// Invoked after the framework adds a column. A newly added partition
    /// time column converts the table with `migrate_data => true`, since
    /// existing rows must move into chunks.
    pub async fn on_add_column(
        &self,
        table: &TableDescriptor,
        new_column: &ColumnDescriptor,
    ) -> EngineResult<MigrationReport> {
        let mut report = MigrationReport::new("add_column", &table.name, (self.clock)());
        if let Some(interval) = new_column.partition_interval() {
            self.convert_to_hypertable(table, &new_column.name, interval, true, &mut report)
                .await?;
        } else {
            debug!(table = %table.name, column = %new_column.name, "not a time column, nothing to do");
        }
        Ok(report)
    }

    /// Invoked after the framework alters a column. Three cases:
    /// a plain column becoming a time column converts the table with data
    /// migration; a time column whose interval changed gets a chunk-interval
    /// update; anything else is a no-op.
    pub async fn on_alter_column(
        &self,
        table: &TableDescriptor,
        old_column: &ColumnDescriptor,
        new_column: &ColumnDescriptor,
    ) -> EngineResult<MigrationReport> {
        let mut report = MigrationReport::new("alter_column", &table.name, (self.clock)());
        match (
            old_column.partition_interval(),
            new_column.partition_interval(),
        ) {
            (None, Some(interval)) => {
                self.convert_to_hypertable(table, &new_column.name, interval, true, &mut report)
                    .await?;
            }
            (Some(old_interval), Some(new_interval)) if old_interval != new_interval => {
                self.set_chunk_time_interval(table, new_interval, &mut report)
                    .await?;
            }
            _ => {
                debug!(
                    table = %table.name,
                    column = %new_column.name,
                    "no partitioning change, nothing to do"
                );
            }
        }
        Ok(report)
    }

    /// Unpartitioned -> Partitioned transition: assert the table is not a
    /// hypertable yet, drop the framework-assigned single-column primary key
    /// (the partition column must participate in any primary key), then
    /// register the hypertable.
    async fn convert_to_hypertable(
        &self,
        table: &TableDescriptor,
        column: &str,
        interval: Interval,
        migrate_data: bool,
        report: &mut MigrationReport,
    ) -> EngineResult<()> {
        if migrate_data && self.settings.migrate_with_fresh_table {
            return Err(not_supported(
                "migrating existing rows through a fresh table is not implemented",
            ));
        }
        let assertion = assert_is_not_hypertable(
            &self.executor,
            table,
            self.settings.schema_name.as_deref(),
        )
        .await?;
        report.record(assertion);

        let mut params = ParamMap::new();
        params.insert("table".to_string(), self.table_ident(table));
        params.insert(
            "constraint".to_string(),
            quote_ident(&format!("{}_pkey", table.name)),
        );
        self.run(TemplateId::DropPrimaryKey, params, report).await?;

        let mut params = ParamMap::new();
        params.insert("table".to_string(), self.table_literal(table));
        params.insert("partition_column".to_string(), quote_literal(column));
        params.insert(
            "interval".to_string(),
            quote_literal(&interval.as_literal()),
        );
        params.insert("migrate".to_string(), bool_literal(migrate_data).to_string());
        self.run(TemplateId::CreateHypertable, params, report).await?;
        info!(table = %table.name, column, migrate_data, "hypertable created");
        Ok(())
    }

    /// Partitioned-only transition: update the chunking width for future
    /// chunks. Does not re-create the hypertable.
    async fn set_chunk_time_interval(
        &self,
        table: &TableDescriptor,
        interval: Interval,
        report: &mut MigrationReport,
    ) -> EngineResult<()> {
        let assertion = assert_is_hypertable(
            &self.executor,
            table,
            self.settings.schema_name.as_deref(),
        )
        .await?;
        report.record(assertion);

        let mut params = ParamMap::new();
        params.insert("table".to_string(), self.table_literal(table));
        params.insert(
            "interval".to_string(),
            quote_literal(&interval.as_literal()),
        );
        self.run(TemplateId::SetChunkTimeInterval, params, report)
            .await?;
        info!(table = %table.name, interval = %interval, "chunk time interval updated");
        Ok(())
    }

    async fn enable_compression_inner(
        &self,
        table: &TableDescriptor,
        policy: &CompressionPolicy,
        report: &mut MigrationReport,
    ) -> EngineResult<()> {
        let params = compression_params(&self.table_ident(table), policy);
        self.run(TemplateId::EnableCompression, params, report)
            .await?;
        if let Some(compress_after) = policy.compress_after {
            let params =
                compression_policy_params(&self.table_literal(table), policy, compress_after);
            self.run(TemplateId::AddCompressionPolicy, params, report)
                .await?;
        }
        Ok(())
    }

    async fn create_continuous_aggregate(
        &self,
        table: &TableDescriptor,
        cagg: &ContinuousAggregateDefinition,
        report: &mut MigrationReport,
    ) -> EngineResult<()> {
        let params = continuous_aggregate_params(&self.table_ident(table), cagg);
        self.run(TemplateId::CreateContinuousAggregate, params, report)
            .await?;
        if let Some(refresh) = &cagg.refresh {
            let params = continuous_aggregate_policy_params(&self.table_literal(table), refresh);
            self.run(TemplateId::AddContinuousAggregatePolicy, params, report)
                .await?;
        }
        Ok(())
    }

    async fn add_retention_policy(
        &self,
        table: &TableDescriptor,
        policy: &RetentionPolicy,
        report: &mut MigrationReport,
    ) -> EngineResult<()> {
        let params = retention_policy_params(&self.table_literal(table), policy);
        self.run(TemplateId::AddRetentionPolicy, params, report)
            .await
    }

    /// Re-issue the compression declaration for an existing hypertable.
    pub async fn enable_compression(
        &self,
        table: &TableDescriptor,
        policy: &CompressionPolicy,
    ) -> EngineResult<MigrationReport> {
        let mut report = MigrationReport::new("enable_compression", &table.name, (self.clock)());
        self.enable_compression_inner(table, policy, &mut report)
            .await?;
        Ok(report)
    }

    /// Turn columnar compression off for the table.
    pub async fn disable_compression(
        &self,
        table: &TableDescriptor,
    ) -> EngineResult<MigrationReport> {
        let mut report = MigrationReport::new("disable_compression", &table.name, (self.clock)());
        let mut params = ParamMap::new();
        params.insert("table".to_string(), self.table_ident(table));
        self.run(TemplateId::DisableCompression, params, &mut report)
            .await?;
        Ok(report)
    }

    /// Drop the background compression job.
    pub async fn remove_compression_policy(
        &self,
        table: &TableDescriptor,
        if_exists: bool,
    ) -> EngineResult<MigrationReport> {
        let mut report =
            MigrationReport::new("remove_compression_policy", &table.name, (self.clock)());
        self.run(
            TemplateId::RemoveCompressionPolicy,
            remove_policy_params(&self.table_literal(table), if_exists),
            &mut report,
        )
        .await?;
        Ok(report)
    }

    /// Drop the background retention job.
    pub async fn remove_retention_policy(
        &self,
        table: &TableDescriptor,
        if_exists: bool,
    ) -> EngineResult<MigrationReport> {
        let mut report =
            MigrationReport::new("remove_retention_policy", &table.name, (self.clock)());
        self.run(
            TemplateId::RemoveRetentionPolicy,
            remove_policy_params(&self.table_literal(table), if_exists),
            &mut report,
        )
        .await?;
        Ok(report)
    }

    /// Decompress chunks of the table, optionally bounded by age.
    pub async fn decompress_chunks(
        &self,
        table: &TableDescriptor,
        older_than: Option<Interval>,
        newer_than: Option<Interval>,
    ) -> EngineResult<MigrationReport> {
        let mut report = MigrationReport::new("decompress_chunks", &table.name, (self.clock)());
        let params = decompress_params(&self.table_literal(table), older_than, newer_than);
        self.run(TemplateId::DecompressChunks, params, &mut report)
            .await?;
        Ok(report)
    }

    /// Pause or resume a background job by id.
    pub async fn set_job_scheduled(
        &self,
        job_id: i64,
        scheduled: bool,
    ) -> EngineResult<MigrationReport> {
        let mut report =
            MigrationReport::new("set_job_scheduled", &job_id.to_string(), (self.clock)());
        let mut params = ParamMap::new();
        params.insert("job_id".to_string(), job_id.to_string());
        params.insert("scheduled".to_string(), bool_literal(scheduled).to_string());
        self.run(TemplateId::AlterJobScheduled, params, &mut report)
            .await?;
        Ok(report)
    }

    /// Refresh the table's continuous aggregate over an explicit window.
    /// `end` defaults to the injected clock's now; `start` defaults to `end`
    /// minus twice the view's bucket interval, the minimum span that is
    /// guaranteed to cover a whole bucket.
    pub async fn refresh_continuous_aggregate(
        &self,
        table: &TableDescriptor,
        window_start: Option<DateTime<Utc>>,
        window_end: Option<DateTime<Utc>>,
    ) -> EngineResult<MigrationReport> {
        let cagg = table
            .continuous_aggregate
            .as_ref()
            .ok_or_else(|| schema_invariant(&table.name, "should declare a continuous aggregate"))?;
        let end = window_end.unwrap_or_else(self.clock);
        let start = window_start.unwrap_or_else(|| end - cagg.bucket_interval.to_duration() * 2);

        let mut report =
            MigrationReport::new("refresh_continuous_aggregate", &table.name, (self.clock)());
        let mut params = ParamMap::new();
        params.insert("table".to_string(), self.table_literal(table));
        params.insert("window_start".to_string(), quote_literal(&start.to_rfc3339()));
        params.insert("window_end".to_string(), quote_literal(&end.to_rfc3339()));
        self.run(TemplateId::RefreshContinuousAggregate, params, &mut report)
            .await?;
        Ok(report)
    }

    async fn run(
        &self,
        template: TemplateId,
        params: ParamMap,
        report: &mut MigrationReport,
    ) -> EngineResult<()> {
        let sql = template.render(&params)?;
        debug!(template = template.name(), %sql, "issuing DDL");
        self.executor.execute(&sql).await?;
        report.record(RenderedStatement::new(template.name(), sql, params));
        Ok(())
    }

    /// Identifier form for ALTER TABLE / CREATE MATERIALIZED VIEW targets.
    fn table_ident(&self, table: &TableDescriptor) -> String {
        match table.schema.as_deref().or(self.settings.schema_name.as_deref()) {
            Some(schema) => format!("{}.{}", quote_ident(schema), quote_ident(&table.name)),
            None => quote_ident(&table.name),
        }
    }

    /// Literal form for regclass arguments of extension procedures.
    fn table_literal(&self, table: &TableDescriptor) -> String {
        match table.schema.as_deref().or(self.settings.schema_name.as_deref()) {
            Some(schema) => quote_literal(&format!("{}.{}", schema, table.name)),
            None => quote_literal(&table.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::executor::RecordingExecutor;
    use crate::error::EngineError;
    use crate::interval::IntervalUnit;
    use crate::model::{RefreshPolicy, SchedulePolicy};
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn engine(rec: &RecordingExecutor) -> SchemaEngine<&RecordingExecutor> {
        SchemaEngine::new(rec, EngineSettings::default())
    }

    fn metrics_with_time(interval: Interval) -> TableDescriptor {
        TableDescriptor::new("metrics").with_time_column(ColumnDescriptor::time("time", interval))
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_create_without_time_column_issues_nothing() {
        let rec = RecordingExecutor::new();
        let report = engine(&rec)
            .on_create_table(&TableDescriptor::new("events"))
            .await
            .unwrap();
        assert!(report.statements.is_empty());
        assert!(rec.statements().is_empty());
    }

    #[tokio::test]
    async fn test_create_with_time_column_issues_exactly_three_statements() {
        let rec = RecordingExecutor::new();
        let table = metrics_with_time(Interval::new(1, IntervalUnit::Day));
        let report = engine(&rec).on_create_table(&table).await.unwrap();
        assert_eq!(
            report.sql(),
            vec![
                "DO $do$ BEGIN IF EXISTS (SELECT * FROM timescaledb_information.hypertables \
                 WHERE hypertable_name = 'metrics') \
                 THEN RAISE EXCEPTION 'assert failed - metrics should not be a hyper table'; \
                 ELSE NULL; END IF; END; $do$",
                "ALTER TABLE \"metrics\" DROP CONSTRAINT \"metrics_pkey\"",
                "SELECT create_hypertable('metrics', 'time', \
                 chunk_time_interval => interval '1 day', migrate_data => false)",
            ]
        );
        assert_eq!(rec.statements(), report.sql());
    }

    #[tokio::test]
    async fn test_add_time_column_migrates_existing_rows() {
        let rec = RecordingExecutor::new();
        let table = TableDescriptor::new("metrics");
        let column = ColumnDescriptor::time("time", Interval::new(2, IntervalUnit::Hour));
        let report = engine(&rec).on_add_column(&table, &column).await.unwrap();
        assert_eq!(report.statements.len(), 3);
        assert_eq!(
            report.sql()[2],
            "SELECT create_hypertable('metrics', 'time', \
             chunk_time_interval => interval '2 hours', migrate_data => true)"
        );
    }

    #[tokio::test]
    async fn test_add_plain_column_issues_nothing() {
        let rec = RecordingExecutor::new();
        let report = engine(&rec)
            .on_add_column(
                &TableDescriptor::new("metrics"),
                &ColumnDescriptor::plain("region"),
            )
            .await
            .unwrap();
        assert!(report.statements.is_empty());
    }

    #[tokio::test]
    async fn test_alter_to_time_column_converts_with_migration() {
        let rec = RecordingExecutor::new();
        let table = TableDescriptor::new("metrics");
        let old = ColumnDescriptor::plain("time");
        let new = ColumnDescriptor::time("time", Interval::new(1, IntervalUnit::Day));
        let report = engine(&rec)
            .on_alter_column(&table, &old, &new)
            .await
            .unwrap();
        assert_eq!(report.statements.len(), 3);
        assert!(report.sql()[2].contains("migrate_data => true"));
    }

    #[tokio::test]
    async fn test_alter_interval_change_issues_exactly_two_statements() {
        let rec = RecordingExecutor::new();
        let table = TableDescriptor::new("metrics");
        let old = ColumnDescriptor::time("time", Interval::new(1, IntervalUnit::Hour));
        let new = ColumnDescriptor::time("time", Interval::new(2, IntervalUnit::Hour));
        let report = engine(&rec)
            .on_alter_column(&table, &old, &new)
            .await
            .unwrap();
        assert_eq!(
            report.sql(),
            vec![
                "DO $do$ BEGIN IF EXISTS (SELECT * FROM timescaledb_information.hypertables \
                 WHERE hypertable_name = 'metrics') THEN NULL; \
                 ELSE RAISE EXCEPTION 'assert failed - metrics should be a hyper table'; \
                 END IF; END; $do$",
                "SELECT set_chunk_time_interval('metrics', interval '2 hours')",
            ]
        );
    }

    #[tokio::test]
    async fn test_alter_with_equal_intervals_issues_nothing() {
        let rec = RecordingExecutor::new();
        let table = TableDescriptor::new("metrics");
        let old = ColumnDescriptor::time("time", Interval::new(1, IntervalUnit::Hour));
        let new = ColumnDescriptor::time("time", Interval::new(1, IntervalUnit::Hour));
        let report = engine(&rec)
            .on_alter_column(&table, &old, &new)
            .await
            .unwrap();
        assert!(report.statements.is_empty());
    }

    #[tokio::test]
    async fn test_alter_between_plain_columns_issues_nothing() {
        let rec = RecordingExecutor::new();
        let report = engine(&rec)
            .on_alter_column(
                &TableDescriptor::new("metrics"),
                &ColumnDescriptor::plain("value"),
                &ColumnDescriptor::plain("value"),
            )
            .await
            .unwrap();
        assert!(report.statements.is_empty());
    }

    #[tokio::test]
    async fn test_create_orders_conversion_compression_aggregate_retention() {
        let rec = RecordingExecutor::new();
        let table = metrics_with_time(Interval::new(1, IntervalUnit::Day))
            .with_compression(CompressionPolicy::default().with_segment_by(&["device_id"]))
            .with_continuous_aggregate(ContinuousAggregateDefinition::new(
                "SELECT time_bucket('1 day', time) AS bucket, avg(value) \
                 FROM metrics GROUP BY bucket",
                Interval::new(1, IntervalUnit::Day),
            ))
            .with_retention(RetentionPolicy::new(Interval::new(90, IntervalUnit::Day)));
        let report = engine(&rec).on_create_table(&table).await.unwrap();
        let templates: Vec<&str> = report
            .statements
            .iter()
            .map(|s| s.template.as_str())
            .collect();
        assert_eq!(
            templates,
            vec![
                "assert_is_not_hypertable",
                "drop_primary_key",
                "create_hypertable",
                "enable_compression",
                "create_continuous_aggregate",
                "add_retention_policy",
            ]
        );
    }

    #[tokio::test]
    async fn test_compression_schedule_adds_policy_call() {
        let rec = RecordingExecutor::new();
        let table = metrics_with_time(Interval::new(1, IntervalUnit::Day)).with_compression(
            CompressionPolicy::default()
                .with_order_by(&["device", "-time"])
                .with_compress_after(Interval::new(7, IntervalUnit::Day))
                .with_schedule(SchedulePolicy {
                    schedule_interval: Some(Interval::new(1, IntervalUnit::Day)),
                    initial_start: None,
                    timezone: None,
                    if_not_exists: true,
                }),
        );
        let report = engine(&rec).on_create_table(&table).await.unwrap();
        assert_eq!(
            report.sql()[3],
            "ALTER TABLE \"metrics\" SET (timescaledb.compress = true, \
             compress_orderby = 'device ASC,time DESC')"
        );
        assert_eq!(
            report.sql()[4],
            "SELECT add_compression_policy('metrics', compress_after => interval '7 days', \
             schedule_interval => interval '1 day', if_not_exists => true)"
        );
    }

    #[tokio::test]
    async fn test_retention_statement_shape() {
        let rec = RecordingExecutor::new();
        let table = TableDescriptor::new("metrics").with_retention(
            RetentionPolicy::new(Interval::new(90, IntervalUnit::Day)).with_schedule(
                SchedulePolicy {
                    schedule_interval: None,
                    initial_start: None,
                    timezone: Some("UTC".to_string()),
                    if_not_exists: true,
                },
            ),
        );
        let report = engine(&rec).on_create_table(&table).await.unwrap();
        assert_eq!(
            report.sql(),
            vec![
                "SELECT add_retention_policy('metrics', drop_after => interval '90 days', \
                 timezone => 'UTC', if_not_exists => true)",
            ]
        );
    }

    #[tokio::test]
    async fn test_continuous_aggregate_view_statement_shape() {
        let rec = RecordingExecutor::new();
        let cagg = ContinuousAggregateDefinition::new(
            "SELECT time_bucket('1 hour', time) AS bucket, avg(value) \
             FROM metrics GROUP BY bucket",
            Interval::new(1, IntervalUnit::Hour),
        )
        .with_no_data()
        .with_refresh(RefreshPolicy {
            start_offset: Some(Interval::new(1, IntervalUnit::Day)),
            end_offset: None,
            schedule: SchedulePolicy {
                schedule_interval: Some(Interval::new(1, IntervalUnit::Hour)),
                initial_start: None,
                timezone: None,
                if_not_exists: true,
            },
        });
        let table = TableDescriptor::new("metrics_hourly").with_continuous_aggregate(cagg);
        let report = engine(&rec).on_create_table(&table).await.unwrap();
        assert_eq!(
            report.sql(),
            vec![
                "CREATE MATERIALIZED VIEW \"metrics_hourly\" WITH (timescaledb.continuous) \
                 AS SELECT time_bucket('1 hour', time) AS bucket, avg(value) \
                 FROM metrics GROUP BY bucket WITH NO DATA",
                "SELECT add_continuous_aggregate_policy('metrics_hourly', \
                 start_offset => interval '1 day', end_offset => NULL, \
                 schedule_interval => interval '1 hour', if_not_exists => true)",
            ]
        );
    }

    #[tokio::test]
    async fn test_schema_scope_qualifies_identifiers_and_literals() {
        let rec = RecordingExecutor::new();
        let settings = EngineSettings::default().with_schema_name("tenant_a");
        let table = metrics_with_time(Interval::new(1, IntervalUnit::Day));
        let report = SchemaEngine::new(&rec, settings)
            .on_create_table(&table)
            .await
            .unwrap();
        assert!(report.sql()[0].contains("hypertable_schema = 'tenant_a'"));
        assert_eq!(
            report.sql()[1],
            "ALTER TABLE \"tenant_a\".\"metrics\" DROP CONSTRAINT \"metrics_pkey\""
        );
        assert!(report.sql()[2].starts_with("SELECT create_hypertable('tenant_a.metrics',"));
    }

    #[tokio::test]
    async fn test_fresh_table_migration_fails_fast() {
        let rec = RecordingExecutor::new();
        let settings = EngineSettings::default().with_migrate_with_fresh_table(true);
        let table = TableDescriptor::new("metrics");
        let column = ColumnDescriptor::time("time", Interval::new(1, IntervalUnit::Day));
        let err = SchemaEngine::new(&rec, settings)
            .on_add_column(&table, &column)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::NotSupported(_)));
        assert!(rec.statements().is_empty());
    }

    #[tokio::test]
    async fn test_failed_assertion_aborts_remaining_statements() {
        let rec = RecordingExecutor::new();
        rec.fail_matching("DO $do$", Some("P0001"), "assert failed");
        let table = metrics_with_time(Interval::new(1, IntervalUnit::Day))
            .with_retention(RetentionPolicy::new(Interval::new(90, IntervalUnit::Day)));
        let err = engine(&rec).on_create_table(&table).await.unwrap_err();
        assert!(matches!(err, EngineError::SchemaInvariant { .. }));
        assert!(rec.statements().is_empty());
    }

    #[tokio::test]
    async fn test_entry_points_are_deterministic() {
        let table = metrics_with_time(Interval::new(1, IntervalUnit::Day))
            .with_compression(CompressionPolicy::default().with_order_by(&["-time"]));
        let rec = RecordingExecutor::new();
        let eng = engine(&rec);
        let first = eng.on_create_table(&table).await.unwrap();
        let second = eng.on_create_table(&table).await.unwrap();
        assert_eq!(first.sql(), second.sql());
        assert_eq!(first.statements[0].params, second.statements[0].params);
    }

    #[tokio::test]
    async fn test_refresh_defaults_to_twice_the_bucket_interval() {
        let rec = RecordingExecutor::new();
        let cagg = ContinuousAggregateDefinition::new(
            "SELECT 1",
            Interval::new(2, IntervalUnit::Day),
        );
        let table = TableDescriptor::new("metrics_2day").with_continuous_aggregate(cagg);
        let eng = engine(&rec).with_clock(fixed_now);
        let report = eng
            .refresh_continuous_aggregate(&table, None, None)
            .await
            .unwrap();
        assert_eq!(
            report.sql(),
            vec![
                "CALL refresh_continuous_aggregate('metrics_2day', \
                 '2025-05-28T12:00:00+00:00', '2025-06-01T12:00:00+00:00')",
            ]
        );
    }

    #[tokio::test]
    async fn test_refresh_without_aggregate_is_an_invariant_error() {
        let rec = RecordingExecutor::new();
        let err = engine(&rec)
            .refresh_continuous_aggregate(&TableDescriptor::new("metrics"), None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::SchemaInvariant { .. }));
    }

    #[tokio::test]
    async fn test_maintenance_statement_shapes() {
        let rec = RecordingExecutor::new();
        let eng = engine(&rec);
        let table = TableDescriptor::new("metrics");

        let report = eng.disable_compression(&table).await.unwrap();
        assert_eq!(
            report.sql(),
            vec!["ALTER TABLE \"metrics\" SET (timescaledb.compress = false)"]
        );

        let report = eng.remove_compression_policy(&table, true).await.unwrap();
        assert_eq!(
            report.sql(),
            vec!["SELECT remove_compression_policy('metrics', if_exists => true)"]
        );

        let report = eng.remove_retention_policy(&table, false).await.unwrap();
        assert_eq!(
            report.sql(),
            vec!["SELECT remove_retention_policy('metrics')"]
        );

        let report = eng
            .decompress_chunks(&table, Some(Interval::new(30, IntervalUnit::Day)), None)
            .await
            .unwrap();
        assert_eq!(
            report.sql(),
            vec![
                "SELECT decompress_chunk(c, true) \
                 FROM show_chunks('metrics', older_than => interval '30 days') c",
            ]
        );

        let report = eng.set_job_scheduled(1007, false).await.unwrap();
        assert_eq!(report.sql(), vec!["SELECT alter_job(1007, scheduled => false)"]);
    }
}
