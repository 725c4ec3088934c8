//! Policy renderers
//!
//! Pure functions mapping policy structs to the parameter maps the templates
//! consume. Every optional clause follows one omit-if-absent rule: unset
//! renders to an empty string, set renders to a fragment with its leading
//! separator, so any combination of present/absent fields concatenates into
//! valid SQL. No wall-clock reads happen here.

use chrono::{DateTime, Utc};

use crate::ddl::quote::{bool_literal, quote_literal};
use crate::ddl::template::ParamMap;
use crate::interval::Interval;
use crate::model::policy::{
    ColumnOrder, CompressionPolicy, ContinuousAggregateDefinition, RefreshPolicy, RetentionPolicy,
    SchedulePolicy,
};

fn insert(params: &mut ParamMap, key: &str, value: impl Into<String>) {
    params.insert(key.to_string(), value.into());
}

/// Order-by entries render with an explicit direction on every column,
/// never a bare name, so backend default sort order never matters.
fn order_by_fragment(order_by: &[ColumnOrder]) -> String {
    let entries: Vec<String> = order_by
        .iter()
        .map(|o| {
            if o.descending {
                format!("{} DESC", o.column)
            } else {
                format!("{} ASC", o.column)
            }
        })
        .collect();
    format!(", compress_orderby = {}", quote_literal(&entries.join(",")))
}

fn segment_by_fragment(segment_by: &[String]) -> String {
    format!(
        ", compress_segmentby = {}",
        quote_literal(&segment_by.join(","))
    )
}

fn interval_arg(name: &str, interval: Interval) -> String {
    format!(
        ", {} => interval {}",
        name,
        quote_literal(&interval.as_literal())
    )
}

fn timestamp_arg(name: &str, at: DateTime<Utc>) -> String {
    format!(", {} => {}", name, quote_literal(&at.to_rfc3339()))
}

/// Shared schedule fields, rendered identically for compression, retention,
/// and continuous-aggregate jobs.
fn schedule_params(params: &mut ParamMap, schedule: &SchedulePolicy) {
    insert(
        params,
        "schedule_interval",
        schedule
            .schedule_interval
            .map(|i| interval_arg("schedule_interval", i))
            .unwrap_or_default(),
    );
    insert(
        params,
        "initial_start",
        schedule
            .initial_start
            .map(|at| timestamp_arg("initial_start", at))
            .unwrap_or_default(),
    );
    insert(
        params,
        "timezone",
        schedule
            .timezone
            .as_deref()
            .map(|tz| format!(", timezone => {}", quote_literal(tz)))
            .unwrap_or_default(),
    );
    insert(
        params,
        "if_not_exists",
        if schedule.if_not_exists {
            ", if_not_exists => true".to_string()
        } else {
            String::new()
        },
    );
}

/// Parameters for the compression-enable ALTER TABLE
pub fn compression_params(table_ident: &str, policy: &CompressionPolicy) -> ParamMap {
    let mut params = ParamMap::new();
    insert(&mut params, "table", table_ident);
    insert(&mut params, "enable", bool_literal(policy.enable));
    insert(
        &mut params,
        "order_by",
        policy
            .order_by
            .as_deref()
            .map(order_by_fragment)
            .unwrap_or_default(),
    );
    insert(
        &mut params,
        "segment_by",
        policy
            .segment_by
            .as_deref()
            .map(segment_by_fragment)
            .unwrap_or_default(),
    );
    insert(
        &mut params,
        "chunk_time_interval",
        policy
            .chunk_time_interval
            .map(|i| {
                format!(
                    ", compress_chunk_time_interval = {}",
                    quote_literal(&i.as_literal())
                )
            })
            .unwrap_or_default(),
    );
    params
}

/// Parameters for add_compression_policy. `compress_after` must be present
/// on the policy; callers only reach this when a schedule is declared.
pub fn compression_policy_params(
    table_literal: &str,
    policy: &CompressionPolicy,
    compress_after: Interval,
) -> ParamMap {
    let mut params = ParamMap::new();
    insert(&mut params, "table", table_literal);
    insert(
        &mut params,
        "compress_after",
        quote_literal(&compress_after.as_literal()),
    );
    schedule_params(&mut params, &policy.schedule);
    insert(
        &mut params,
        "compress_created_before",
        policy
            .compress_created_before
            .map(|i| interval_arg("compress_created_before", i))
            .unwrap_or_default(),
    );
    params
}

/// Parameters for add_retention_policy
pub fn retention_policy_params(table_literal: &str, policy: &RetentionPolicy) -> ParamMap {
    let mut params = ParamMap::new();
    insert(&mut params, "table", table_literal);
    insert(
        &mut params,
        "drop_after",
        quote_literal(&policy.drop_after.as_literal()),
    );
    schedule_params(&mut params, &policy.schedule);
    insert(
        &mut params,
        "drop_created_before",
        if policy.drop_created_before {
            ", drop_created_before => true".to_string()
        } else {
            String::new()
        },
    );
    params
}

/// Parameters for the CREATE MATERIALIZED VIEW of a continuous aggregate
pub fn continuous_aggregate_params(
    view_ident: &str,
    cagg: &ContinuousAggregateDefinition,
) -> ParamMap {
    let mut params = ParamMap::new();
    insert(&mut params, "table", view_ident);
    let mut options = String::new();
    if let Some(materialized_only) = cagg.materialized_only {
        options.push_str(&format!(
            ", timescaledb.materialized_only = {}",
            bool_literal(materialized_only)
        ));
    }
    if let Some(create_group_indexes) = cagg.create_group_indexes {
        options.push_str(&format!(
            ", timescaledb.create_group_indexes = {}",
            bool_literal(create_group_indexes)
        ));
    }
    if let Some(finalized) = cagg.finalized {
        options.push_str(&format!(
            ", timescaledb.finalized = {}",
            bool_literal(finalized)
        ));
    }
    insert(&mut params, "timescaledb_options", options);
    insert(&mut params, "definition", cagg.definition.as_str());
    insert(
        &mut params,
        "with_no_data",
        if cagg.with_no_data {
            " WITH NO DATA".to_string()
        } else {
            String::new()
        },
    );
    params
}

/// Parameters for add_continuous_aggregate_policy. The procedure requires
/// start_offset and end_offset explicitly, so an unset offset renders as
/// NULL instead of being omitted.
pub fn continuous_aggregate_policy_params(
    view_literal: &str,
    refresh: &RefreshPolicy,
) -> ParamMap {
    let mut params = ParamMap::new();
    insert(&mut params, "table", view_literal);
    insert(&mut params, "start_offset", offset_value(refresh.start_offset));
    insert(&mut params, "end_offset", offset_value(refresh.end_offset));
    schedule_params(&mut params, &refresh.schedule);
    params
}

fn offset_value(offset: Option<Interval>) -> String {
    match offset {
        Some(i) => format!("interval {}", quote_literal(&i.as_literal())),
        None => "NULL".to_string(),
    }
}

/// Parameters for remove_retention_policy / remove_compression_policy
pub fn remove_policy_params(table_literal: &str, if_exists: bool) -> ParamMap {
    let mut params = ParamMap::new();
    insert(&mut params, "table", table_literal);
    insert(
        &mut params,
        "if_exists",
        if if_exists {
            ", if_exists => true".to_string()
        } else {
            String::new()
        },
    );
    params
}

/// Parameters for the decompress_chunk sweep over show_chunks
pub fn decompress_params(
    table_literal: &str,
    older_than: Option<Interval>,
    newer_than: Option<Interval>,
) -> ParamMap {
    let mut params = ParamMap::new();
    insert(&mut params, "table", table_literal);
    insert(
        &mut params,
        "older_than",
        older_than
            .map(|i| interval_arg("older_than", i))
            .unwrap_or_default(),
    );
    insert(
        &mut params,
        "newer_than",
        newer_than
            .map(|i| interval_arg("newer_than", i))
            .unwrap_or_default(),
    );
    params
}
