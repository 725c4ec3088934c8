//! Precondition assertions
//!
//! Check-then-act guards for destructive hypertable operations. Each check
//! runs as a single guarded DO block against the backend catalog, so the
//! existence test and the raise cannot race another migration run between
//! two round trips.

use tracing::{debug, error};

use crate::ddl::quote::quote_literal;
use crate::ddl::template::{ParamMap, TemplateId};
use crate::ddl::RenderedStatement;
use crate::engine::executor::Executor;
use crate::error::{schema_invariant, EngineError, EngineResult};
use crate::model::TableDescriptor;

/// SQLSTATE raised by an unqualified RAISE EXCEPTION inside the guard.
const RAISE_EXCEPTION: &str = "P0001";

/// Expect the table to already be registered as a hypertable.
pub(crate) async fn assert_is_hypertable<E: Executor>(
    executor: &E,
    table: &TableDescriptor,
    schema_scope: Option<&str>,
) -> EngineResult<RenderedStatement> {
    run_assert(
        executor,
        TemplateId::AssertIsHypertable,
        table,
        schema_scope,
        "should be a hyper table",
    )
    .await
}

/// Expect the table to not yet be a hypertable.
pub(crate) async fn assert_is_not_hypertable<E: Executor>(
    executor: &E,
    table: &TableDescriptor,
    schema_scope: Option<&str>,
) -> EngineResult<RenderedStatement> {
    run_assert(
        executor,
        TemplateId::AssertIsNotHypertable,
        table,
        schema_scope,
        "should not be a hyper table",
    )
    .await
}

async fn run_assert<E: Executor>(
    executor: &E,
    template: TemplateId,
    table: &TableDescriptor,
    schema_scope: Option<&str>,
    expected: &str,
) -> EngineResult<RenderedStatement> {
    let params = assert_params(table, schema_scope, expected);
    let sql = template.render(&params)?;
    match executor.execute(&sql).await {
        Ok(()) => Ok(RenderedStatement::new(template.name(), sql, params)),
        Err(EngineError::Backend { code, message })
            if code.as_deref() == Some(RAISE_EXCEPTION) =>
        {
            error!(table = %table.name, %message, "precondition assertion failed");
            Err(schema_invariant(&table.name, expected))
        }
        Err(other) => Err(other),
    }
}

fn assert_params(table: &TableDescriptor, schema_scope: Option<&str>, expected: &str) -> ParamMap {
    // The catalog view holds unqualified names; scoping happens through the
    // hypertable_schema column. When no schema can be determined the check
    // degrades to an unrestricted lookup.
    let scope = table.schema.as_deref().or(schema_scope);
    let extra_condition = match scope {
        Some(schema) => format!(" AND hypertable_schema = {}", quote_literal(schema)),
        None => {
            debug!(table = %table.name, "no schema scope, catalog check is unrestricted");
            String::new()
        }
    };
    let mut params = ParamMap::new();
    params.insert("table".to_string(), quote_literal(&table.name));
    params.insert("extra_condition".to_string(), extra_condition);
    params.insert(
        "error_message".to_string(),
        quote_literal(&format!("assert failed - {} {}", table.name, expected)),
    );
    params
}
