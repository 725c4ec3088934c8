//! Execution adapter boundary
//!
//! The engine depends on the database through one narrow contract:
//! `execute(sql) -> Result`. The production adapter runs against a
//! deadpool-managed PostgreSQL pool; the recording adapter captures
//! statements for dry runs and tests.

use std::sync::Mutex;

use deadpool_postgres::Pool;
use tracing::{debug, warn};

use crate::error::EngineResult;

/// Narrow execution contract consumed by the engine
#[allow(async_fn_in_trait)]
pub trait Executor {
    /// Send one rendered SQL string to the backend.
    async fn execute(&self, sql: &str) -> EngineResult<()>;
}

impl<E: Executor> Executor for &E {
    async fn execute(&self, sql: &str) -> EngineResult<()> {
        (**self).execute(sql).await
    }
}

/// Production adapter backed by a deadpool-postgres pool
pub struct PgExecutor {
    pool: Pool,
}

impl PgExecutor {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

impl Executor for PgExecutor {
    async fn execute(&self, sql: &str) -> EngineResult<()> {
        let client = self.pool.get().await?;
        client.batch_execute(sql).await?;
        Ok(())
    }
}

/// Dry-run adapter: records every statement instead of reaching a backend,
/// optionally failing statements that match an injected pattern.
#[derive(Default)]
pub struct RecordingExecutor {
    statements: Mutex<Vec<String>>,
    failure: Mutex<Option<InjectedFailure>>,
}

struct InjectedFailure {
    matches: String,
    code: Option<String>,
    message: String,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail any statement containing `matches` with the given SQLSTATE.
    pub fn fail_matching(&self, matches: &str, code: Option<&str>, message: &str) {
        *self.failure.lock().unwrap() = Some(InjectedFailure {
            matches: matches.to_string(),
            code: code.map(|c| c.to_string()),
            message: message.to_string(),
        });
    }

    /// Statements recorded so far, in issue order
    pub fn statements(&self) -> Vec<String> {
        self.statements.lock().unwrap().clone()
    }
}

impl Executor for RecordingExecutor {
    async fn execute(&self, sql: &str) -> EngineResult<()> {
        if let Some(failure) = self.failure.lock().unwrap().as_ref() {
            if sql.contains(&failure.matches) {
                return Err(crate::error::EngineError::Backend {
                    code: failure.code.clone(),
                    message: failure.message.clone(),
                });
            }
        }
        debug!(%sql, "recorded statement");
        self.statements.lock().unwrap().push(sql.to_string());
        Ok(())
    }
}

/// Best-effort extension bootstrap. A refusal here (extension not available,
/// insufficient privilege) is a warning-level condition, not an abort: the
/// precondition assertions catch a genuinely missing extension later.
pub async fn ensure_extension<E: Executor>(executor: &E) -> EngineResult<()> {
    match executor.execute("CREATE EXTENSION IF NOT EXISTS timescaledb").await {
        Ok(()) => Ok(()),
        Err(e) => {
            warn!(error = %e, "could not enable timescaledb extension, continuing");
            Ok(())
        }
    }
}
