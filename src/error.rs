//! Error handling module
//!
//! Provides the unified error taxonomy for the schema lifecycle engine.

use thiserror::Error;

/// Engine-wide error type
#[derive(Error, Debug)]
pub enum EngineError {
    /// A DDL template referenced a parameter that was never supplied.
    /// Always a programming error, never recoverable at runtime.
    #[error("Template error: missing parameter `{parameter}` for template `{template}`")]
    Template { template: String, parameter: String },

    /// A precondition assertion failed against live catalog state.
    #[error("Schema invariant violated: table `{table}` {expected}")]
    SchemaInvariant { table: String, expected: String },

    /// An explicitly unimplemented path was requested.
    #[error("Not supported: {0}")]
    NotSupported(String),

    /// The execution adapter reported a failure running a statement.
    #[error("Backend error{}: {}", .code.as_deref().map(|c| format!(" [{c}]")).unwrap_or_default(), .message)]
    Backend {
        code: Option<String>,
        message: String,
    },

    #[error("Pool error: {0}")]
    Pool(#[from] deadpool_postgres::PoolError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<tokio_postgres::Error> for EngineError {
    fn from(e: tokio_postgres::Error) -> Self {
        EngineError::Backend {
            code: e.code().map(|c| c.code().to_string()),
            message: e.to_string(),
        }
    }
}

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Helper function to create a not-supported error
pub fn not_supported(msg: impl Into<String>) -> EngineError {
    EngineError::NotSupported(msg.into())
}

/// Helper function to create a schema invariant error
pub fn schema_invariant(table: impl Into<String>, expected: impl Into<String>) -> EngineError {
    EngineError::SchemaInvariant {
        table: table.into(),
        expected: expected.into(),
    }
}
