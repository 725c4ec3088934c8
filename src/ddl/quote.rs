//! Quoting chokepoint
//!
//! Every dynamic operand interpolated into a DDL template goes through one
//! of these functions, so injection from table names, identifiers, or
//! interval literals is cut off in a single place.

/// Quote a value as a SQL string literal, doubling embedded quotes.
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Quote a SQL identifier, doubling embedded double quotes.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Render a boolean as the backend keyword.
pub fn bool_literal(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}
