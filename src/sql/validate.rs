//! Syntax check for generated SQL.
//!
//! Parses the statement with sqlparser-rs. The generator emits a
//! dialect-neutral subset, so the generic dialect is enough.

use sqlparser::dialect::GenericDialect;
use sqlparser::parser::Parser;

/// Generated SQL that failed to parse.
#[derive(Debug, thiserror::Error)]
#[error("Invalid SQL: {message}\nSQL: {sql}")]
pub struct ValidationError {
    pub message: String,
    pub sql: String,
}

/// Check that `sql` parses as exactly one statement.
pub fn validate_sql(sql: &str) -> Result<(), ValidationError> {
    let statements = Parser::parse_sql(&GenericDialect {}, sql).map_err(|e| ValidationError {
        message: e.to_string(),
        sql: sql.to_string(),
    })?;

    if statements.len() != 1 {
        return Err(ValidationError {
            message: format!("expected one statement, found {}", statements.len()),
            sql: sql.to_string(),
        });
    }

    Ok(())
}
