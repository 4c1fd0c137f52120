use regex::Regex;
use std::sync::LazyLock;

use crate::errors::{DbverError, DbverResult, ErrorKind};

/// Names that may be wrapped in double quotes without escaping: non-empty,
/// no double quote, no NUL.
static SAFE_IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^[^"\x00]+$"#).expect("identifier pattern is valid")
});

/// Checks that `schema` can be interpolated into a statement as a quoted
/// identifier.
///
/// # Errors
///
/// Returns [`ErrorKind::ValidationError`] when the name is empty or contains
/// a double quote or NUL character.
///
/// # Examples
///
/// ```rust
/// use dbver::common::validate_schema;
///
/// assert!(validate_schema("main").is_ok());
/// assert!(validate_schema("other schema").is_ok());
/// assert!(validate_schema("invalid\"schema").is_err());
/// ```
pub fn validate_schema(schema: &str) -> DbverResult<()> {
    validate_identifier(schema, "schema")
}

/// Same rule as [`validate_schema`], for table names.
pub fn validate_table_name(table: &str) -> DbverResult<()> {
    validate_identifier(table, "table")
}

fn validate_identifier(name: &str, what: &str) -> DbverResult<()> {
    if SAFE_IDENTIFIER.is_match(name) {
        Ok(())
    } else {
        log::error!("Rejected unsafe {} name {:?}", what, name);
        Err(DbverError::new(
            &format!("Invalid {} name: {:?}", what, name),
            ErrorKind::ValidationError,
        ))
    }
}

/// Wraps an already validated identifier in double quotes.
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name)
}

/// Returns `"schema"."object"` for an already validated schema and object.
pub fn qualified_name(schema: &str, object: &str) -> String {
    format!("{}.{}", quote_identifier(schema), quote_identifier(object))
}
