//! Low-level identity and version fields of a SQLite schema.
//!
//! Every function here takes the schema name explicitly (use
//! [`MAIN_SCHEMA`](crate::common::MAIN_SCHEMA) for the default database) and
//! validates it before any statement runs.

mod application_id;
mod user_version;

pub use application_id::*;
pub use user_version::*;

use rusqlite::Connection;

use crate::common::{qualified_name, quote_identifier, validate_schema};
use crate::errors::DbverResult;

/// Returns true when `schema` holds no tables, indexes, views or triggers.
///
/// A freshly created or attached database reads as empty, which is how the
/// rest of the crate recognises an unprovisioned schema.
pub fn is_schema_empty(conn: &Connection, schema: &str) -> DbverResult<bool> {
    validate_schema(schema)?;
    let sql = format!(
        "SELECT COUNT(*) FROM {}",
        qualified_name(schema, "sqlite_master")
    );
    let count: i64 = conn.query_row(&sql, [], |row| row.get(0))?;
    Ok(count == 0)
}

/// `PRAGMA "schema".pragma` for an already validated schema name.
fn pragma_statement(schema: &str, pragma: &str) -> String {
    format!("PRAGMA {}.{}", quote_identifier(schema), pragma)
}
