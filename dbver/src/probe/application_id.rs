use rusqlite::Connection;

use super::{is_schema_empty, pragma_statement};
use crate::common::{validate_schema, APPLICATION_ID_PRAGMA};
use crate::errors::{DbverError, DbverResult, VersionContext};

/// Reads `PRAGMA application_id` of `schema`.
pub fn get_application_id(conn: &Connection, schema: &str) -> DbverResult<i32> {
    validate_schema(schema)?;
    let sql = pragma_statement(schema, APPLICATION_ID_PRAGMA);
    let application_id = conn.query_row(&sql, [], |row| row.get(0))?;
    Ok(application_id)
}

/// Writes `PRAGMA application_id` of `schema`.
pub fn set_application_id(application_id: i32, conn: &Connection, schema: &str) -> DbverResult<()> {
    validate_schema(schema)?;
    let sql = pragma_statement(schema, APPLICATION_ID_PRAGMA);
    conn.execute_batch(&format!("{} = {}", sql, application_id))?;
    Ok(())
}

/// Verifies that `schema` belongs to the application identified by `expected`.
///
/// An empty schema whose id is still `0` passes: a fresh database reads as
/// `0` and is simply unprovisioned. A non-zero foreign id fails even on an
/// empty schema.
///
/// # Errors
///
/// * [`ErrorKind::ValidationError`](crate::errors::ErrorKind::ValidationError)
///   if `schema` is not a safe name.
/// * [`ErrorKind::VersionError`](crate::errors::ErrorKind::VersionError) with a
///   [`VersionContext`] if the ids differ and the schema is not unprovisioned.
pub fn check_application_id(expected: i32, conn: &Connection, schema: &str) -> DbverResult<()> {
    let actual = get_application_id(conn, schema)?;
    if actual == expected {
        return Ok(());
    }
    if actual == 0 && is_schema_empty(conn, schema)? {
        log::debug!("Schema {:?} is unprovisioned", schema);
        return Ok(());
    }
    Err(DbverError::version(
        &format!(
            "Schema {:?} has application id {}, expected {}",
            schema, actual, expected
        ),
        VersionContext::new(schema, expected, actual),
    ))
}
