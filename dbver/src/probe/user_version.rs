use rusqlite::Connection;

use super::pragma_statement;
use crate::common::{validate_schema, USER_VERSION_PRAGMA};
use crate::errors::{DbverError, DbverResult, ErrorKind};

/// Reads `PRAGMA user_version` of `schema`.
pub fn get_user_version(conn: &Connection, schema: &str) -> DbverResult<i32> {
    validate_schema(schema)?;
    let sql = pragma_statement(schema, USER_VERSION_PRAGMA);
    let user_version = conn.query_row(&sql, [], |row| row.get(0))?;
    Ok(user_version)
}

/// Writes `PRAGMA user_version` of `schema`.
///
/// The counter is a signed 32-bit field; `value` is accepted as `i64` so that
/// out-of-range input is reported instead of silently truncated.
///
/// # Errors
///
/// Returns [`ErrorKind::ValidationError`] if `value` does not fit in `i32` or
/// `schema` is not a safe name.
pub fn set_user_version(value: i64, conn: &Connection, schema: &str) -> DbverResult<()> {
    let value = i32::try_from(value).map_err(|_| {
        DbverError::new(
            &format!("User version {} is outside the signed 32-bit range", value),
            ErrorKind::ValidationError,
        )
    })?;
    validate_schema(schema)?;
    let sql = pragma_statement(schema, USER_VERSION_PRAGMA);
    conn.execute_batch(&format!("{} = {}", sql, value))?;
    Ok(())
}
