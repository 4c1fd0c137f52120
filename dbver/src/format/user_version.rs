use rusqlite::Connection;

use super::FormatAccessor;
use crate::errors::{DbverError, DbverResult, VersionContext};
use crate::probe::{get_user_version, is_schema_empty, set_user_version};

/// Format stored as a plain counter in `PRAGMA user_version`.
///
/// `0` is the unprovisioned format. Provisioning from `0` is never breaking;
/// once provisioned, any change of the counter is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UserVersionFormat;

impl FormatAccessor for UserVersionFormat {
    type Format = i32;

    fn read_format(&self, conn: &Connection, schema: &str) -> DbverResult<i32> {
        let version = get_user_version(conn, schema)?;
        if version == 0 {
            ensure_unprovisioned(conn, schema)?;
        }
        Ok(version)
    }

    fn write_format(&self, format: &i32, conn: &Connection, schema: &str) -> DbverResult<()> {
        set_user_version(*format as i64, conn, schema)
    }

    fn is_breaking(&self, from: &i32, to: &i32) -> Option<bool> {
        Some(*from != 0 && from != to)
    }

    fn is_ordered(&self) -> bool {
        true
    }
}

/// A zero counter is only meaningful on an empty schema.
pub(crate) fn ensure_unprovisioned(conn: &Connection, schema: &str) -> DbverResult<()> {
    if is_schema_empty(conn, schema)? {
        Ok(())
    } else {
        Err(DbverError::version(
            &format!("Schema {:?} has objects but no format version", schema),
            VersionContext::new(schema, "non-zero version", 0),
        ))
    }
}
