use rusqlite::{Connection, OptionalExtension};

use super::FormatAccessor;
use crate::common::{
    qualified_name, validate_schema, validate_table_name, DEFAULT_FORMAT_TABLE,
    FORMAT_NAME_COLUMN,
};
use crate::errors::{DbverError, DbverResult, ErrorKind, VersionContext};
use crate::probe::get_application_id;

fn table_exists(conn: &Connection, schema: &str, table: &str) -> DbverResult<bool> {
    let sql = format!(
        "SELECT COUNT(*) FROM {} WHERE type = 'table' AND name = ?1",
        qualified_name(schema, "sqlite_master")
    );
    let count: i64 = conn.query_row(&sql, [table], |row| row.get(0))?;
    Ok(count > 0)
}

/// Format stored as a name in a single-row side table.
///
/// The schema counts as unprovisioned (`None`) while its application id is
/// still zero. Named formats carry no breaking-change policy and no ordering,
/// so upgrades follow every registered edge unless a condition is given.
///
/// # Examples
///
/// ```rust
/// use dbver::format::{FormatAccessor, NamedFormat};
/// use rusqlite::Connection;
///
/// # fn main() -> dbver::errors::DbverResult<()> {
/// let conn = Connection::open_in_memory()?;
/// let accessor = NamedFormat::default();
/// assert_eq!(accessor.read_format(&conn, "main")?, None);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedFormat {
    table: String,
}

impl Default for NamedFormat {
    fn default() -> Self {
        NamedFormat {
            table: DEFAULT_FORMAT_TABLE.to_string(),
        }
    }
}

impl NamedFormat {
    /// Uses `table` instead of the default `format` table.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::ValidationError`] if `table` is not a safe name.
    pub fn with_table(table: &str) -> DbverResult<Self> {
        validate_table_name(table)?;
        Ok(NamedFormat {
            table: table.to_string(),
        })
    }

    pub fn table(&self) -> &str {
        &self.table
    }
}

impl FormatAccessor for NamedFormat {
    type Format = Option<String>;

    fn read_format(&self, conn: &Connection, schema: &str) -> DbverResult<Option<String>> {
        if get_application_id(conn, schema)? == 0 {
            return Ok(None);
        }
        if !table_exists(conn, schema, &self.table)? {
            return Err(DbverError::version(
                &format!("Schema {:?} has no {:?} table", schema, self.table),
                VersionContext::new(schema, "a format name", None::<String>),
            ));
        }
        let sql = format!(
            "SELECT {} FROM {}",
            FORMAT_NAME_COLUMN,
            qualified_name(schema, &self.table)
        );
        let name: Option<String> = conn.query_row(&sql, [], |row| row.get(0)).optional()?;
        match name {
            Some(name) => Ok(Some(name)),
            None => Err(DbverError::version(
                &format!("Schema {:?} has an empty {:?} table", schema, self.table),
                VersionContext::new(schema, "a format name", None::<String>),
            )),
        }
    }

    fn write_format(
        &self,
        format: &Option<String>,
        conn: &Connection,
        schema: &str,
    ) -> DbverResult<()> {
        let name = format.as_deref().ok_or_else(|| {
            DbverError::new(
                "Cannot store the unprovisioned format",
                ErrorKind::ValidationError,
            )
        })?;
        validate_schema(schema)?;
        let table = qualified_name(schema, &self.table);
        conn.execute_batch(&format!(
            "DROP TABLE IF EXISTS {table}; CREATE TABLE {table} ({column} TEXT NOT NULL)",
            table = table,
            column = FORMAT_NAME_COLUMN
        ))?;
        conn.execute(
            &format!("INSERT INTO {} ({}) VALUES (?1)", table, FORMAT_NAME_COLUMN),
            [name],
        )?;
        Ok(())
    }

    fn can_store_unprovisioned(&self) -> bool {
        false
    }
}
