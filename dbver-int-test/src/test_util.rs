use dbver::errors::DbverResult;
use rusqlite::Connection;
use std::env;
use std::path::{Path, PathBuf};

pub const OTHER_SCHEMA: &str = "other schema";

/// Opens an in-memory database in autocommit mode.
pub fn create_conn() -> DbverResult<Connection> {
    Ok(Connection::open_in_memory()?)
}

/// Opens an in-memory database with a second in-memory database attached
/// as [`OTHER_SCHEMA`].
pub fn create_conn_with_other_schema() -> DbverResult<Connection> {
    let conn = create_conn()?;
    attach_other_schema(&conn)?;
    Ok(conn)
}

/// A fresh database file path under the system temp directory.
pub fn random_path() -> PathBuf {
    let id = uuid::Uuid::new_v4();
    env::temp_dir().join(format!("dbver-{}.db", id))
}

/// Opens (creating if needed) the database file at `path`.
pub fn open_file_conn(path: &Path) -> DbverResult<Connection> {
    Ok(Connection::open(path)?)
}

/// Deletes the database file at `path` and its journal, ignoring missing files.
pub fn remove_db_file(path: &Path) {
    let _ = std::fs::remove_file(path);
    let _ = std::fs::remove_file(path.with_extension("db-journal"));
}

pub fn attach_other_schema(conn: &Connection) -> DbverResult<()> {
    conn.execute("ATTACH ':memory:' AS ?1", [OTHER_SCHEMA])?;
    Ok(())
}

/// Names of the tables in `schema`, sorted.
pub fn table_names(conn: &Connection, schema: &str) -> DbverResult<Vec<String>> {
    let sql = format!(
        "SELECT name FROM \"{}\".sqlite_master WHERE type = 'table' ORDER BY name",
        schema
    );
    let mut stmt = conn.prepare(&sql)?;
    let names = stmt
        .query_map([], |row| row.get(0))?
        .collect::<Result<Vec<String>, _>>()?;
    Ok(names)
}

/// Values of the first column of `"schema".table`, in rowid order.
pub fn column_values(conn: &Connection, schema: &str, table: &str) -> DbverResult<Vec<i64>> {
    let sql = format!("SELECT * FROM \"{}\".\"{}\" ORDER BY rowid", schema, table);
    let mut stmt = conn.prepare(&sql)?;
    let values = stmt
        .query_map([], |row| row.get(0))?
        .collect::<Result<Vec<i64>, _>>()?;
    Ok(values)
}

/// True while a transaction is open on `conn`.
pub fn in_transaction(conn: &Connection) -> bool {
    !conn.is_autocommit()
}
