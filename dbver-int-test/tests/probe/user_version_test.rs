use dbver::common::MAIN_SCHEMA;
use dbver::errors::{DbverResult, ErrorKind};
use dbver::probe::{get_user_version, is_schema_empty, set_user_version};
use dbver_int_test::test_util::{create_conn_with_other_schema, OTHER_SCHEMA};

#[test]
fn test_get_after_set() -> DbverResult<()> {
    let conn = create_conn_with_other_schema()?;
    conn.execute_batch("PRAGMA user_version = 1; PRAGMA \"other schema\".user_version = 2")?;
    assert_eq!(get_user_version(&conn, MAIN_SCHEMA)?, 1);
    assert_eq!(get_user_version(&conn, OTHER_SCHEMA)?, 2);
    Ok(())
}

#[test]
fn test_set_is_visible_to_raw_pragma() -> DbverResult<()> {
    let conn = create_conn_with_other_schema()?;
    set_user_version(2, &conn, MAIN_SCHEMA)?;
    set_user_version(3, &conn, OTHER_SCHEMA)?;

    let main: i32 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    let other: i32 = conn.query_row("PRAGMA \"other schema\".user_version", [], |row| row.get(0))?;
    assert_eq!((main, other), (2, 3));
    Ok(())
}

#[test]
fn test_set_does_not_make_schema_nonempty() -> DbverResult<()> {
    let conn = create_conn_with_other_schema()?;
    set_user_version(5, &conn, OTHER_SCHEMA)?;
    assert!(is_schema_empty(&conn, OTHER_SCHEMA)?);
    Ok(())
}

#[test]
fn test_set_invalid() -> DbverResult<()> {
    let conn = create_conn_with_other_schema()?;
    for value in [1i64 << 40, -(1i64 << 40)] {
        let err = set_user_version(value, &conn, MAIN_SCHEMA).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::ValidationError);
    }
    assert_eq!(get_user_version(&conn, MAIN_SCHEMA)?, 0);
    Ok(())
}
