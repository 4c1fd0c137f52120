use dbver::common::MAIN_SCHEMA;
use dbver::errors::{DbverError, DbverResult, ErrorKind};
use dbver::transaction::{begin, with_transaction, LockMode, TransactionState};
use dbver_int_test::test_util::{
    column_values, create_conn, create_conn_with_other_schema, in_transaction, OTHER_SCHEMA,
};
use rusqlite::Connection;

const LOCK_MODES: [LockMode; 3] = [LockMode::Deferred, LockMode::Immediate, LockMode::Exclusive];

fn create_table(conn: &Connection) -> DbverResult<()> {
    conn.execute_batch("CREATE TABLE x (x INT PRIMARY KEY)")?;
    Ok(())
}

// ==================== Guard Tests ====================

#[test]
fn test_success() -> DbverResult<()> {
    for lock_mode in LOCK_MODES {
        let conn = create_conn()?;
        create_table(&conn)?;
        assert!(!in_transaction(&conn));

        let tx = begin(&conn, lock_mode)?;
        assert!(in_transaction(&conn));
        tx.execute("INSERT INTO x (x) VALUES (1)", [])?;
        tx.commit()?;

        assert!(!in_transaction(&conn));
        assert_eq!(column_values(&conn, MAIN_SCHEMA, "x")?, vec![1]);
    }
    Ok(())
}

#[test]
fn test_failure() -> DbverResult<()> {
    fn failing(conn: &Connection, lock_mode: LockMode) -> DbverResult<()> {
        let tx = begin(conn, lock_mode)?;
        tx.execute("INSERT INTO x (x) VALUES (1)", [])?;
        Err(DbverError::new("dummy failure", ErrorKind::InternalError))
    }

    for lock_mode in LOCK_MODES {
        let conn = create_conn()?;
        create_table(&conn)?;
        let err = failing(&conn, lock_mode).unwrap_err();
        assert_eq!(err.message(), "dummy failure");
        assert!(!in_transaction(&conn));
        assert!(column_values(&conn, MAIN_SCHEMA, "x")?.is_empty());
    }
    Ok(())
}

#[test]
fn test_panic_rolls_back() -> DbverResult<()> {
    let conn = create_conn()?;
    create_table(&conn)?;
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        let tx = begin(&conn, LockMode::Immediate).unwrap();
        tx.execute("INSERT INTO x (x) VALUES (1)", []).unwrap();
        panic!("dummy panic");
    }));
    assert!(result.is_err());
    assert!(!in_transaction(&conn));
    assert!(column_values(&conn, MAIN_SCHEMA, "x")?.is_empty());
    Ok(())
}

#[test]
fn test_guard_reports_state() -> DbverResult<()> {
    let conn = create_conn()?;
    let tx = begin(&conn, LockMode::Exclusive)?;
    assert_eq!(tx.state(), TransactionState::Active);
    assert_eq!(tx.lock_mode(), LockMode::Exclusive);
    tx.rollback()?;
    assert!(!in_transaction(&conn));
    Ok(())
}

// ==================== Scoped Transaction Tests ====================

#[test]
fn test_with_transaction_spans_attached_schemas() -> DbverResult<()> {
    let conn = create_conn_with_other_schema()?;
    conn.execute_batch(
        "CREATE TABLE x (x INT PRIMARY KEY); CREATE TABLE \"other schema\".x (x INT PRIMARY KEY)",
    )?;

    let err = with_transaction(&conn, LockMode::Immediate, |conn| -> DbverResult<()> {
        conn.execute("INSERT INTO main.x (x) VALUES (1)", [])?;
        conn.execute("INSERT INTO \"other schema\".x (x) VALUES (1)", [])?;
        // duplicate key
        conn.execute("INSERT INTO \"other schema\".x (x) VALUES (1)", [])?;
        Ok(())
    })
    .unwrap_err();

    assert_eq!(err.kind(), &ErrorKind::BackendError);
    assert!(column_values(&conn, MAIN_SCHEMA, "x")?.is_empty());
    assert!(column_values(&conn, OTHER_SCHEMA, "x")?.is_empty());
    Ok(())
}

#[test]
fn test_with_transaction_is_not_reentrant() -> DbverResult<()> {
    let conn = create_conn()?;
    let err = with_transaction(&conn, LockMode::Deferred, |conn| {
        with_transaction(conn, LockMode::Deferred, |_| Ok(()))
    })
    .unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::BackendError);
    assert!(!in_transaction(&conn));
    Ok(())
}
