use rusqlite::Connection;
use std::ops::Deref;

use super::LockMode;
use crate::errors::DbverResult;

/// State of a [`TransactionGuard`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
    /// Transaction is open.
    Active,
    /// Transaction was committed.
    Committed,
    /// Transaction was rolled back, explicitly or on drop.
    Aborted,
}

/// An open transaction on a borrowed connection.
///
/// The guard dereferences to the [`Connection`], so statements run through it
/// directly. Dropping an active guard rolls the transaction back; a failed
/// rollback on drop is logged, never raised.
///
/// # Examples
///
/// ```rust
/// use dbver::transaction::{begin, LockMode};
/// use rusqlite::Connection;
///
/// # fn main() -> dbver::errors::DbverResult<()> {
/// let conn = Connection::open_in_memory()?;
/// conn.execute_batch("CREATE TABLE x (x INT PRIMARY KEY)")?;
///
/// let tx = begin(&conn, LockMode::Immediate)?;
/// tx.execute("INSERT INTO x (x) VALUES (1)", [])?;
/// tx.commit()?;
/// # Ok(())
/// # }
/// ```
pub struct TransactionGuard<'conn> {
    conn: &'conn Connection,
    lock_mode: LockMode,
    state: TransactionState,
}

/// Begins a transaction on `conn` with the given lock strictness.
///
/// # Errors
///
/// Fails with [`ErrorKind::DatabaseBusy`](crate::errors::ErrorKind::DatabaseBusy)
/// if the lock cannot be acquired, and with
/// [`ErrorKind::BackendError`](crate::errors::ErrorKind::BackendError) if the
/// engine refuses to begin for another reason, e.g. an open transaction.
pub fn begin(conn: &Connection, lock_mode: LockMode) -> DbverResult<TransactionGuard<'_>> {
    conn.execute_batch(lock_mode.begin_statement())?;
    log::debug!("Began {} transaction", lock_mode);
    Ok(TransactionGuard {
        conn,
        lock_mode,
        state: TransactionState::Active,
    })
}

/// Runs `f` inside a transaction.
///
/// Commits when `f` returns `Ok`. When `f` fails the transaction is rolled
/// back and the original error is returned unchanged; a rollback failure is
/// only logged.
///
/// # Examples
///
/// ```rust
/// use dbver::transaction::{with_transaction, LockMode};
/// use rusqlite::Connection;
///
/// # fn main() -> dbver::errors::DbverResult<()> {
/// let conn = Connection::open_in_memory()?;
/// let count: i64 = with_transaction(&conn, LockMode::Deferred, |conn| {
///     conn.execute_batch("CREATE TABLE x (x INT)")?;
///     Ok(conn.query_row("SELECT COUNT(*) FROM x", [], |row| row.get(0))?)
/// })?;
/// assert_eq!(count, 0);
/// # Ok(())
/// # }
/// ```
pub fn with_transaction<T, F>(conn: &Connection, lock_mode: LockMode, f: F) -> DbverResult<T>
where
    F: FnOnce(&Connection) -> DbverResult<T>,
{
    let guard = begin(conn, lock_mode)?;
    match f(&*guard) {
        Ok(value) => {
            guard.commit()?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = guard.rollback() {
                log::warn!(
                    "Rollback after failure did not complete: {}",
                    rollback_err
                );
            }
            Err(err)
        }
    }
}

impl<'conn> TransactionGuard<'conn> {
    /// Lock strictness this transaction was opened with.
    pub fn lock_mode(&self) -> LockMode {
        self.lock_mode
    }

    pub fn state(&self) -> TransactionState {
        self.state
    }

    /// Commits the transaction.
    ///
    /// If the commit fails the guard is dropped while still active, which
    /// rolls the transaction back.
    pub fn commit(mut self) -> DbverResult<()> {
        self.conn.execute_batch("COMMIT")?;
        self.state = TransactionState::Committed;
        log::debug!("Committed {} transaction", self.lock_mode);
        Ok(())
    }

    /// Rolls the transaction back.
    pub fn rollback(mut self) -> DbverResult<()> {
        self.state = TransactionState::Aborted;
        self.perform_rollback()
    }

    fn perform_rollback(&self) -> DbverResult<()> {
        // the engine may already have rolled back on its own (e.g. SQLITE_FULL)
        if self.conn.is_autocommit() {
            return Ok(());
        }
        self.conn.execute_batch("ROLLBACK")?;
        log::debug!("Rolled back {} transaction", self.lock_mode);
        Ok(())
    }
}

impl Deref for TransactionGuard<'_> {
    type Target = Connection;

    fn deref(&self) -> &Self::Target {
        self.conn
    }
}

impl std::fmt::Debug for TransactionGuard<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionGuard")
            .field("lock_mode", &self.lock_mode)
            .field("state", &self.state)
            .finish()
    }
}

impl Drop for TransactionGuard<'_> {
    fn drop(&mut self) {
        if self.state == TransactionState::Active {
            self.state = TransactionState::Aborted;
            if let Err(err) = self.perform_rollback() {
                log::warn!("Failed to roll back dropped transaction: {}", err);
            }
        }
    }
}
