//! Scoped SQLite transactions.
//!
//! [`begin`] opens a transaction with an explicit [`LockMode`] and returns a
//! [`TransactionGuard`]. The guard commits only when asked to and rolls back
//! on every other exit path, including early returns through `?` and panics.
//! [`with_transaction`] wraps the common "run this closure atomically" case.
//!
//! Transactions do not nest: calling [`begin`] while another transaction is
//! open on the same connection fails with the engine's error.

mod guard;
mod lock_mode;

pub use guard::*;
pub use lock_mode::*;
