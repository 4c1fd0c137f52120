//! Migration graph and upgrade driver.
//!
//! Transitions are registered as edges `from -> to` between formats. An
//! upgrade reads the current format of a schema, walks the graph greedily
//! under the active constraint and applies every transition on the way,
//! all inside a single transaction.
//!
//! # Constraints
//!
//! The edge filter of a walk is chosen in this order:
//! 1. the caller's `condition(start, candidate)`, if any,
//! 2. no filter at all when `breaking` is set,
//! 3. otherwise the format's own breaking-change policy, evaluated from the
//!    start of the walk. Formats without a policy are not filtered.
//!
//! At each node the walk takes the passing edge with the greatest target and
//! never takes the same `(from, to)` pair twice.
//!
//! # Examples
//!
//! ```rust
//! use dbver::format::SemverFormat;
//! use dbver::migration::{Migrations, UpgradeOptions};
//! use rusqlite::Connection;
//!
//! # fn main() -> dbver::errors::DbverResult<()> {
//! let migrations = Migrations::builder(SemverFormat)
//!     .application_id(1)
//!     .migrates(0, 1_000_000, |conn, schema| {
//!         conn.execute_batch(&format!("CREATE TABLE \"{}\".a (a INT)", schema))?;
//!         Ok(())
//!     })
//!     .build()?;
//!
//! let conn = Connection::open_in_memory()?;
//! let version = migrations.upgrade(&conn, "main", &UpgradeOptions::default())?;
//! assert_eq!(version, 1_000_000);
//! # Ok(())
//! # }
//! ```

mod builder;
mod graph;
mod migrations;
mod options;
mod path;

pub use builder::*;
pub use graph::*;
pub use migrations::*;
pub use options::*;
pub use path::*;
