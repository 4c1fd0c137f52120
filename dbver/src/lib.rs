//! # dbver - schema formats and migrations for embedded SQLite
//!
//! dbver keeps track of the "format" (schema version) of SQLite schemas,
//! refuses to touch a schema that belongs to another application, and
//! upgrades schemas step by step along a graph of registered transitions.
//!
//! ## Quick Start
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
//!         conn.execute_batch(&format!("CREATE TABLE \"{}\".a (a INT PRIMARY KEY)", schema))?;
//!         Ok(())
//!     })
//!     .migrates(1_000_000, 1_001_000, |conn, schema| {
//!         conn.execute_batch(&format!("ALTER TABLE \"{}\".a ADD COLUMN t TEXT", schema))?;
//!         Ok(())
//!     })
//!     .build()?;
//!
//! let conn = Connection::open_in_memory()?;
//! let version = migrations.upgrade(&conn, "main", &UpgradeOptions::default())?;
//! assert_eq!(version, 1_001_000);
//! assert_eq!(migrations.get_format(&conn, "main")?, 1_001_000);
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`probe`] - application id and `user_version` fields of a schema
//! - [`transaction`] - scoped transactions with explicit lock modes
//! - [`format`] - where a schema's format is stored and how formats compare
//! - [`migration`] - the transition graph, path search and upgrade driver
//! - [`errors`] - error types and result definitions
//! - [`common`] - constants and identifier helpers
//!
//! Every operation takes the schema name explicitly, so attached databases
//! are managed independently of `main`.

pub mod common;
pub mod errors;
pub mod format;
pub mod migration;
pub mod probe;
pub mod transaction;

pub use errors::{DbverError, DbverResult, ErrorKind};
pub use format::FormatAccessor;
pub use migration::{Migrations, UpgradeOptions};
