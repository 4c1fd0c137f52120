//! Reading and writing the format marker of a schema.
//!
//! A [`FormatAccessor`] knows where a schema's format lives and how formats
//! relate to each other. The crate ships three of them:
//!
//! - [`UserVersionFormat`]: a plain `i32` counter in `PRAGMA user_version`.
//! - [`SemverFormat`]: a `u32` semantic version (`major*1_000_000 +
//!   minor*1_000 + patch`) in `PRAGMA user_version`, with the semantic
//!   breaking-change policy.
//! - [`NamedFormat`]: an arbitrary name stored in a single-row side table,
//!   `None` while unprovisioned.
//!
//! Custom encodings implement the trait themselves and plug into
//! [`Migrations`](crate::migration::Migrations) the same way.

mod named;
mod semver;
mod user_version;

pub use named::*;
pub use semver::*;
pub use user_version::*;

use rusqlite::Connection;
use std::fmt::Debug;

use crate::errors::DbverResult;

/// Strategy for storing the format of a schema and classifying transitions.
///
/// Implementations never check the application id; the driver does that
/// before calling [`FormatAccessor::read_format`].
pub trait FormatAccessor {
    /// The format identifier. Its `Ord` is also the tie-break order of the
    /// path search.
    type Format: Ord + Clone + Debug;

    /// Reads the current format of `schema` without validating the
    /// application id. An unprovisioned schema reads as the format's "zero"
    /// value (`0`, `None`, ...).
    fn read_format(&self, conn: &Connection, schema: &str) -> DbverResult<Self::Format>;

    /// Stores `format` as the current format of `schema`.
    fn write_format(&self, format: &Self::Format, conn: &Connection, schema: &str)
        -> DbverResult<()>;

    /// Default breaking-change policy. `None` means the format type has no
    /// policy and upgrades follow every edge.
    fn is_breaking(&self, _from: &Self::Format, _to: &Self::Format) -> Option<bool> {
        None
    }

    /// Whether formats only ever move forward, i.e. every registered edge
    /// must satisfy `from <= to`.
    fn is_ordered(&self) -> bool {
        false
    }

    /// Whether [`FormatAccessor::write_format`] can store the unprovisioned
    /// format. An upgrade that runs no transition on an unprovisioned schema
    /// only stamps it when this holds.
    fn can_store_unprovisioned(&self) -> bool {
        true
    }
}
