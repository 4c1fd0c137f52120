use rusqlite::Connection;
use std::sync::Arc;

use super::{MigrationGraph, Migrations};
use crate::errors::{DbverError, DbverResult, ErrorKind};
use crate::format::FormatAccessor;
use crate::transaction::LockMode;

/// Fluent construction of a [`Migrations`] registry.
///
/// The first invalid setting is kept and reported by [`build`](Self::build);
/// later calls are then ignored. Registering a backward edge on an ordered
/// format still panics right away.
///
/// # Examples
///
/// ```rust
/// use dbver::format::UserVersionFormat;
/// use dbver::migration::Migrations;
/// use dbver::transaction::LockMode;
///
/// # fn main() -> dbver::errors::DbverResult<()> {
/// let migrations = Migrations::builder(UserVersionFormat)
///     .application_id(0x6462_7672)
///     .lock_mode(LockMode::Exclusive)
///     .migrates(0, 1, |conn, schema| {
///         conn.execute_batch(&format!("CREATE TABLE \"{}\".t (t TEXT)", schema))?;
///         Ok(())
///     })
///     .build()?;
/// assert_eq!(migrations.graph().edge_count(), 1);
/// # Ok(())
/// # }
/// ```
pub struct MigrationsBuilder<A: FormatAccessor> {
    error: Option<DbverError>,
    accessor: A,
    application_id: Option<i32>,
    lock_mode: LockMode,
    graph: MigrationGraph<A::Format>,
}

impl<A: FormatAccessor> MigrationsBuilder<A> {
    pub fn new(accessor: A) -> Self {
        let graph = MigrationGraph::new(accessor.is_ordered());
        MigrationsBuilder {
            error: None,
            accessor,
            application_id: None,
            lock_mode: LockMode::default(),
            graph,
        }
    }

    /// Sets the id stamped into every managed schema. Zero is reserved for
    /// unprovisioned schemas and is rejected.
    pub fn application_id(mut self, application_id: i32) -> Self {
        if self.error.is_none() {
            if application_id == 0 {
                log::error!("Application id 0 is reserved for unprovisioned schemas");
                self.error = Some(DbverError::new(
                    "Application id must not be 0",
                    ErrorKind::ValidationError,
                ));
            } else {
                self.application_id = Some(application_id);
            }
        }
        self
    }

    pub fn lock_mode(mut self, lock_mode: LockMode) -> Self {
        self.lock_mode = lock_mode;
        self
    }

    pub fn migrates<T>(mut self, from: A::Format, to: A::Format, transition: T) -> Self
    where
        T: Fn(&Connection, &str) -> DbverResult<()> + Send + Sync + 'static,
    {
        self.graph.register(from, to, Arc::new(transition));
        self
    }

    pub fn build(self) -> DbverResult<Migrations<A>> {
        if let Some(error) = self.error {
            return Err(error);
        }
        let application_id = self.application_id.ok_or_else(|| {
            DbverError::new("Application id is required", ErrorKind::ValidationError)
        })?;
        Ok(Migrations::from_parts(
            self.accessor,
            application_id,
            self.lock_mode,
            self.graph,
        ))
    }
}
