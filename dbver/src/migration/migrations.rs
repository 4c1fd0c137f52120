use rusqlite::Connection;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use super::{
    MigrationGraph, MigrationPath, MigrationStep, MigrationsBuilder, Transition, UpgradeOptions,
};
use crate::errors::{DbverError, DbverResult, ErrorKind, VersionContext};
use crate::format::FormatAccessor;
use crate::probe::{check_application_id, get_application_id, set_application_id};
use crate::transaction::{with_transaction, LockMode};

/// A migration registry for one application.
///
/// `Migrations` pairs a [`FormatAccessor`] with the application id that
/// identifies the application's databases and the graph of registered
/// transitions between formats.
pub struct Migrations<A: FormatAccessor> {
    accessor: A,
    application_id: i32,
    lock_mode: LockMode,
    graph: MigrationGraph<A::Format>,
}

impl<A: FormatAccessor> Migrations<A> {
    /// Creates an empty registry. Upgrades run with [`LockMode::Immediate`].
    pub fn new(accessor: A, application_id: i32) -> Self {
        let graph = MigrationGraph::new(accessor.is_ordered());
        Migrations {
            accessor,
            application_id,
            lock_mode: LockMode::default(),
            graph,
        }
    }

    pub fn builder(accessor: A) -> MigrationsBuilder<A> {
        MigrationsBuilder::new(accessor)
    }

    pub(crate) fn from_parts(
        accessor: A,
        application_id: i32,
        lock_mode: LockMode,
        graph: MigrationGraph<A::Format>,
    ) -> Self {
        Migrations {
            accessor,
            application_id,
            lock_mode,
            graph,
        }
    }

    pub fn accessor(&self) -> &A {
        &self.accessor
    }

    pub fn application_id(&self) -> i32 {
        self.application_id
    }

    pub fn lock_mode(&self) -> LockMode {
        self.lock_mode
    }

    pub fn graph(&self) -> &MigrationGraph<A::Format> {
        &self.graph
    }

    /// Registers `transition` as the edge `from -> to` and hands the shared
    /// transition back, so it can still be called directly.
    ///
    /// # Panics
    ///
    /// Panics if the format is ordered and `from > to`.
    pub fn migrates<T>(&mut self, from: A::Format, to: A::Format, transition: T) -> Transition
    where
        T: Fn(&Connection, &str) -> DbverResult<()> + Send + Sync + 'static,
    {
        let transition: Transition = Arc::new(transition);
        self.graph.register(from, to, transition.clone());
        transition
    }

    /// Reads the format of `schema` without checking the application id.
    pub fn get_format_unchecked(&self, conn: &Connection, schema: &str) -> DbverResult<A::Format> {
        self.accessor.read_format(conn, schema)
    }

    /// Reads the format of `schema` after checking that it belongs to this
    /// application.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::VersionError`] when the application id does not
    /// match or the stored format is unreadable.
    pub fn get_format(&self, conn: &Connection, schema: &str) -> DbverResult<A::Format> {
        check_application_id(self.application_id, conn, schema)?;
        let format = self.get_format_unchecked(conn, schema)?;
        log::debug!("Schema {:?} is at format {:?}", schema, format);
        Ok(format)
    }

    /// Stamps `schema` with the application id and stores `format`.
    ///
    /// Meant to run inside a transaction; [`Migrations::upgrade`] and
    /// [`Migrations::apply`] take care of that.
    pub fn set_format(&self, conn: &Connection, schema: &str, format: &A::Format) -> DbverResult<()> {
        set_application_id(self.application_id, conn, schema)?;
        self.accessor.write_format(format, conn, schema)?;
        log::debug!("Schema {:?} set to format {:?}", schema, format);
        Ok(())
    }

    /// Computes the walk from `start` under `options` without touching any
    /// database.
    pub fn find_path(
        &self,
        start: &A::Format,
        options: &UpgradeOptions<A::Format>,
    ) -> MigrationPath<A::Format> {
        if let Some(condition) = options.condition_fn() {
            return self.graph.find_path(start, condition);
        }
        if options.is_breaking() {
            return self.graph.find_path(start, |_, _| true);
        }
        self.graph.find_path(start, |from, to| {
            !self.accessor.is_breaking(from, to).unwrap_or(false)
        })
    }

    /// Reads the current format of `schema` and returns the path an
    /// upgrade with `options` would take.
    pub fn plan(
        &self,
        conn: &Connection,
        schema: &str,
        options: &UpgradeOptions<A::Format>,
    ) -> DbverResult<MigrationPath<A::Format>> {
        let current = self.get_format(conn, schema)?;
        Ok(self.find_path(&current, options))
    }

    /// Upgrades `schema` as far as `options` allow and returns the reached
    /// format.
    ///
    /// Everything runs in one transaction opened with the configured lock
    /// mode. The format is written when at least one transition ran, or when
    /// the schema was unprovisioned and the accessor can store that format.
    /// Any failure rolls the whole upgrade back and is returned as is.
    pub fn upgrade(
        &self,
        conn: &Connection,
        schema: &str,
        options: &UpgradeOptions<A::Format>,
    ) -> DbverResult<A::Format> {
        with_transaction(conn, self.lock_mode, |conn| {
            let current = self.get_format(conn, schema)?;
            let unprovisioned = get_application_id(conn, schema)? == 0;
            let path = self.find_path(&current, options);
            for step in path.steps() {
                self.run_step(conn, schema, step)?;
            }
            if !path.is_empty() {
                self.set_format(conn, schema, path.target())?;
                log::info!(
                    "Upgraded schema {:?} from {:?} to {:?}",
                    schema,
                    path.start(),
                    path.target()
                );
            } else if unprovisioned && self.accessor.can_store_unprovisioned() {
                self.set_format(conn, schema, path.target())?;
            }
            Ok(path.into_target())
        })
    }

    /// Runs the single registered edge `from -> to` on `schema` and stores
    /// `to`, in its own transaction.
    ///
    /// # Errors
    ///
    /// * [`ErrorKind::ValidationError`] if no such edge is registered.
    /// * [`ErrorKind::VersionError`] if `schema` is not at `from`.
    pub fn apply(
        &self,
        conn: &Connection,
        schema: &str,
        from: &A::Format,
        to: &A::Format,
    ) -> DbverResult<()> {
        let transition = self.graph.lookup(from, to).cloned().ok_or_else(|| {
            DbverError::new(
                &format!("No migration registered from {:?} to {:?}", from, to),
                ErrorKind::ValidationError,
            )
        })?;
        let step = MigrationStep {
            from: from.clone(),
            to: to.clone(),
            transition,
        };

        with_transaction(conn, self.lock_mode, |conn| {
            let current = self.get_format(conn, schema)?;
            if &current != from {
                return Err(DbverError::version(
                    &format!(
                        "Schema {:?} is at format {:?}, migration expects {:?}",
                        schema, current, from
                    ),
                    VersionContext::new(schema, from, &current),
                ));
            }
            self.run_step(conn, schema, &step)?;
            self.set_format(conn, schema, to)
        })
    }

    fn run_step(
        &self,
        conn: &Connection,
        schema: &str,
        step: &MigrationStep<A::Format>,
    ) -> DbverResult<()> {
        log::info!(
            "Migrating schema {:?} from {:?} to {:?}",
            schema,
            step.from,
            step.to
        );
        (step.transition)(conn, schema).inspect_err(|err| {
            log::error!(
                "Migration {:?} -> {:?} failed on schema {:?}: {}",
                step.from,
                step.to,
                schema,
                err
            )
        })
    }
}

impl<A: FormatAccessor + Debug> Debug for Migrations<A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Migrations")
            .field("accessor", &self.accessor)
            .field("application_id", &self.application_id)
            .field("lock_mode", &self.lock_mode)
            .field("graph", &self.graph)
            .finish()
    }
}
