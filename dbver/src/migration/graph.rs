use itertools::Itertools;
use rusqlite::Connection;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use super::{MigrationPath, MigrationStep};
use crate::errors::DbverResult;

/// A transition procedure. It receives the connection and the name of the
/// schema to migrate and runs inside the caller's transaction.
pub type Transition = Arc<dyn Fn(&Connection, &str) -> DbverResult<()> + Send + Sync>;

/// Directed graph of transitions keyed by `from`, then by `to`.
///
/// An ordered graph only accepts forward edges (`from <= to`). Registering a
/// backward edge on it is a programming error and panics.
#[derive(Clone)]
pub struct MigrationGraph<F> {
    edges: BTreeMap<F, BTreeMap<F, Transition>>,
    ordered: bool,
}

impl<F: Ord + Clone + Debug> MigrationGraph<F> {
    pub fn new(ordered: bool) -> Self {
        MigrationGraph {
            edges: BTreeMap::new(),
            ordered,
        }
    }

    pub fn is_ordered(&self) -> bool {
        self.ordered
    }

    /// Adds the edge `from -> to`, replacing any previous transition for the
    /// same pair.
    ///
    /// # Panics
    ///
    /// Panics if the graph is ordered and `from > to`.
    pub fn register(&mut self, from: F, to: F, transition: Transition) {
        assert!(
            !self.ordered || from <= to,
            "Backward migration {:?} -> {:?} registered on an ordered graph",
            from,
            to
        );
        log::debug!("Registered migration {:?} -> {:?}", from, to);
        self.edges
            .entry(from)
            .or_default()
            .insert(to, transition);
    }

    /// Edges leaving `from`, keyed by target.
    pub fn edges_from(&self, from: &F) -> Option<&BTreeMap<F, Transition>> {
        self.edges.get(from)
    }

    pub fn lookup(&self, from: &F, to: &F) -> Option<&Transition> {
        self.edges.get(from).and_then(|targets| targets.get(to))
    }

    /// Every format that has at least one outgoing edge, in order.
    pub fn all_sources(&self) -> impl Iterator<Item = &F> {
        self.edges.keys()
    }

    pub fn source_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Walks the graph greedily from `start`.
    ///
    /// `filter(start, candidate)` decides whether an edge ending at
    /// `candidate` may be taken; it always sees the start of the walk, not
    /// the current node. Among passing edges the one with the greatest
    /// target wins. A `(from, to)` pair is taken at most once, so cycles
    /// terminate.
    pub fn find_path<P>(&self, start: &F, filter: P) -> MigrationPath<F>
    where
        P: Fn(&F, &F) -> bool,
    {
        let mut taken: BTreeSet<(F, F)> = BTreeSet::new();
        let mut steps = Vec::new();
        let mut current = start.clone();

        while let Some((to, transition)) = self.edges.get(&current).and_then(|targets| {
            targets.iter().rev().find(|&(to, _)| {
                filter(start, to) && !taken.contains(&(current.clone(), to.clone()))
            })
        }) {
            taken.insert((current.clone(), to.clone()));
            steps.push(MigrationStep {
                from: current.clone(),
                to: to.clone(),
                transition: transition.clone(),
            });
            current = to.clone();
        }

        let path = MigrationPath::new(start.clone(), steps);
        if path.is_empty() {
            log::debug!("No migration applies from {:?}", start);
        } else {
            log::debug!(
                "Found migration path {:?} -> {}",
                start,
                path.steps().iter().map(|step| format!("{:?}", step.to)).join(" -> ")
            );
        }
        path
    }
}

impl<F: Ord + Clone + Debug> Default for MigrationGraph<F> {
    fn default() -> Self {
        MigrationGraph::new(false)
    }
}

impl<F: Debug> Debug for MigrationGraph<F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for (from, targets) in &self.edges {
            map.entry(from, &targets.keys().collect::<Vec<_>>());
        }
        map.finish()
    }
}
