use std::fmt::{Debug, Formatter};

use super::Transition;

/// One edge taken by a walk.
#[derive(Clone)]
pub struct MigrationStep<F> {
    pub from: F,
    pub to: F,
    pub transition: Transition,
}

impl<F: Debug> Debug for MigrationStep<F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} -> {:?}", self.from, self.to)
    }
}

/// Result of a path search: where it started, where it ends and the steps
/// in between, in walk order.
///
/// An empty path means the start is already at the allowed frontier; its
/// target equals its start.
#[derive(Clone)]
pub struct MigrationPath<F> {
    start: F,
    target: F,
    steps: Vec<MigrationStep<F>>,
}

impl<F: Clone> MigrationPath<F> {
    pub(crate) fn new(start: F, steps: Vec<MigrationStep<F>>) -> Self {
        let target = steps
            .last()
            .map(|step| step.to.clone())
            .unwrap_or_else(|| start.clone());
        MigrationPath {
            start,
            target,
            steps,
        }
    }

    pub fn start(&self) -> &F {
        &self.start
    }

    pub fn target(&self) -> &F {
        &self.target
    }

    pub fn steps(&self) -> &[MigrationStep<F>] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn into_target(self) -> F {
        self.target
    }
}

impl<F: Debug> Debug for MigrationPath<F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MigrationPath")
            .field("start", &self.start)
            .field("target", &self.target)
            .field("steps", &self.steps)
            .finish()
    }
}
