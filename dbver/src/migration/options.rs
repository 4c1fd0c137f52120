use std::fmt::{Debug, Formatter};

type Condition<F> = Box<dyn Fn(&F, &F) -> bool>;

/// Constraints for one upgrade.
///
/// The default follows the format's own breaking-change policy. `breaking`
/// lifts every restriction, and a `condition` replaces both.
///
/// # Examples
///
/// ```rust
/// use dbver::migration::UpgradeOptions;
///
/// // upgrade as far as possible without passing 1.1.0
/// let options = UpgradeOptions::<u32>::new().condition(|_start, to| *to <= 1_001_000);
/// assert!(options.has_condition());
/// ```
pub struct UpgradeOptions<F> {
    breaking: bool,
    condition: Option<Condition<F>>,
}

impl<F> UpgradeOptions<F> {
    pub fn new() -> Self {
        UpgradeOptions {
            breaking: false,
            condition: None,
        }
    }

    /// Allows transitions the format's policy classifies as breaking.
    pub fn breaking(mut self, breaking: bool) -> Self {
        self.breaking = breaking;
        self
    }

    /// Filters candidate targets with `condition(start, candidate)`, where
    /// `start` is the format the upgrade began from.
    pub fn condition<C>(mut self, condition: C) -> Self
    where
        C: Fn(&F, &F) -> bool + 'static,
    {
        self.condition = Some(Box::new(condition));
        self
    }

    pub fn is_breaking(&self) -> bool {
        self.breaking
    }

    pub fn has_condition(&self) -> bool {
        self.condition.is_some()
    }

    pub(crate) fn condition_fn(&self) -> Option<&dyn Fn(&F, &F) -> bool> {
        self.condition.as_deref()
    }
}

impl<F> Default for UpgradeOptions<F> {
    fn default() -> Self {
        UpgradeOptions::new()
    }
}

impl<F> Debug for UpgradeOptions<F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpgradeOptions")
            .field("breaking", &self.breaking)
            .field("condition", &self.condition.is_some())
            .finish()
    }
}
