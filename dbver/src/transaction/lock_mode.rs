use std::fmt::{Display, Formatter};

/// Lock strictness requested when a transaction begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LockMode {
    /// No lock until the first read or write.
    Deferred,
    /// Write lock taken immediately; other connections may still read.
    #[default]
    Immediate,
    /// No other connection may read or write until the transaction ends.
    Exclusive,
}

impl LockMode {
    pub(crate) fn begin_statement(&self) -> &'static str {
        match self {
            LockMode::Deferred => "BEGIN DEFERRED",
            LockMode::Immediate => "BEGIN IMMEDIATE",
            LockMode::Exclusive => "BEGIN EXCLUSIVE",
        }
    }
}

impl Display for LockMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LockMode::Deferred => write!(f, "deferred"),
            LockMode::Immediate => write!(f, "immediate"),
            LockMode::Exclusive => write!(f, "exclusive"),
        }
    }
}
