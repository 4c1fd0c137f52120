use rusqlite::Connection;
use std::fmt::{Display, Formatter};

use super::user_version::ensure_unprovisioned;
use super::FormatAccessor;
use crate::common::{SEMVER_MAJOR_FACTOR, SEMVER_MINOR_FACTOR, UNPROVISIONED_VERSION};
use crate::errors::{DbverError, DbverResult, ErrorKind, VersionContext};
use crate::probe::{get_user_version, set_user_version};

/// A semantic version decomposed from its integer encoding
/// `major * 1_000_000 + minor * 1_000 + patch`.
///
/// # Examples
///
/// ```rust
/// use dbver::format::SemVer;
///
/// let version = SemVer::from_u32(1_002_003);
/// assert_eq!((version.major, version.minor, version.patch), (1, 2, 3));
/// assert_eq!(version.to_string(), "1.2.3");
/// assert_eq!(SemVer::new(2, 0, 1).encode().unwrap(), 2_000_001);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SemVer {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl SemVer {
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        SemVer {
            major,
            minor,
            patch,
        }
    }

    pub fn from_u32(version: u32) -> Self {
        SemVer {
            major: version / SEMVER_MAJOR_FACTOR,
            minor: (version / SEMVER_MINOR_FACTOR) % SEMVER_MINOR_FACTOR,
            patch: version % SEMVER_MINOR_FACTOR,
        }
    }

    /// Encodes the version back into a single integer.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::ValidationError`] if minor or patch is 1000 or
    /// more, or if the encoded value overflows `u32`.
    pub fn encode(&self) -> DbverResult<u32> {
        if self.minor >= SEMVER_MINOR_FACTOR || self.patch >= SEMVER_MINOR_FACTOR {
            return Err(DbverError::new(
                &format!("Minor and patch of {} must be below 1000", self),
                ErrorKind::ValidationError,
            ));
        }
        self.major
            .checked_mul(SEMVER_MAJOR_FACTOR)
            .and_then(|v| v.checked_add(self.minor * SEMVER_MINOR_FACTOR + self.patch))
            .ok_or_else(|| {
                DbverError::new(
                    &format!("Version {} does not fit in 32 bits", self),
                    ErrorKind::ValidationError,
                )
            })
    }
}

impl From<u32> for SemVer {
    fn from(version: u32) -> Self {
        SemVer::from_u32(version)
    }
}

impl Display for SemVer {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Classifies a transition between two encoded semantic versions.
///
/// - from `0` (unprovisioned) nothing is breaking;
/// - moving backward is breaking, even by a patch level;
/// - moving forward across a major boundary is breaking;
/// - anything else (minor/patch advance, no-op) is not.
pub fn semver_is_breaking(from: u32, to: u32) -> bool {
    if from == UNPROVISIONED_VERSION {
        return false;
    }
    if to < from {
        return true;
    }
    SemVer::from_u32(from).major != SemVer::from_u32(to).major
}

/// Fails with [`ErrorKind::VersionError`] if `from -> to` is breaking.
pub fn semver_check_breaking(from: u32, to: u32) -> DbverResult<()> {
    if semver_is_breaking(from, to) {
        return Err(DbverError::new(
            &format!(
                "Change from {} to {} is breaking",
                SemVer::from_u32(from),
                SemVer::from_u32(to)
            ),
            ErrorKind::VersionError,
        ));
    }
    Ok(())
}

/// Format stored as an encoded semantic version in `PRAGMA user_version`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SemverFormat;

impl FormatAccessor for SemverFormat {
    type Format = u32;

    fn read_format(&self, conn: &Connection, schema: &str) -> DbverResult<u32> {
        let raw = get_user_version(conn, schema)?;
        let version = u32::try_from(raw).map_err(|_| {
            DbverError::version(
                &format!("Schema {:?} has negative version {}", schema, raw),
                VersionContext::new(schema, "non-negative version", raw),
            )
        })?;
        if version == UNPROVISIONED_VERSION {
            ensure_unprovisioned(conn, schema)?;
        }
        Ok(version)
    }

    fn write_format(&self, format: &u32, conn: &Connection, schema: &str) -> DbverResult<()> {
        set_user_version(*format as i64, conn, schema)
    }

    fn is_breaking(&self, from: &u32, to: &u32) -> Option<bool> {
        Some(semver_is_breaking(*from, *to))
    }

    fn is_ordered(&self) -> bool {
        true
    }
}
