use backtrace::Backtrace;
use rusqlite::ErrorCode;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::result::Result;
use std::sync::Arc;

use crate::common::{atomic, Atomic};

/// Error kinds for dbver operations
///
/// Each kind names one category of failure so callers can decide how to react,
/// e.g. abort startup on a [`ErrorKind::VersionError`] or retry on a
/// [`ErrorKind::DatabaseBusy`].
///
/// # Examples
///
/// ```rust
/// use dbver::errors::{DbverError, DbverResult, ErrorKind};
///
/// fn example() -> DbverResult<()> {
///     Err(DbverError::new("schema name is empty", ErrorKind::ValidationError))
/// }
/// assert!(example().is_err());
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ErrorKind {
    /// The database does not have the expected identity or format: application
    /// id mismatch, rejected breaking change, unreadable stored format.
    VersionError,

    /// An argument failed local validation (schema name, counter range, ...)
    ValidationError,

    /// The SQLite engine could not get a lock (`SQLITE_BUSY` or
    /// `SQLITE_LOCKED`)
    DatabaseBusy,

    /// Any other error raised by the underlying SQLite engine
    BackendError,

    /// Internal error (usually indicates a bug)
    InternalError,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::VersionError => write!(f, "Version error"),
            ErrorKind::ValidationError => write!(f, "Validation error"),
            ErrorKind::DatabaseBusy => write!(f, "Database busy"),
            ErrorKind::BackendError => write!(f, "Backend error"),
            ErrorKind::InternalError => write!(f, "Internal error"),
        }
    }
}

/// What a [`ErrorKind::VersionError`] was about: which schema, what was
/// expected and what was actually found. Values are rendered with `Debug` so
/// any format type fits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionContext {
    pub schema: String,
    pub expected: String,
    pub actual: String,
}

impl VersionContext {
    pub fn new<E: Debug, A: Debug>(schema: &str, expected: E, actual: A) -> Self {
        VersionContext {
            schema: schema.to_string(),
            expected: format!("{:?}", expected),
            actual: format!("{:?}", actual),
        }
    }
}

/// Custom dbver error type.
///
/// `DbverError` carries a message, an [`ErrorKind`], an optional cause and,
/// for version errors, a [`VersionContext`]. Errors converted from
/// `rusqlite::Error` keep the engine error, reachable through
/// [`DbverError::sqlite_error`] and `Error::source`. A backtrace is captured
/// on creation and printed by the `Debug` implementation.
///
/// # Examples
///
/// ```rust
/// use dbver::errors::{DbverError, ErrorKind, VersionContext};
///
/// let err = DbverError::version(
///     "application id mismatch",
///     VersionContext::new("main", 1, 2),
/// );
/// assert_eq!(err.kind(), &ErrorKind::VersionError);
/// assert_eq!(err.version_context().unwrap().actual, "2");
/// ```
#[derive(Clone)]
pub struct DbverError {
    message: String,
    error_kind: ErrorKind,
    cause: Option<Box<DbverError>>,
    version_context: Option<VersionContext>,
    sqlite_error: Option<Arc<rusqlite::Error>>,
    backtrace: Atomic<Backtrace>,
}

impl DbverError {
    /// Creates a new `DbverError` with the specified message and error kind.
    pub fn new(message: &str, error_kind: ErrorKind) -> Self {
        DbverError {
            message: message.to_string(),
            error_kind,
            cause: None,
            version_context: None,
            sqlite_error: None,
            backtrace: atomic(Backtrace::new()),
        }
    }

    /// Creates a new `DbverError` that wraps `cause`.
    pub fn new_with_cause(message: &str, error_kind: ErrorKind, cause: DbverError) -> Self {
        DbverError {
            message: message.to_string(),
            error_kind,
            cause: Some(Box::new(cause)),
            version_context: None,
            sqlite_error: None,
            backtrace: atomic(Backtrace::new()),
        }
    }

    /// Creates a [`ErrorKind::VersionError`] carrying `context`.
    pub fn version(message: &str, context: VersionContext) -> Self {
        DbverError {
            message: message.to_string(),
            error_kind: ErrorKind::VersionError,
            cause: None,
            version_context: Some(context),
            sqlite_error: None,
            backtrace: atomic(Backtrace::new()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.error_kind
    }

    pub fn cause(&self) -> Option<&DbverError> {
        self.cause.as_deref()
    }

    pub fn version_context(&self) -> Option<&VersionContext> {
        self.version_context.as_ref()
    }

    /// The engine error this error was converted from, if any.
    pub fn sqlite_error(&self) -> Option<&rusqlite::Error> {
        self.sqlite_error.as_deref()
    }

    /// The SQLite result code of the engine error, if any.
    pub fn sqlite_error_code(&self) -> Option<ErrorCode> {
        self.sqlite_error().and_then(|err| err.sqlite_error_code())
    }
}

impl Display for DbverError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Debug for DbverError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // print error message with stack trace followed by cause
        match &self.cause {
            Some(cause) => write!(f, "{}\nCaused by: {:?}", self.message, cause),
            None => write!(f, "{}\n{:?}", self.message, self.backtrace.read()),
        }
    }
}

impl Error for DbverError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match (&self.cause, &self.sqlite_error) {
            (Some(cause), _) => Some(cause.as_ref()),
            (None, Some(err)) => Some(err.as_ref()),
            (None, None) => None,
        }
    }
}

/// A result type alias for dbver operations.
pub type DbverResult<T> = Result<T, DbverError>;

impl From<rusqlite::Error> for DbverError {
    fn from(err: rusqlite::Error) -> Self {
        let error_kind = match err.sqlite_error_code() {
            Some(ErrorCode::DatabaseBusy) | Some(ErrorCode::DatabaseLocked) => {
                ErrorKind::DatabaseBusy
            }
            _ => ErrorKind::BackendError,
        };
        let mut error = DbverError::new(&format!("SQLite error: {}", err), error_kind);
        error.sqlite_error = Some(Arc::new(err));
        error
    }
}

impl From<String> for DbverError {
    fn from(msg: String) -> Self {
        DbverError::new(&msg, ErrorKind::InternalError)
    }
}

impl From<&str> for DbverError {
    fn from(msg: &str) -> Self {
        DbverError::new(msg, ErrorKind::InternalError)
    }
}
