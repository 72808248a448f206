//! Error types for `tablecache`.
//!
//! Only [`Error::Open`] and [`Error::Config`] ever reach callers. Close
//! failures are built as [`Error::Close`] for logging and then swallowed.

use thiserror::Error;

use crate::config::ConfigError;
use crate::name::TableName;
use crate::opener::BoxError;

/// Result type alias for `tablecache` operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in `tablecache` operations.
///
/// Error codes follow the pattern `TCACHE-XXX` for easy grepping in logs.
#[derive(Error, Debug)]
pub enum Error {
    /// The opener failed to open a table (TCACHE-001).
    #[error("[TCACHE-001] Failed to open table '{name}': {source}")]
    Open {
        /// Table that could not be opened.
        name: TableName,
        /// Transport error reported by the opener.
        #[source]
        source: BoxError,
    },

    /// A physical close failed (TCACHE-002).
    #[error("[TCACHE-002] Failed to close table '{name}': {source}")]
    Close {
        /// Table whose close failed.
        name: TableName,
        /// Transport error reported by the raw table.
        #[source]
        source: BoxError,
    },

    /// Invalid cache configuration (TCACHE-003).
    #[error("[TCACHE-003] Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Returns the error code (e.g., "TCACHE-001").
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Open { .. } => "TCACHE-001",
            Self::Close { .. } => "TCACHE-002",
            Self::Config(_) => "TCACHE-003",
        }
    }

    /// Returns true if retrying the failed operation can succeed.
    ///
    /// A failed open leaves no cache entry behind, so the next
    /// `get_handle` retries it. Configuration errors need a fix first.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Config(_))
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}
