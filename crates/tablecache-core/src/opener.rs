//! Seam to the component that physically opens and closes remote tables.
//!
//! The cache never talks to the network itself. It receives a [`TableOpener`]
//! at construction and asks it for a fresh [`RawTable`] on every cache miss.

use crate::name::TableName;

/// Boxed error returned by opener implementations.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A raw connection to one remote table.
///
/// `close` is expensive and must not be called twice; the cache guarantees
/// it is invoked at most once per raw table.
pub trait RawTable: Send + Sync + 'static {
    /// Physically releases the underlying connection.
    ///
    /// # Errors
    ///
    /// Returns the transport error if the close fails. The cache logs the
    /// failure and never retries it.
    fn close(&self) -> Result<(), BoxError>;
}

/// Factory for raw table connections.
pub trait TableOpener: Send + Sync {
    /// Raw table type produced by this opener.
    type Table: RawTable;

    /// Opens a new connection to the table called `name`.
    ///
    /// # Errors
    ///
    /// Returns the transport error if the table cannot be opened.
    fn open(&self, name: &TableName) -> Result<Self::Table, BoxError>;

    /// Releases resources held by the opener itself.
    fn shutdown(&self);
}
