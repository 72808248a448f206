//! Table names used as cache keys.
//!
//! A [`TableName`] is an immutable byte sequence compared by value: two names
//! built from identical bytes address the same cache entry, regardless of the
//! buffer they were created from.

use bytes::Bytes;
use std::fmt;

/// Immutable, cheaply clonable table identifier.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct TableName(Bytes);

impl TableName {
    /// Creates a name from any owned byte container.
    #[must_use]
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self(bytes.into())
    }

    /// Creates a name from a static string without copying.
    #[must_use]
    pub const fn from_static(name: &'static str) -> Self {
        Self(Bytes::from_static(name.as_bytes()))
    }

    /// Copies `bytes` into a new name.
    ///
    /// The copy guarantees that later writes to the caller's buffer never
    /// alias a key held by the cache.
    #[must_use]
    pub fn copy_from_slice(bytes: &[u8]) -> Self {
        Self(Bytes::copy_from_slice(bytes))
    }

    /// Returns the raw bytes of the name.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Number of bytes in the name.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` for the empty name.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for TableName {
    fn from(name: &str) -> Self {
        Self::copy_from_slice(name.as_bytes())
    }
}

impl From<String> for TableName {
    fn from(name: String) -> Self {
        Self(Bytes::from(name))
    }
}

impl From<&[u8]> for TableName {
    fn from(bytes: &[u8]) -> Self {
        Self::copy_from_slice(bytes)
    }
}

impl From<Vec<u8>> for TableName {
    fn from(bytes: Vec<u8>) -> Self {
        Self(Bytes::from(bytes))
    }
}

impl From<Bytes> for TableName {
    fn from(bytes: Bytes) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for TableName {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

impl fmt::Debug for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TableName")
            .field(&String::from_utf8_lossy(&self.0))
            .finish()
    }
}
