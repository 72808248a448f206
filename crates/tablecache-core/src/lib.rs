//! # `tablecache` Core
//!
//! Bounded cache of shared connections to remote tables.
//!
//! Opening a table connection is expensive and closing one while another
//! caller still uses it is unsafe. [`TableCache`] hands out [`TableHandle`]s
//! that reuse cached connections, keeps at most a configured number of them
//! open with least-recently-used eviction, and defers the physical close of
//! an evicted table until its last handle is released.
//!
//! ## Quick Start
//!
//! ```rust
//! use tablecache_core::{BoxError, RawTable, TableCache, TableName, TableOpener};
//!
//! struct Conn;
//!
//! impl RawTable for Conn {
//!     fn close(&self) -> Result<(), BoxError> {
//!         Ok(())
//!     }
//! }
//!
//! struct Opener;
//!
//! impl TableOpener for Opener {
//!     type Table = Conn;
//!
//!     fn open(&self, _name: &TableName) -> Result<Conn, BoxError> {
//!         Ok(Conn)
//!     }
//!
//!     fn shutdown(&self) {}
//! }
//!
//! let cache = TableCache::new(Opener, 1000)?;
//! let table = cache.get_handle(&TableName::from("index_table"))?;
//! // ... use `table` through `Deref` ...
//! table.release();
//! cache.shutdown();
//! # Ok::<(), tablecache_core::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]

pub mod cache;
pub mod config;
pub mod error;
#[cfg(test)]
mod error_tests;
pub mod name;
pub mod opener;

pub use cache::{CacheStats, TableCache, TableHandle};
pub use config::{CacheConfig, ConfigError, TableCacheConfig, DEFAULT_CACHE_SIZE};
pub use error::{Error, Result};
pub use name::TableName;
pub use opener::{BoxError, RawTable, TableOpener};
