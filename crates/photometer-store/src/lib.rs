//! Durable key/value blob storage.
//!
//! Values are opaque byte blobs addressed by short string keys. The
//! [`FileStore`] keeps one file per key and replaces it atomically on every
//! write, so a reader never observes a half-written blob. [`MemoryStore`] is
//! the process-local variant used by tests and ephemeral front ends.

mod atomic;
mod blob;
mod error;

pub use atomic::{AtomicWriteOptions, atomic_read, atomic_write};
pub use blob::{BlobStore, BlobStoreExt, FileStore, MemoryStore, validate_key};
pub use error::{Error, Result};
