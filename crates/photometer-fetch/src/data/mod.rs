//! Immutable configuration and result types for the upload exchange.

pub mod options;
pub mod outcome;
pub mod request;

pub use options::{RetryPolicy, UploadOptions};
pub use outcome::{RawResponse, UploadOutcome};
pub use request::{RequestKind, UnknownRequestKind};
