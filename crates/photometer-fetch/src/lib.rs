//! Network side of the photometer pipeline.
//!
//! # Architecture
//!
//! The crate follows the same three-layer split as the rest of the workspace:
//! - [`data`] - request kinds, options and upload outcomes
//! - [`core`] - pure helpers (response classification, file names)
//! - `effects` - the [`HttpClient`] seam and the two network operations built on it
//!
//! [`UploadClient`] owns the retrying multipart exchange with the inference
//! service. [`ProcessedImageFetcher`] performs the single best-effort download
//! of the annotated image.

pub mod core;
pub mod data;
mod effects;
mod error;

pub use data::options::DEFAULT_UPLOAD_URL;
pub use data::{
    RawResponse, RequestKind, RetryPolicy, UnknownRequestKind, UploadOptions, UploadOutcome,
};
pub use effects::{
    BoxStream, DEFAULT_PROCESSED_IMAGE_BASE, Download, HttpClient, ProcessedImageFetcher,
    UploadClient, UploadForm,
};

#[cfg(feature = "reqwest")]
pub use effects::ReqwestClient;

pub use error::{FetchError, TransportError};
