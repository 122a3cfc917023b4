//! I/O operations behind the [`HttpClient`] seam.

mod http;
mod processed;
mod upload;

pub use http::{BoxStream, Download, HttpClient, UploadForm};
pub use processed::{DEFAULT_PROCESSED_IMAGE_BASE, ProcessedImageFetcher};
pub use upload::UploadClient;

#[cfg(feature = "reqwest")]
pub use http::ReqwestClient;
