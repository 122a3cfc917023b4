//! Pure transformations used by the network operations.
//!
//! Nothing in here performs I/O.

mod filename;
mod response;

pub use filename::{processed_image_url, remote_file_name};
pub use response::service_error;
