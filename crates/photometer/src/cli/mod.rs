pub mod app;
pub mod history;
pub mod measure;

use std::sync::Arc;

use anyhow::Result;
use photometer::Config;
use photometer_store::{BlobStore, FileStore};

/// The blob store backing history and the usage log.
pub fn open_store(config: &Config) -> Result<Arc<dyn BlobStore>> {
    Ok(Arc::new(FileStore::new(config.data_dir()?)))
}
