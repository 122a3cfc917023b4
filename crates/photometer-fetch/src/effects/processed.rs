use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::core::{processed_image_url, remote_file_name};
use crate::effects::http::HttpClient;
use crate::error::{FetchError, Result, TransportError};

/// Default endpoint serving annotated images by file name.
pub const DEFAULT_PROCESSED_IMAGE_BASE: &str = "https://chemistryplsmodel.com/processed_image/";

/// Downloads the annotated image the service produced for an upload.
///
/// Exactly one attempt per call. The image is streamed into a hidden staging
/// file inside `download_dir` and renamed into place only once complete, so a
/// returned path always points at a whole file.
pub struct ProcessedImageFetcher<C: HttpClient> {
    client: Arc<C>,
    base_url: String,
    download_dir: PathBuf,
    timeout: Duration,
}

impl<C: HttpClient> ProcessedImageFetcher<C> {
    pub fn new(client: Arc<C>, download_dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            base_url: DEFAULT_PROCESSED_IMAGE_BASE.to_string(),
            download_dir: download_dir.into(),
            timeout: Duration::from_secs(30),
        }
    }

    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    /// Fetch `remote_name` and return the local path it was stored at.
    pub async fn fetch(&self, remote_name: &str) -> Result<PathBuf> {
        self.fetch_named(remote_name, None).await
    }

    /// Like [`fetch`](Self::fetch), but stores the image as
    /// `<tag>-<file name>`. Distinct tags never share a local file, even when
    /// the service reuses a name.
    pub async fn fetch_tagged(&self, remote_name: &str, tag: &str) -> Result<PathBuf> {
        self.fetch_named(remote_name, Some(tag)).await
    }

    async fn fetch_named(&self, remote_name: &str, tag: Option<&str>) -> Result<PathBuf> {
        let file_name = remote_file_name(remote_name)
            .ok_or_else(|| FetchError::InvalidFilename(remote_name.to_string()))?;
        let url = processed_image_url(&self.base_url, file_name);
        let local_name = match tag {
            Some(tag) => format!("{tag}-{file_name}"),
            None => file_name.to_string(),
        };
        debug!(%url, local = %local_name, "fetching processed image");

        match tokio::time::timeout(self.timeout, self.fetch_to_disk(&url, &local_name)).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Transport(TransportError::Timeout)),
        }
    }

    async fn fetch_to_disk(&self, url: &str, local_name: &str) -> Result<PathBuf> {
        let download = self.client.download(url, self.timeout).await?;
        if download.status != 200 {
            return Err(FetchError::Status(download.status));
        }

        tokio::fs::create_dir_all(&self.download_dir)
            .await
            .map_err(|source| FetchError::Io {
                path: self.download_dir.clone(),
                source,
            })?;

        let destination = self.download_dir.join(local_name);
        let staging = StagingFile::new(self.download_dir.join(format!(".{local_name}.part")));

        let bytes = stream_to_file(download.body, staging.path()).await?;
        staging.commit(&destination).await?;

        debug!(path = %destination.display(), bytes, "processed image stored");
        Ok(destination)
    }
}

/// A partially written download. Removed on drop unless committed, which
/// covers error returns and a timeout dropping the fetch mid-stream.
struct StagingFile {
    path: PathBuf,
    committed: bool,
}

impl StagingFile {
    fn new(path: PathBuf) -> Self {
        Self {
            path,
            committed: false,
        }
    }

    fn path(&self) -> &Path {
        &self.path
    }

    async fn commit(mut self, destination: &Path) -> Result<()> {
        tokio::fs::rename(&self.path, destination)
            .await
            .map_err(|source| FetchError::Io {
                path: destination.to_path_buf(),
                source,
            })?;
        self.committed = true;
        Ok(())
    }
}

impl Drop for StagingFile {
    fn drop(&mut self) {
        if !self.committed {
            let _ = std::fs::remove_file(&self.path);
        }
    }
}

async fn stream_to_file(
    mut body: crate::effects::http::BoxStream<'static, std::result::Result<bytes::Bytes, TransportError>>,
    path: &Path,
) -> Result<u64> {
    let io_err = |source| FetchError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut file = tokio::fs::File::create(path).await.map_err(io_err)?;
    let mut written = 0u64;

    while let Some(chunk) = body.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await.map_err(io_err)?;
        written += chunk.len() as u64;
    }

    file.sync_all().await.map_err(io_err)?;
    Ok(written)
}
