use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, warn};

use crate::core::service_error;
use crate::data::{RawResponse, RequestKind, UploadOptions, UploadOutcome};
use crate::effects::http::{HttpClient, UploadForm};
use crate::error::TransportError;

/// Multipart field carrying the image bytes.
const FILE_FIELD: &str = "file";
/// Text field carrying the [`RequestKind`] tag.
const KIND_FIELD: &str = "model_type";

/// Sends a captured image to the inference service.
///
/// One call to [`send`](Self::send) is one attempt chain: transport failures
/// are retried according to [`RetryPolicy`](crate::RetryPolicy); a response
/// that flags an error ends the chain immediately. The client touches nothing
/// but the network.
pub struct UploadClient<C: HttpClient> {
    client: Arc<C>,
    options: UploadOptions,
}

impl<C: HttpClient> UploadClient<C> {
    pub fn new(client: Arc<C>, options: UploadOptions) -> Self {
        Self { client, options }
    }

    pub fn options(&self) -> &UploadOptions {
        &self.options
    }

    pub async fn send(&self, image_path: &Path, kind: RequestKind) -> UploadOutcome {
        let form = match read_form(image_path, kind).await {
            Ok(form) => form,
            Err(err) => {
                warn!(path = %image_path.display(), error = %err, "image unreadable, not uploading");
                return UploadOutcome::TransportError(err);
            }
        };

        let policy = self.options.retry;
        let mut retry = 0u32;

        loop {
            debug!(
                attempt = retry + 1,
                attempts = policy.attempts(),
                kind = %kind,
                url = %self.options.url,
                "uploading sample"
            );

            match self.attempt(form.clone()).await {
                Ok(response) => return classify(response),
                Err(err) if err.is_retryable() && retry < policy.max_retries => {
                    let delay = policy.delay;
                    retry += 1;
                    warn!(
                        error = %err,
                        retry,
                        max_retries = policy.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        "upload failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) => {
                    warn!(error = %err, attempts = retry + 1, "upload failed, giving up");
                    return UploadOutcome::TransportError(err);
                }
            }
        }
    }

    /// One bounded attempt. The local timeout guards clients that do not
    /// enforce the one they are handed.
    async fn attempt(&self, form: UploadForm) -> Result<RawResponse, TransportError> {
        let timeout = self.options.timeout;
        match tokio::time::timeout(timeout, self.client.upload(&self.options.url, form, timeout)).await {
            Ok(result) => result,
            Err(_) => Err(TransportError::Timeout),
        }
    }
}

async fn read_form(image_path: &Path, kind: RequestKind) -> Result<UploadForm, TransportError> {
    let bytes = tokio::fs::read(image_path)
        .await
        .map_err(|e| TransportError::ImageRead {
            path: image_path.to_path_buf(),
            message: e.to_string(),
        })?;
    let file_name = image_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "sample.jpg".to_string());

    Ok(UploadForm {
        file_field: FILE_FIELD,
        file_name,
        bytes: Bytes::from(bytes),
        fields: vec![(KIND_FIELD.to_string(), kind.as_str().to_string())],
    })
}

fn classify(response: RawResponse) -> UploadOutcome {
    if let Some(message) = service_error(&response.body) {
        debug!(status = response.status, %message, "service reported an error");
        return UploadOutcome::ServiceError(message);
    }
    if !response.is_success() {
        debug!(status = response.status, body = %response.text(), "service returned failure status");
        return UploadOutcome::ServiceError(format!(
            "service responded with status {}",
            response.status
        ));
    }
    UploadOutcome::Success(response)
}
