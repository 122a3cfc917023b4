use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use bytes::Bytes;
use futures_util::Stream;

use crate::data::RawResponse;
use crate::error::TransportError;

/// A boxed stream type for HTTP response bodies.
pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = T> + Send + 'a>>;

/// A multipart upload carrying one file part plus text fields.
///
/// Cloning is cheap: the image bytes are reference counted, so every retry
/// reuses the same buffer.
#[derive(Debug, Clone)]
pub struct UploadForm {
    pub file_field: &'static str,
    pub file_name: String,
    pub bytes: Bytes,
    pub fields: Vec<(String, String)>,
}

/// A streaming download. The status is known before the body is consumed.
pub struct Download {
    pub status: u16,
    pub body: BoxStream<'static, Result<Bytes, TransportError>>,
}

impl std::fmt::Debug for Download {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Download")
            .field("status", &self.status)
            .field("body", &"{ ... }")
            .finish()
    }
}

/// Asynchronous HTTP client abstraction.
///
/// The minimal interface the pipeline needs: one multipart POST and one
/// streaming GET. Implementations map their own failures onto
/// [`TransportError`]; any response that arrives, whatever its status, is a
/// success at this layer.
///
/// # Implementations
///
/// - [`ReqwestClient`]: production implementation using `reqwest`
/// - scripted mocks in tests
pub trait HttpClient: Send + Sync {
    /// POST `form` as `multipart/form-data` to `url`.
    fn upload(
        &self,
        url: &str,
        form: UploadForm,
        timeout: Duration,
    ) -> impl Future<Output = Result<RawResponse, TransportError>> + Send;

    /// GET `url` and return the body as a stream.
    fn download(
        &self,
        url: &str,
        timeout: Duration,
    ) -> impl Future<Output = Result<Download, TransportError>> + Send;
}

#[cfg(feature = "reqwest")]
mod reqwest_impl {
    use super::*;
    use futures_util::TryStreamExt;
    use reqwest::multipart::{Form, Part};

    /// Production HTTP client implementation using reqwest.
    #[derive(Debug, Clone)]
    pub struct ReqwestClient {
        client: reqwest::Client,
    }

    impl ReqwestClient {
        pub fn new() -> Result<Self, TransportError> {
            let client = reqwest::Client::builder().build()?;
            Ok(Self { client })
        }

        pub fn with_client(client: reqwest::Client) -> Self {
            Self { client }
        }
    }

    impl HttpClient for ReqwestClient {
        async fn upload(
            &self,
            url: &str,
            form: UploadForm,
            timeout: Duration,
        ) -> Result<RawResponse, TransportError> {
            let part = Part::bytes(form.bytes.to_vec()).file_name(form.file_name);
            let multipart = form
                .fields
                .into_iter()
                .fold(Form::new(), |acc, (key, value)| acc.text(key, value))
                .part(form.file_field, part);

            let response = self
                .client
                .post(url)
                .timeout(timeout)
                .multipart(multipart)
                .send()
                .await?;
            let status = response.status().as_u16();
            let body = response.bytes().await?;

            Ok(RawResponse { status, body })
        }

        async fn download(&self, url: &str, timeout: Duration) -> Result<Download, TransportError> {
            let response = self.client.get(url).timeout(timeout).send().await?;
            let status = response.status().as_u16();
            let body = response.bytes_stream().map_err(TransportError::from);

            Ok(Download {
                status,
                body: Box::pin(body),
            })
        }
    }
}

#[cfg(feature = "reqwest")]
pub use reqwest_impl::ReqwestClient;
