#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use bytes::Bytes;
use futures_util::StreamExt;
use photometer_fetch::{Download, HttpClient, RawResponse, TransportError, UploadForm};

/// What the scripted client does on its next upload.
pub enum Step {
    Respond(RawResponse),
    Fail(TransportError),
    /// Never answers; only the caller's timeout ends the attempt.
    Hang,
}

pub enum DownloadStep {
    Body(u16, Vec<Bytes>),
    Fail(TransportError),
    /// Status 200 followed by a body that fails mid-way.
    Truncated(Vec<Bytes>),
    /// Status 200, then the chunks, then the body never yields again.
    Stalled(Vec<Bytes>),
}

/// HTTP client replaying a fixed script. Running off the end of the script
/// is a connection failure.
#[derive(Default)]
pub struct ScriptedClient {
    uploads: Mutex<VecDeque<Step>>,
    downloads: Mutex<VecDeque<DownloadStep>>,
    upload_calls: AtomicUsize,
    pub forms: Mutex<Vec<UploadForm>>,
    pub urls: Mutex<Vec<String>>,
}

impl ScriptedClient {
    pub fn uploads(steps: impl IntoIterator<Item = Step>) -> Self {
        let client = Self::default();
        client.uploads.lock().unwrap().extend(steps);
        client
    }

    pub fn downloads(steps: impl IntoIterator<Item = DownloadStep>) -> Self {
        let client = Self::default();
        client.downloads.lock().unwrap().extend(steps);
        client
    }

    pub fn upload_calls(&self) -> usize {
        self.upload_calls.load(Ordering::SeqCst)
    }
}

pub fn json(status: u16, body: &str) -> Step {
    Step::Respond(RawResponse::new(status, body.to_string()))
}

pub fn refused() -> Step {
    Step::Fail(TransportError::Connect("connection refused".to_string()))
}

impl HttpClient for ScriptedClient {
    async fn upload(
        &self,
        url: &str,
        form: UploadForm,
        _timeout: Duration,
    ) -> Result<RawResponse, TransportError> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        self.urls.lock().unwrap().push(url.to_string());
        self.forms.lock().unwrap().push(form);
        let step = self.uploads.lock().unwrap().pop_front();
        match step {
            Some(Step::Respond(response)) => Ok(response),
            Some(Step::Fail(err)) => Err(err),
            Some(Step::Hang) => std::future::pending().await,
            None => Err(TransportError::Connect("script exhausted".to_string())),
        }
    }

    async fn download(&self, url: &str, _timeout: Duration) -> Result<Download, TransportError> {
        self.urls.lock().unwrap().push(url.to_string());
        let step = self.downloads.lock().unwrap().pop_front();
        match step {
            Some(DownloadStep::Body(status, chunks)) => Ok(Download {
                status,
                body: Box::pin(futures_util::stream::iter(chunks.into_iter().map(Ok::<Bytes, TransportError>))),
            }),
            Some(DownloadStep::Truncated(chunks)) => {
                let items = chunks
                    .into_iter()
                    .map(Ok::<Bytes, TransportError>)
                    .chain(std::iter::once(Err(TransportError::Network(
                        "connection reset".to_string(),
                    ))));
                Ok(Download {
                    status: 200,
                    body: Box::pin(futures_util::stream::iter(items)),
                })
            }
            Some(DownloadStep::Stalled(chunks)) => {
                let items = futures_util::stream::iter(chunks.into_iter().map(Ok::<Bytes, TransportError>))
                    .chain(futures_util::stream::pending());
                Ok(Download {
                    status: 200,
                    body: Box::pin(items),
                })
            }
            Some(DownloadStep::Fail(err)) => Err(err),
            None => Err(TransportError::Connect("script exhausted".to_string())),
        }
    }
}
