#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use bytes::Bytes;
use photometer::{
    Notifier, PersistentLog, RequestKind, ResponseFormatter, ResultOrchestrator, Severity,
    SharedResultState,
};
use photometer_fetch::{
    Download, HttpClient, ProcessedImageFetcher, RawResponse, TransportError, UploadClient,
    UploadForm, UploadOptions,
};
use photometer_store::MemoryStore;
use tokio::sync::Notify;

pub const EXAMPLE_BODY: &str =
    r#"{"concentration": 5.0, "absorbance": 0.123456, "rgb": {"red": 200, "green": 50, "blue": 10}}"#;

pub const WITH_PROCESSED_IMAGE: &str = r#"{"concentration": 5.0, "absorbance": 0.123456, "rgb": {"red": 200, "green": 50, "blue": 10}, "processed_image": "processed_sample.jpg"}"#;

pub enum Step {
    Respond(RawResponse),
    Fail(TransportError),
    /// Answer only once the gate is opened.
    Gated(Arc<Notify>, RawResponse),
}

pub enum DownloadStep {
    Body(u16, Vec<Bytes>),
    Fail(TransportError),
    Gated(Arc<Notify>, Vec<Bytes>),
}

type Hook = Box<dyn Fn() + Send + Sync>;

/// Replays a fixed script of upload and download results.
#[derive(Default)]
pub struct ScriptedClient {
    uploads: Mutex<VecDeque<Step>>,
    downloads: Mutex<VecDeque<DownloadStep>>,
    upload_calls: AtomicUsize,
    download_calls: AtomicUsize,
    on_download: Mutex<Option<Hook>>,
    /// Signalled whenever a gated step starts waiting.
    pub entered: Notify,
}

impl ScriptedClient {
    pub fn new(
        uploads: impl IntoIterator<Item = Step>,
        downloads: impl IntoIterator<Item = DownloadStep>,
    ) -> Self {
        let client = Self::default();
        client.uploads.lock().unwrap().extend(uploads);
        client.downloads.lock().unwrap().extend(downloads);
        client
    }

    /// Run `hook` at the start of every download.
    pub fn on_download(&self, hook: impl Fn() + Send + Sync + 'static) {
        *self.on_download.lock().unwrap() = Some(Box::new(hook));
    }

    pub fn upload_calls(&self) -> usize {
        self.upload_calls.load(Ordering::SeqCst)
    }

    pub fn download_calls(&self) -> usize {
        self.download_calls.load(Ordering::SeqCst)
    }
}

pub fn json(status: u16, body: &str) -> Step {
    Step::Respond(RawResponse::new(status, body.to_string()))
}

pub fn refused() -> Step {
    Step::Fail(TransportError::Connect("connection refused".to_string()))
}

fn body(chunks: Vec<Bytes>) -> Download {
    Download {
        status: 200,
        body: Box::pin(futures_util::stream::iter(
            chunks.into_iter().map(Ok::<Bytes, TransportError>),
        )),
    }
}

impl HttpClient for ScriptedClient {
    async fn upload(
        &self,
        _url: &str,
        _form: UploadForm,
        _timeout: Duration,
    ) -> Result<RawResponse, TransportError> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        let step = self.uploads.lock().unwrap().pop_front();
        match step {
            Some(Step::Respond(response)) => Ok(response),
            Some(Step::Fail(err)) => Err(err),
            Some(Step::Gated(gate, response)) => {
                self.entered.notify_one();
                gate.notified().await;
                Ok(response)
            }
            None => Err(TransportError::Connect("script exhausted".to_string())),
        }
    }

    async fn download(&self, _url: &str, _timeout: Duration) -> Result<Download, TransportError> {
        self.download_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(hook) = self.on_download.lock().unwrap().as_ref() {
            hook();
        }
        let step = self.downloads.lock().unwrap().pop_front();
        match step {
            Some(DownloadStep::Body(status, chunks)) => Ok(Download {
                status,
                ..body(chunks)
            }),
            Some(DownloadStep::Fail(err)) => Err(err),
            Some(DownloadStep::Gated(gate, chunks)) => {
                self.entered.notify_one();
                gate.notified().await;
                Ok(body(chunks))
            }
            None => Err(TransportError::Connect("script exhausted".to_string())),
        }
    }
}

/// Keeps every notification for inspection.
#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<(String, Severity)>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<(String, Severity)> {
        self.messages.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        self.messages.lock().unwrap().push((message.to_string(), severity));
    }
}

/// Everything one or more result screens share.
pub struct Harness {
    pub dir: tempfile::TempDir,
    pub log: Arc<PersistentLog>,
    pub shared: SharedResultState,
    pub notifier: Arc<RecordingNotifier>,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
            log: Arc::new(PersistentLog::new(Arc::new(MemoryStore::new()))),
            shared: SharedResultState::new(),
            notifier: Arc::new(RecordingNotifier::default()),
        }
    }

    pub fn image(&self, name: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, b"\xFF\xD8\xFFjpeg").unwrap();
        path
    }

    pub fn processed_dir(&self) -> PathBuf {
        self.dir.path().join("processed")
    }

    pub fn screen(&self, client: &Arc<ScriptedClient>) -> ResultOrchestrator<ScriptedClient> {
        self.screen_with_kind(client, RequestKind::Both)
    }

    pub fn screen_with_kind(
        &self,
        client: &Arc<ScriptedClient>,
        kind: RequestKind,
    ) -> ResultOrchestrator<ScriptedClient> {
        ResultOrchestrator::new(
            UploadClient::new(client.clone(), UploadOptions::default().url("http://test/upload")),
            ProcessedImageFetcher::new(client.clone(), self.processed_dir())
                .base_url("http://test/processed_image/"),
            ResponseFormatter::new(kind),
            self.log.clone(),
            self.shared.clone(),
            self.notifier.clone(),
        )
    }
}

pub fn read(path: &Path) -> Vec<u8> {
    std::fs::read(path).unwrap()
}
