//! Sequencing of one capture: upload, format, persist, publish, display, then
//! the best-effort processed image.

mod notify;
mod source;
mod state;

pub use notify::{Notifier, Severity, TracingNotifier};
pub use source::{ImageSource, QueuedImages};
pub use state::{CaptureOutcome, PipelineState};

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use photometer_fetch::{HttpClient, ProcessedImageFetcher, UploadClient, UploadOutcome};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::error::PipelineError;
use crate::format::{CaptureContext, ResponseFormatter};
use crate::history::PersistentLog;
use crate::model::{CaptureId, MeasurementResult};
use crate::shared::SharedResultState;

/// Drives one result screen through its state machine.
///
/// Several orchestrators may share one [`SharedResultState`] and one
/// [`PersistentLog`]. Capture ids issued by the shared slot order their
/// captures: an upload that lands after any screen started a newer capture is
/// neither logged nor published.
pub struct ResultOrchestrator<C: HttpClient> {
    upload: UploadClient<C>,
    fetcher: ProcessedImageFetcher<C>,
    formatter: ResponseFormatter,
    log: Arc<PersistentLog>,
    shared: SharedResultState,
    notifier: Arc<dyn Notifier>,
    state: watch::Sender<PipelineState>,
    current: AtomicU64,
}

impl<C: HttpClient> ResultOrchestrator<C> {
    pub fn new(
        upload: UploadClient<C>,
        fetcher: ProcessedImageFetcher<C>,
        formatter: ResponseFormatter,
        log: Arc<PersistentLog>,
        shared: SharedResultState,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let (state, _) = watch::channel(PipelineState::Idle);
        Self {
            upload,
            fetcher,
            formatter,
            log,
            shared,
            notifier,
            state,
            current: AtomicU64::new(0),
        }
    }

    /// Observe every state transition of this screen.
    pub fn subscribe(&self) -> watch::Receiver<PipelineState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> PipelineState {
        self.state.borrow().clone()
    }

    pub fn shared(&self) -> &SharedResultState {
        &self.shared
    }

    /// Ask `source` for an image and run a capture on it. `None` when the
    /// source had nothing to offer.
    pub async fn capture_from<S: ImageSource>(&self, source: &S) -> Option<CaptureOutcome> {
        let image = source.pick().await?;
        Some(self.capture(image).await)
    }

    /// Run the whole pipeline for one image.
    ///
    /// Starting a capture pre-empts whatever this screen was doing: when an
    /// older call later resumes it finds itself superseded and discards its
    /// outcome.
    pub async fn capture(&self, image: impl Into<PathBuf>) -> CaptureOutcome {
        let image = image.into();
        let capture = self.shared.issue_capture_id();
        self.current.store(capture.get(), Ordering::SeqCst);
        self.shared.reset();
        self.state.send_replace(PipelineState::Loading {
            capture,
            image: image.clone(),
        });
        info!(%capture, image = %image.display(), kind = %self.formatter.kind(), "capture started");

        let outcome = self.upload.send(&image, self.formatter.kind()).await;
        if !self.is_current(capture) {
            debug!(%capture, "upload finished after a newer capture, discarding");
            return CaptureOutcome::Superseded;
        }
        if !self.shared.is_latest(capture) {
            return self.yield_to_newer(capture);
        }

        let raw = match outcome {
            UploadOutcome::Success(raw) => raw,
            UploadOutcome::ServiceError(message) => {
                return self.fail(capture, image, PipelineError::Service(message));
            }
            UploadOutcome::TransportError(err) => {
                return self.fail(capture, image, PipelineError::Transport(err));
            }
        };

        let context = CaptureContext {
            capture,
            image_path: image.clone(),
            captured_at: Utc::now(),
        };
        let result = match self.formatter.format(&raw, context) {
            Ok(result) => result,
            Err(err) => {
                warn!(%capture, error = %err, body = %raw.text(), "unusable measurement payload");
                return self.fail(capture, image, PipelineError::Parse(err));
            }
        };

        let committed = self
            .shared
            .commit_if_latest(result.clone(), |result| self.log.append(result.history_record()));
        match committed {
            Ok(true) => {}
            Ok(false) => return self.yield_to_newer(capture),
            Err(err) => {
                warn!(%capture, error = %err, "failed to persist history record");
                return self.fail(capture, image, PipelineError::Storage(err));
            }
        }
        self.state.send_replace(PipelineState::Displaying {
            result: result.clone(),
        });
        info!(
            %capture,
            concentration = result.concentration_text().unwrap_or("-"),
            absorbance = result.absorbance_text().unwrap_or("-"),
            color = %result.color_type(),
            "measurement displayed"
        );

        // Display is committed above; only now may the secondary fetch begin.
        let result = self.attach_processed_image(result).await;
        CaptureOutcome::Displayed(result)
    }

    async fn attach_processed_image(&self, mut result: MeasurementResult) -> MeasurementResult {
        let Some(remote) = result.remote_processed_image().map(str::to_owned) else {
            return result;
        };
        let capture = result.capture();

        let path = match self.fetcher.fetch_tagged(&remote, &capture.get().to_string()).await {
            Ok(path) => path,
            Err(err) => {
                warn!(%capture, error = %err, "processed image unavailable");
                return result;
            }
        };

        self.shared.patch_processed_image(capture, path.clone());
        result.set_processed_image(path);

        if self.is_current(capture) {
            self.state.send_modify(|state| {
                if let PipelineState::Displaying { result: shown } = state
                    && shown.capture() == capture
                {
                    *shown = result.clone();
                }
            });
            debug!(%capture, "processed image attached");
        } else {
            debug!(%capture, "processed image arrived after a newer capture, not displayed");
        }
        result
    }

    fn fail(&self, capture: CaptureId, image: PathBuf, error: PipelineError) -> CaptureOutcome {
        let message = error.to_string();
        warn!(%capture, error = ?error, "capture failed");
        self.state.send_replace(PipelineState::Failed {
            capture,
            image,
            message: message.clone(),
        });
        self.notifier.notify(&message, Severity::Error);
        CaptureOutcome::Failed(error)
    }

    /// Another screen sharing the slot started a newer capture. This screen
    /// has nothing left to show for `capture`.
    fn yield_to_newer(&self, capture: CaptureId) -> CaptureOutcome {
        debug!(%capture, "a newer capture owns the shared result, discarding");
        self.state.send_if_modified(|state| {
            if state.capture() == Some(capture) {
                *state = PipelineState::Idle;
                true
            } else {
                false
            }
        });
        CaptureOutcome::Superseded
    }

    fn is_current(&self, capture: CaptureId) -> bool {
        self.current.load(Ordering::SeqCst) == capture.get()
    }
}
