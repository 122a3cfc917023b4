//! Capture-upload-result pipeline for colorimetric sample measurements.
//!
//! A captured image is uploaded to the inference service by
//! [`photometer_fetch::UploadClient`], the prediction is turned into a
//! [`MeasurementResult`] by the [`ResponseFormatter`], appended to the
//! [`PersistentLog`], published to the [`SharedResultState`] and displayed.
//! Only then does the [`ResultOrchestrator`] fetch the annotated image.

pub mod config;
pub mod error;
pub mod format;
pub mod history;
pub mod model;
pub mod orchestrator;
pub mod shared;

pub use config::Config;
pub use error::{ConfigError, ParseError, PipelineError};
pub use format::{CaptureContext, ResponseFormatter, three_decimals};
pub use history::{PersistentLog, UsageLog};
pub use model::{CaptureId, ChannelAverages, ColorType, HistoryRecord, MeasurementResult, Rgb};
pub use orchestrator::{
    CaptureOutcome, ImageSource, Notifier, PipelineState, QueuedImages, ResultOrchestrator,
    Severity, TracingNotifier,
};
pub use shared::SharedResultState;

pub use photometer_fetch::{RequestKind, UploadOutcome};
