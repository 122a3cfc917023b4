use std::path::PathBuf;

use crate::error::PipelineError;
use crate::model::{CaptureId, MeasurementResult};

/// What the result screen is showing.
///
/// `Idle → Loading → {Displaying, Failed}`. While `Displaying`, the result
/// gains a processed image path once the late download lands.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PipelineState {
    #[default]
    Idle,
    /// Upload in flight; every result field is cleared.
    Loading { capture: CaptureId, image: PathBuf },
    Displaying { result: MeasurementResult },
    Failed {
        capture: CaptureId,
        image: PathBuf,
        message: String,
    },
}

impl PipelineState {
    pub fn is_loading(&self) -> bool {
        matches!(self, PipelineState::Loading { .. })
    }

    pub fn capture(&self) -> Option<CaptureId> {
        match self {
            PipelineState::Idle => None,
            PipelineState::Loading { capture, .. } | PipelineState::Failed { capture, .. } => {
                Some(*capture)
            }
            PipelineState::Displaying { result } => Some(result.capture()),
        }
    }

    pub fn result(&self) -> Option<&MeasurementResult> {
        match self {
            PipelineState::Displaying { result } => Some(result),
            _ => None,
        }
    }
}

/// How one [`capture`](super::ResultOrchestrator::capture) call ended.
#[derive(Debug)]
pub enum CaptureOutcome {
    /// The result was displayed. Carries the processed image path if the
    /// secondary fetch succeeded while this capture was still current.
    Displayed(MeasurementResult),
    Failed(PipelineError),
    /// A newer capture took over before this one finished; its outcome was
    /// discarded.
    Superseded,
}

impl CaptureOutcome {
    pub fn result(&self) -> Option<&MeasurementResult> {
        match self {
            CaptureOutcome::Displayed(result) => Some(result),
            _ => None,
        }
    }
}
