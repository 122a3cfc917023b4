//! The single-slot result cache shared between screens.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use crate::model::{CaptureId, MeasurementResult};

#[derive(Debug, Default)]
struct Slot {
    result: Option<MeasurementResult>,
    last_capture: u64,
}

/// Carries the most recent measurement across screen transitions.
///
/// Clones are handles to the same slot. Critical sections never span an
/// await point.
#[derive(Debug, Clone, Default)]
pub struct SharedResultState {
    slot: Arc<Mutex<Slot>>,
}

impl SharedResultState {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Hand out the id for a new capture. Ids increase monotonically across
    /// every holder of this slot.
    pub fn issue_capture_id(&self) -> CaptureId {
        let mut slot = self.lock();
        slot.last_capture += 1;
        CaptureId::new(slot.last_capture)
    }

    /// Whether `capture` is the newest id handed out by this slot.
    pub fn is_latest(&self, capture: CaptureId) -> bool {
        self.lock().last_capture == capture.get()
    }

    /// Persist and publish `result` in one critical section, but only while
    /// its capture is still the newest one. `persist` runs under the slot
    /// lock, so no newer capture can publish between it and the publish.
    ///
    /// Returns `Ok(false)` without calling `persist` when a newer capture has
    /// been issued. A `persist` error leaves the slot untouched.
    pub fn commit_if_latest<E>(
        &self,
        result: MeasurementResult,
        persist: impl FnOnce(&MeasurementResult) -> Result<(), E>,
    ) -> Result<bool, E> {
        let mut slot = self.lock();
        if slot.last_capture != result.capture().get() {
            debug!(capture = %result.capture(), latest = slot.last_capture, "not committing superseded result");
            return Ok(false);
        }
        persist(&result)?;
        debug!(capture = %result.capture(), "publishing shared result");
        slot.result = Some(result);
        Ok(true)
    }

    /// Replace whatever the slot holds.
    pub fn publish(&self, result: MeasurementResult) {
        debug!(capture = %result.capture(), "publishing shared result");
        self.lock().result = Some(result);
    }

    /// Attach the processed image to the held result, but only if it still
    /// belongs to `capture`. Returns whether the slot was updated.
    pub fn patch_processed_image(&self, capture: CaptureId, path: PathBuf) -> bool {
        let mut slot = self.lock();
        match slot.result.as_mut() {
            Some(result) if result.capture() == capture => {
                result.set_processed_image(path);
                true
            }
            _ => {
                debug!(%capture, "ignoring stale processed image");
                false
            }
        }
    }

    /// Read the held result without clearing it.
    pub fn consume(&self) -> Option<MeasurementResult> {
        self.lock().result.clone()
    }

    pub fn reset(&self) {
        self.lock().result = None;
    }
}
