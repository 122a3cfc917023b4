use std::collections::VecDeque;
use std::future::Future;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

/// Supplies the image for a capture event.
pub trait ImageSource: Send + Sync {
    /// Exactly one path per capture, or `None` when the user backs out.
    fn pick(&self) -> impl Future<Output = Option<PathBuf>> + Send;
}

/// Hands out a fixed list of paths, one per capture.
#[derive(Debug, Default)]
pub struct QueuedImages {
    queue: Mutex<VecDeque<PathBuf>>,
}

impl QueuedImages {
    pub fn new(paths: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            queue: Mutex::new(paths.into_iter().collect()),
        }
    }
}

impl ImageSource for QueuedImages {
    async fn pick(&self) -> Option<PathBuf> {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
    }
}
