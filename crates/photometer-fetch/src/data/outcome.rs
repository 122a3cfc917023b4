use bytes::Bytes;

use crate::error::TransportError;

/// A response the service actually delivered, before any interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Bytes,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Lossy UTF-8 view of the body, for logging.
    pub fn text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// Result of one [`UploadClient::send`](crate::UploadClient::send) call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// The service answered without flagging an error. The payload has not
    /// been parsed yet.
    Success(RawResponse),
    /// The service answered and reported a failure. Never retried.
    ServiceError(String),
    /// Every attempt failed below the service level.
    TransportError(TransportError),
}

impl UploadOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, UploadOutcome::Success(_))
    }
}
