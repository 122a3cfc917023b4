use std::time::Duration;

/// Default inference endpoint.
pub const DEFAULT_UPLOAD_URL: &str = "https://chemistryplsmodel.com/upload";

/// Bounded retry for transport-level failures, with the same `delay` before
/// every retry.
///
/// Total attempts = 1 (initial) + `max_retries`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    #[must_use]
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    #[must_use]
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

/// Configuration for [`UploadClient`](crate::UploadClient).
///
/// # Examples
///
/// ```
/// use photometer_fetch::{RetryPolicy, UploadOptions};
/// use std::time::Duration;
///
/// let options = UploadOptions::default()
///     .url("http://localhost:5000/upload")
///     .timeout(Duration::from_secs(10))
///     .retry(RetryPolicy::default().max_retries(4));
/// assert_eq!(options.retry.attempts(), 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOptions {
    pub url: String,
    /// Per-attempt bound. Exceeding it counts as a transport failure.
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            url: DEFAULT_UPLOAD_URL.to_string(),
            timeout: Duration::from_secs(60),
            retry: RetryPolicy::default(),
        }
    }
}

impl UploadOptions {
    #[must_use]
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_is_three_attempts_one_second_apart() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.attempts(), 3);
        assert_eq!(policy.delay, Duration::from_secs(1));
    }

    #[test]
    fn attempts_saturate() {
        assert_eq!(RetryPolicy::default().max_retries(u32::MAX).attempts(), u32::MAX);
    }

    #[test]
    fn default_upload_timeout() {
        assert_eq!(UploadOptions::default().timeout, Duration::from_secs(60));
    }
}
