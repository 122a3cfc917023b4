use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use once_cell::sync::Lazy;

const SPINNER_STYLE: &str = "{spinner:.blue} {prefix:>10.cyan.bold} [{elapsed_precise}] {wide_msg}";

const TICK: &str = "⠁⠂⠄⡀⢀⠠⠐⠈ ";

const TICK_INTERVAL: Duration = Duration::from_millis(100);

static SPINNER_TEMPLATE: Lazy<Option<ProgressStyle>> = Lazy::new(|| {
    let style = match ProgressStyle::with_template(SPINNER_STYLE) {
        Ok(style) => style.tick_chars(TICK),
        Err(_) => return None,
    };

    Some(style)
});

/// Spinner shown while an upload is in flight.
pub struct LoadingSpinner {
    pb: ProgressBar,
}

impl LoadingSpinner {
    pub fn message(&self, msg: impl Into<String>) -> &Self {
        self.pb.set_message(msg.into());
        self
    }

    /// Remove the spinner line so the result can be printed in its place.
    pub fn clear(self) {
        self.pb.finish_and_clear();
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoadingSpinnerBuilder {
    prefix: Option<String>,
    hidden: bool,
}

impl LoadingSpinnerBuilder {
    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.prefix = Some(prefix.to_string());
        self
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub fn build(self) -> LoadingSpinner {
        let pb = if self.hidden {
            ProgressBar::hidden()
        } else {
            ProgressBar::new_spinner()
        };
        let pb = if let Some(style) = SPINNER_TEMPLATE.as_ref() {
            pb.with_style(style.clone())
        } else {
            pb
        };

        if let Some(prefix) = self.prefix {
            pb.set_prefix(prefix);
        }
        pb.enable_steady_tick(TICK_INTERVAL);
        LoadingSpinner { pb }
    }
}
