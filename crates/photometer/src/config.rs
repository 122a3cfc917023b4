//! On-disk configuration.
//!
//! Every field has a default, so a missing file and an empty file both yield
//! [`Config::default`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use photometer_fetch::{
    DEFAULT_PROCESSED_IMAGE_BASE, DEFAULT_UPLOAD_URL, RequestKind, RetryPolicy, UploadOptions,
};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::format::DEFAULT_CONCENTRATION_UNIT;

const APP_DIR: &str = ".photometer";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub upload_url: String,
    pub processed_image_base: String,
    pub request_kind: RequestKind,
    pub concentration_unit: String,
    pub upload_timeout_secs: u64,
    pub fetch_timeout_secs: u64,
    pub max_retries: u32,
    pub retry_delay_ms: u64,
    /// Where history, usage log and processed images live.
    /// Defaults to `~/.photometer`.
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            upload_url: DEFAULT_UPLOAD_URL.to_string(),
            processed_image_base: DEFAULT_PROCESSED_IMAGE_BASE.to_string(),
            request_kind: RequestKind::Both,
            concentration_unit: DEFAULT_CONCENTRATION_UNIT.to_string(),
            upload_timeout_secs: 60,
            fetch_timeout_secs: 30,
            max_retries: 2,
            retry_delay_ms: 1000,
            data_dir: None,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `explicit` if given (it must exist), else the default location if
    /// present, else the built-in defaults.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(path) if path.is_file() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn default_path() -> Option<PathBuf> {
        home::home_dir().map(|home| home.join(APP_DIR).join(CONFIG_FILE))
    }

    pub fn data_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => home::home_dir()
                .map(|home| home.join(APP_DIR))
                .ok_or(ConfigError::NoHome),
        }
    }

    pub fn processed_image_dir(&self) -> Result<PathBuf, ConfigError> {
        Ok(self.data_dir()?.join("processed"))
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::default()
            .max_retries(self.max_retries)
            .delay(Duration::from_millis(self.retry_delay_ms))
    }

    pub fn upload_options(&self) -> UploadOptions {
        UploadOptions::default()
            .url(self.upload_url.clone())
            .timeout(Duration::from_secs(self.upload_timeout_secs))
            .retry(self.retry_policy())
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}
