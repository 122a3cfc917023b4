//! Error types for the photometer pipeline.

use std::path::PathBuf;

use photometer_fetch::TransportError;
use thiserror::Error;

/// A success response whose payload is not a usable measurement.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("malformed payload: {0}")]
    Malformed(String),

    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("field `{field}` is not numeric: {value}")]
    NotNumeric { field: &'static str, value: String },
}

/// Why a capture ended in the failed state.
///
/// The `Display` text is the message shown to the user.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("error: {0}")]
    Service(String),

    #[error("failed to parse measurement")]
    Parse(#[source] ParseError),

    #[error("network unstable, please retry")]
    Transport(#[source] TransportError),

    #[error("failed to save measurement")]
    Storage(#[source] photometer_store::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("cannot locate home directory; pass --config or set data_dir")]
    NoHome,
}
