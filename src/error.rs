//! Error types for tlscan.
//!
//! Uses `thiserror` for ergonomic error definitions.

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while probing a single target.
///
/// These never escape a scan task; they are recorded on the outcome.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("no HTTP(S) responder detected")]
    NoResponder,

    #[error("invalid target address: {0}")]
    InvalidAddress(String),

    #[error("HTTP client setup failed: {0}")]
    Client(#[from] reqwest::Error),
}

/// Errors raised while opening or reading the target input.
#[derive(Error, Debug)]
pub enum InputError {
    #[error("please supply some input")]
    Missing,

    #[error("could not open target file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("target list {0} is not a regular file")]
    NotAFile(PathBuf),

    #[error("failed to read input: {0}")]
    Read(#[from] std::io::Error),

    #[error("could not rewind input: {0}")]
    Rewind(#[source] std::io::Error),
}

/// Errors raised while loading settings or validating options.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read settings from {path}: {reason}")]
    ReadFailed { path: PathBuf, reason: String },

    #[error("invalid settings format: {0}")]
    InvalidFormat(#[from] serde_json::Error),

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Result type alias for input operations.
pub type InputResult<T> = Result<T, InputError>;

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
