//! Error types for printfleet.
//!
//! Uses `thiserror` for ergonomic error definitions, one enum per concern.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while sweeping a subnet for printers.
///
/// Probe-level unreachability is never an error: a closed or filtered port is
/// a negative classification signal and is folded into the probe result.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("invalid CIDR notation: {0}")]
    InvalidCidr(String),

    #[error("range too large: {count} usable addresses (max: {max})")]
    InvalidRange { count: u128, max: u128 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for sweep operations.
pub type ScanResult<T> = Result<T, ScanError>;

/// Errors raised by one device's provisioning flow.
///
/// These never cross a batch boundary: the orchestrator maps each of them to
/// a per-device outcome, so a failing device cannot abort the remaining ones.
#[derive(Error, Debug)]
pub enum ProvisionError {
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The expected one-time token was absent from a device page. This
    /// usually means the device UI changed shape; the snippet is kept for
    /// diagnosis.
    #[error("no session token found in {page}")]
    TokenNotFound { page: &'static str, snippet: String },

    #[error("device session timed out")]
    SessionTimeout,

    #[error("unexpected HTTP status {0} from device")]
    UnexpectedStatus(u16),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for provisioning steps.
pub type ProvisionResult<T> = Result<T, ProvisionError>;

/// Errors from configuration loading and saving.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not determine configuration directory")]
    DirectoryNotFound,

    #[error("failed to read {path}: {reason}")]
    ReadFailed { path: PathBuf, reason: String },

    #[error("failed to write {path}: {reason}")]
    WriteFailed { path: PathBuf, reason: String },

    #[error("invalid configuration format: {0}")]
    InvalidFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Top-level error type for the CLI binary.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid user payload: {0}")]
    Payload(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for CLI commands.
pub type CliResult<T> = Result<T, CliError>;
