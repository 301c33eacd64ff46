//! Error types for the attribution engine and its drivers.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort the accounting of one extension.
///
/// Parsing anomalies in the detector report are not errors: malformed blocks
/// are skipped and logged. Anything here means the reported metric would be
/// wrong, so it is surfaced to the caller instead.
#[derive(Error, Debug)]
pub enum AttribError {
    #[error("cannot read source file {path}: {source}")]
    SourceRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot read detector report {path}: {source}")]
    ReportRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot write {path}: {source}")]
    OutputWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("invalid source pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        source: globset::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AttribError>;
