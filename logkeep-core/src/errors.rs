use std::path::PathBuf;
use thiserror::Error;

use crate::LogKind;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Log file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid date: '{0}'")]
    InvalidDate(String),

    #[error("Invalid period: '{0}' (expected days, weeks or months)")]
    InvalidPeriod(String),

    #[error("Period count must be positive")]
    InvalidCount,

    #[error("Invalid log selector: '{0}' (expected all, php or js)")]
    InvalidSelector(String),

    #[error("Directive '{name}' matches {matches} statements; refusing to replace")]
    DirectiveConflict { name: String, matches: usize },

    #[error("No {0} log file configured")]
    NoLogConfigured(LogKind),
}

pub type Result<T> = std::result::Result<T, CoreError>;
