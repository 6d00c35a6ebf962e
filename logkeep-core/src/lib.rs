//! Maintenance engine for append-only runtime error logs.
//!
//! This crate provides:
//! - `timestamp` - format-chain timestamp resolution
//! - `parser` - splitting raw log text into discrete records
//! - `aggregate` - deduplicating records into counted entries
//! - `retention` - date-based purging with file rewrite
//! - `config_file` - safe upsert/removal of `define( 'NAME', value );`
//!   directives in a user-owned config file
//! - `manager` - the multi-file (php/js) orchestration facade
//!
//! Every operation re-reads its target file; nothing is cached across calls.

use serde::{Deserialize, Serialize};

pub mod aggregate;
pub mod config_file;
pub mod errors;
mod fs_util;
pub mod manager;
pub mod parser;
pub mod retention;
pub mod timestamp;

pub use aggregate::LogEntry;
pub use errors::{CoreError, Result};
pub use manager::{ClearOutcome, JsErrorReport, LogManager, LogPaths, LogReport, LogSelector, PurgeReport};
pub use parser::LogRecord;
pub use retention::{Period, PurgeOutcome};

/// Which runtime produced a log line. Each kind has its own log file and
/// its own line shape, but both feed the same grouping key space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogKind {
    Php,
    Js,
}

impl LogKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogKind::Php => "php",
            LogKind::Js => "js",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "php" => Some(LogKind::Php),
            "js" => Some(LogKind::Js),
            _ => None,
        }
    }
}

impl std::fmt::Display for LogKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
