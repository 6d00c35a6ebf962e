//! Multi-file orchestration facade: listing, clearing, appending and purging
//! across the php and js log files.
//!
//! Paths are explicit call-site configuration; the engine reads no ambient
//! settings and caches nothing between calls.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::errors::{CoreError, Result};
use crate::retention::{self, Period, PurgeOutcome};
use crate::{aggregate, fs_util, parser, timestamp, LogEntry, LogKind};

/// Which log files exist in this installation. `None` means the kind is not
/// configured at all.
#[derive(Debug, Clone, Default)]
pub struct LogPaths {
    pub php: Option<PathBuf>,
    pub js: Option<PathBuf>,
}

impl LogPaths {
    pub fn for_kind(&self, kind: LogKind) -> Option<&Path> {
        match kind {
            LogKind::Php => self.php.as_deref(),
            LogKind::Js => self.js.as_deref(),
        }
    }
}

/// Selects which log kinds an operation touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogSelector {
    All,
    Php,
    Js,
}

impl LogSelector {
    pub fn kinds(&self) -> &'static [LogKind] {
        match self {
            LogSelector::All => &[LogKind::Php, LogKind::Js],
            LogSelector::Php => &[LogKind::Php],
            LogSelector::Js => &[LogKind::Js],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogSelector::All => "all",
            LogSelector::Php => "php",
            LogSelector::Js => "js",
        }
    }
}

impl FromStr for LogSelector {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "all" | "" => Ok(LogSelector::All),
            "php" => Ok(LogSelector::Php),
            "js" => Ok(LogSelector::Js),
            other => Err(CoreError::InvalidSelector(other.to_string())),
        }
    }
}

impl std::fmt::Display for LogSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregated entries plus file metadata for display.
#[derive(Debug, Serialize)]
pub struct LogReport {
    /// Entries across all selected files, newest latest-occurrence first.
    pub entries: Vec<LogEntry>,
    pub total_bytes: u64,
    /// Human-readable rendering of `total_bytes`.
    pub total_size: String,
    pub count: usize,
    pub php_count: usize,
    pub js_count: usize,
}

/// Per-target result of a clear. Partial failure stays per-target; it is
/// never collapsed into one boolean.
#[derive(Debug, Clone, Serialize)]
pub struct ClearOutcome {
    pub kind: LogKind,
    pub success: bool,
    pub message: String,
}

/// Per-target result of a purge or keep-last run.
#[derive(Debug, Clone, Serialize)]
pub struct PurgeReport {
    pub kind: LogKind,
    pub success: bool,
    pub deleted_entries: usize,
    pub message: String,
}

/// One runtime-originated error to append to the js log.
#[derive(Debug, Clone)]
pub struct JsErrorReport {
    pub message: String,
    pub script: String,
    pub line: u32,
    pub column: u32,
    pub site_url: String,
    pub page_url: String,
    /// Label written before the message, e.g. "JavaScript Error".
    pub error_type: String,
}

pub struct LogManager {
    paths: LogPaths,
}

impl LogManager {
    pub fn new(paths: LogPaths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &LogPaths {
        &self.paths
    }

    /// Parse and aggregate every selected, configured, existing log file.
    ///
    /// Unconfigured or absent files are skipped (an empty installation is a
    /// valid one); an existing file that cannot be read is an error.
    pub fn list(&self, selector: LogSelector) -> Result<LogReport> {
        let mut entries: Vec<LogEntry> = Vec::new();
        let mut total_bytes = 0u64;
        let mut php_count = 0usize;
        let mut js_count = 0usize;

        for &kind in selector.kinds() {
            let Some(path) = self.paths.for_kind(kind) else {
                continue;
            };
            if !path.exists() {
                continue;
            }
            let content = fs_util::read_existing(path)?;
            total_bytes += content.len() as u64;

            let file_entries = aggregate::aggregate(parser::parse(&content), kind);
            match kind {
                LogKind::Php => php_count += file_entries.len(),
                LogKind::Js => js_count += file_entries.len(),
            }
            entries.extend(file_entries);
        }

        entries.sort_by(|a, b| latest_instant(b).cmp(&latest_instant(a)));

        Ok(LogReport {
            count: entries.len(),
            total_size: format_size(total_bytes),
            total_bytes,
            php_count,
            js_count,
            entries,
        })
    }

    /// Truncate each selected log file. A selected kind with no configured
    /// path reports failure naming that target; the other file is untouched.
    pub fn clear(&self, selector: LogSelector) -> Vec<ClearOutcome> {
        selector
            .kinds()
            .iter()
            .map(|&kind| match self.paths.for_kind(kind) {
                None => ClearOutcome {
                    kind,
                    success: false,
                    message: format!("No {} log file configured.", kind),
                },
                Some(path) => match fs_util::write_atomic(path, "") {
                    Ok(()) => ClearOutcome {
                        kind,
                        success: true,
                        message: format!("{} log file cleared.", kind),
                    },
                    Err(e) => {
                        tracing::warn!(kind = %kind, error = %e, "failed to clear log file");
                        ClearOutcome {
                            kind,
                            success: false,
                            message: e.to_string(),
                        }
                    }
                },
            })
            .collect()
    }

    /// Append one formatted error line to the js log. The line shape is
    /// exactly what the parser reads back:
    /// `[<d>-<Mon>-<Y> <H:M:S> UTC] <type>: <msg> in <script> on line <n> column <n> at <url><page>`
    pub fn append_js_error(&self, report: &JsErrorReport) -> Result<()> {
        let path = self
            .paths
            .js
            .as_deref()
            .ok_or(CoreError::NoLogConfigured(LogKind::Js))?;

        let timestamp = Utc::now().format("%d-%b-%Y %H:%M:%S UTC");
        let line = format!(
            "[{}] {}: {} in {} on line {} column {} at {}{}",
            timestamp,
            report.error_type,
            report.message,
            report.script,
            report.line,
            report.column,
            report.site_url,
            report.page_url
        );

        let write_failure = |source: std::io::Error| CoreError::WriteFailure {
            path: path.to_path_buf(),
            source,
        };
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(write_failure)?;
        writeln!(file, "{}", line).map_err(write_failure)?;
        Ok(())
    }

    /// Purge entries last active before `date` from each selected target.
    /// The date string itself failing to resolve is an argument error; a
    /// failing target becomes a failed per-target report.
    pub fn purge_before(&self, selector: LogSelector, date: &str) -> Result<Vec<PurgeReport>> {
        let cutoff = timestamp::resolve(date)
            .ok_or_else(|| CoreError::InvalidDate(date.to_string()))?;
        Ok(self.run_retention(selector, |path, kind| {
            retention::purge_before(path, cutoff, kind)
        }))
    }

    /// Keep only entries active within the last `number` periods.
    pub fn keep_last(
        &self,
        selector: LogSelector,
        number: u32,
        period: Period,
    ) -> Result<Vec<PurgeReport>> {
        if number == 0 {
            return Err(CoreError::InvalidCount);
        }
        let cutoff = Utc::now() - period.duration(number);
        Ok(self.run_retention(selector, |path, kind| {
            retention::purge_before(path, cutoff, kind)
        }))
    }

    fn run_retention<F>(&self, selector: LogSelector, purge: F) -> Vec<PurgeReport>
    where
        F: Fn(&Path, LogKind) -> Result<PurgeOutcome>,
    {
        selector
            .kinds()
            .iter()
            .map(|&kind| match self.paths.for_kind(kind) {
                None => PurgeReport {
                    kind,
                    success: false,
                    deleted_entries: 0,
                    message: format!("No {} log file configured.", kind),
                },
                Some(path) => match purge(path, kind) {
                    Ok(outcome) => PurgeReport {
                        kind,
                        success: true,
                        deleted_entries: outcome.deleted_entries,
                        message: outcome.message,
                    },
                    Err(e) => PurgeReport {
                        kind,
                        success: false,
                        deleted_entries: 0,
                        message: e.to_string(),
                    },
                },
            })
            .collect()
    }
}

fn latest_instant(entry: &LogEntry) -> Option<DateTime<Utc>> {
    entry.occurrences.last().and_then(|t| timestamp::resolve(t))
}

/// Human-readable byte count, 1024-based, one decimal above bytes.
pub fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["KB", "MB", "GB", "TB"];
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut value = bytes as f64;
    let mut unit = "KB";
    for candidate in UNITS {
        value /= 1024.0;
        unit = candidate;
        if value < 1024.0 {
            break;
        }
    }
    format!("{:.1} {}", value, unit)
}
