//! Retention purging: drop entries whose most recent activity is older than
//! a cutoff, then rewrite the log file from what survives.

use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::errors::{CoreError, Result};
use crate::{aggregate, fs_util, parser, timestamp, LogKind};

/// Retention period unit. A month is a fixed 30 days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Days,
    Weeks,
    Months,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Days => "days",
            Period::Weeks => "weeks",
            Period::Months => "months",
        }
    }

    pub fn duration(&self, number: u32) -> Duration {
        let number = i64::from(number);
        match self {
            Period::Days => Duration::days(number),
            Period::Weeks => Duration::weeks(number),
            Period::Months => Duration::days(30 * number),
        }
    }
}

impl FromStr for Period {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "days" => Ok(Period::Days),
            "weeks" => Ok(Period::Weeks),
            "months" => Ok(Period::Months),
            other => Err(CoreError::InvalidPeriod(other.to_string())),
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a purge did. Failure cases (missing file, bad cutoff, write error)
/// are reported through `CoreError`, not through this struct.
#[derive(Debug, Clone, Serialize)]
pub struct PurgeOutcome {
    /// Entry-level count: entries in the file before minus entries kept.
    pub deleted_entries: usize,
    /// Physical lines written back.
    pub kept_occurrences: usize,
    pub message: String,
}

/// Purge entries whose latest occurrence is strictly older than `cutoff`.
///
/// The comparison is per-entry against the **latest** occurrence only: an
/// entry that fired even once after the cutoff is retained whole, older
/// occurrences included, so recently-recurring errors keep their history.
/// An entry whose latest occurrence cannot be resolved is purged.
///
/// The file is rewritten as one `[timestamp] message` line per kept
/// occurrence, in the original order.
pub fn purge_before(path: &Path, cutoff: DateTime<Utc>, kind: LogKind) -> Result<PurgeOutcome> {
    let content = fs_util::read_existing(path)?;
    let entries = aggregate::aggregate(parser::parse(&content), kind);
    let total_entries = entries.len();

    let mut kept_lines: Vec<String> = Vec::new();
    let mut kept_entries = 0usize;

    for entry in &entries {
        let Some(latest) = entry.occurrences.last() else {
            continue;
        };
        let keep = timestamp::resolve(latest).is_some_and(|t| t >= cutoff);
        if keep {
            kept_entries += 1;
            for occurrence in &entry.occurrences {
                kept_lines.push(format!("[{}] {}", occurrence, entry.message));
            }
        }
    }

    let mut new_content = kept_lines.join("\n");
    if !new_content.is_empty() {
        // Keep the file append-friendly: the runtime's logger writes
        // newline-terminated lines.
        new_content.push('\n');
    }
    fs_util::write_atomic(path, &new_content)?;

    let deleted_entries = total_entries - kept_entries;
    tracing::debug!(
        path = %path.display(),
        deleted_entries,
        kept_entries,
        "purged log file"
    );

    Ok(PurgeOutcome {
        deleted_entries,
        kept_occurrences: kept_lines.len(),
        message: format!("Deleted {} log entries.", deleted_entries),
    })
}

/// Keep only entries active within the last `number` periods; everything
/// older is purged via [`purge_before`].
pub fn keep_last(path: &Path, number: u32, period: Period, kind: LogKind) -> Result<PurgeOutcome> {
    if number == 0 {
        return Err(CoreError::InvalidCount);
    }
    let cutoff = Utc::now() - period.duration(number);
    purge_before(path, cutoff, kind)
}

#[cfg(test)]
mod tests;
