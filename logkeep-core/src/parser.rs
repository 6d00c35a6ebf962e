//! Splitting raw log text into discrete records.
//!
//! A record starts at a line of the shape `[<timestamp>] <message...>` and
//! owns every following line up to the next such boundary, which is how
//! multi-line payloads (stack traces, object dumps) stay intact.

use crate::timestamp;

/// One physical log event before grouping. Transient; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    /// The raw bracketed timestamp text, brackets removed.
    pub timestamp: String,
    /// The message body, possibly spanning multiple lines.
    pub message: String,
}

/// Parse raw log text into records.
///
/// A line opens a new record only when it starts with `[`, contains `]`, and
/// the bracketed text actually resolves as a timestamp. Anything else is a
/// continuation of the open record - stack-trace lines like
/// `[internal function]` must not split an entry. Lines before the first
/// boundary have no record to belong to and are dropped.
pub fn parse(raw: &str) -> Vec<LogRecord> {
    let mut records = Vec::new();
    let mut current: Option<LogRecord> = None;

    for line in raw.lines() {
        if let Some((ts, rest)) = split_boundary(line) {
            if let Some(record) = current.take() {
                records.push(finish(record));
            }
            current = Some(LogRecord {
                timestamp: ts.to_string(),
                message: rest.to_string(),
            });
        } else if let Some(record) = current.as_mut() {
            record.message.push('\n');
            record.message.push_str(line);
        }
    }

    if let Some(record) = current.take() {
        records.push(finish(record));
    }

    records
}

/// Returns `(timestamp, message_start)` when the line opens a new record.
fn split_boundary(line: &str) -> Option<(&str, &str)> {
    let rest = line.strip_prefix('[')?;
    let close = rest.find(']')?;
    let ts = &rest[..close];
    timestamp::resolve(ts)?;
    Some((ts, rest[close + 1..].trim_start()))
}

fn finish(mut record: LogRecord) -> LogRecord {
    // Trailing blank lines belong to the gap between records, not to the
    // message; keeping them would break exact-message grouping.
    let trimmed = record.message.trim_end().len();
    record.message.truncate(trimmed);
    record
}
