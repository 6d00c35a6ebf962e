//! Grouping parsed records into deduplicated, counted entries.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::parser::LogRecord;
use crate::LogKind;

/// A deduplicated logical log event: all occurrences of one distinct message.
///
/// `id` is a stable content hash of the message, so the same logical error
/// keeps the same id across repeated calls and callers can diff snapshots.
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub id: String,
    pub message: String,
    /// Script/file path pulled out of an `in <path> on line <n>` fragment.
    /// Best-effort metadata; empty when the message has no such shape.
    pub source: String,
    /// Timestamp texts in file order (insertion order = chronological).
    pub occurrences: Vec<String>,
    pub count: usize,
    pub kind: LogKind,
}

/// Group records whose message bodies are byte-identical. No fuzzy matching.
/// Result order is the order of first occurrence.
pub fn aggregate(records: Vec<LogRecord>, kind: LogKind) -> Vec<LogEntry> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut entries: Vec<LogEntry> = Vec::new();

    for record in records {
        match index.get(&record.message) {
            Some(&i) => {
                let entry = &mut entries[i];
                entry.occurrences.push(record.timestamp);
                entry.count += 1;
            }
            None => {
                index.insert(record.message.clone(), entries.len());
                entries.push(LogEntry {
                    id: message_id(&record.message),
                    source: extract_source(&record.message),
                    message: record.message,
                    occurrences: vec![record.timestamp],
                    count: 1,
                    kind,
                });
            }
        }
    }

    entries
}

/// Stable, collision-resistant id for a message.
pub fn message_id(message: &str) -> String {
    hex::encode(Sha256::digest(message.as_bytes()))
}

fn source_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\bin (\S+) on line (\d+)").expect("source pattern is valid")
    })
}

/// Pull the script path out of an `in <path> on line <n>` fragment.
pub fn extract_source(message: &str) -> String {
    source_pattern()
        .captures(message)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}
