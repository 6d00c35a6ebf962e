//! Idempotent mutation of `define( 'NAME', value );` directives inside a
//! user-owned config file.
//!
//! The file may hold directives in any order, inside conditional blocks,
//! surrounded by comments the user cares about. Replacing a single anchored
//! statement in place preserves all of that, where regenerating the file
//! would destroy it. New directives are inserted just before the sentinel
//! comment, or appended when the file has none.

use std::path::{Path, PathBuf};

use regex::{NoExpand, Regex};

use crate::errors::{CoreError, Result};
use crate::fs_util;

/// Fixed comment anchoring where new directives are inserted.
pub const SENTINEL: &str = "/* That's all, stop editing!";

/// A directive's value. Booleans render as bare `true`/`false`; strings are
/// single-quoted with backslash escaping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectiveValue {
    Bool(bool),
    Str(String),
}

impl DirectiveValue {
    fn render(&self) -> String {
        match self {
            DirectiveValue::Bool(true) => "true".to_string(),
            DirectiveValue::Bool(false) => "false".to_string(),
            DirectiveValue::Str(s) => format!("'{}'", escape_single_quoted(s)),
        }
    }
}

fn escape_single_quoted(s: &str) -> String {
    s.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Anchored pattern for one named directive, any current value, from the
/// keyword through the statement terminator.
fn directive_pattern(name: &str) -> Regex {
    let pattern = format!(
        r#"(?i)define\s*\(\s*['"]{}['"]\s*,\s*[^;)]+\)\s*;"#,
        regex::escape(name)
    );
    Regex::new(&pattern).expect("directive pattern is valid for any escaped name")
}

fn format_statement(name: &str, value: &DirectiveValue) -> String {
    format!("define( '{}', {} );", name, value.render())
}

/// Replace the named directive in place, or insert it when absent.
///
/// Fails closed with `DirectiveConflict` when more than one statement
/// matches; picking one silently would leave the others contradicting it.
pub fn upsert(content: &str, name: &str, value: &DirectiveValue) -> Result<String> {
    let pattern = directive_pattern(name);
    let statement = format_statement(name, value);

    match pattern.find_iter(content).count() {
        0 => Ok(insert_statement(content, &statement)),
        1 => Ok(pattern.replace(content, NoExpand(&statement)).into_owned()),
        matches => Err(CoreError::DirectiveConflict {
            name: name.to_string(),
            matches,
        }),
    }
}

fn insert_statement(content: &str, statement: &str) -> String {
    match content.find(SENTINEL) {
        Some(pos) => {
            let mut out = String::with_capacity(content.len() + statement.len() + 2);
            out.push_str(&content[..pos]);
            out.push_str(statement);
            out.push_str("\n\n");
            out.push_str(&content[pos..]);
            out
        }
        None => format!("{}\n{}\n", content.trim_end_matches('\n'), statement),
    }
}

/// Strip every statement for each named directive, trailing whitespace
/// included. Used when no snapshot exists to restore from.
pub fn remove(content: &str, names: &[&str]) -> String {
    let mut out = content.to_string();
    for name in names {
        let pattern = format!(
            r#"(?i)define\s*\(\s*['"]{}['"]\s*,\s*[^;)]+\)\s*;[^\S\n]*\n?"#,
            regex::escape(name)
        );
        let re = Regex::new(&pattern).expect("directive pattern is valid for any escaped name");
        out = re.replace_all(&out, "").into_owned();
    }
    out
}

/// A config file on disk. Holds only the path; content is re-read on every
/// call because the file is the sole source of truth.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    path: PathBuf,
}

impl ConfigFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read(&self) -> Result<String> {
        fs_util::read_existing(&self.path)
    }

    pub fn write(&self, content: &str) -> Result<()> {
        fs_util::write_atomic(&self.path, content)
    }

    /// Upsert a single directive, writing only when the content changed.
    pub fn upsert(&self, name: &str, value: &DirectiveValue) -> Result<()> {
        let content = self.read()?;
        let updated = upsert(&content, name, value)?;
        if updated != content {
            self.write(&updated)?;
        }
        Ok(())
    }

    pub fn remove(&self, names: &[&str]) -> Result<()> {
        let content = self.read()?;
        let updated = remove(&content, names);
        if updated != content {
            self.write(&updated)?;
        }
        Ok(())
    }

    /// Capture the entire current content, verbatim. The caller owns where
    /// the snapshot is persisted.
    pub fn snapshot(&self) -> Result<String> {
        self.read()
    }

    /// Write back a previously captured snapshot, restoring formatting and
    /// whitespace outside the managed directives exactly.
    pub fn restore(&self, blob: &str) -> Result<()> {
        self.write(blob)
    }
}

/// The directive names one debug-logging setup manages.
#[derive(Debug, Clone)]
pub struct DebugProfile {
    /// Master debug flag.
    pub flag: String,
    /// Path-valued directive; relative values are coerced to absolute.
    pub log_path: String,
    /// On-screen display flag, forced off while logging to a file.
    pub display: String,
    /// Optional script-debugging flag.
    pub script_flag: String,
}

impl Default for DebugProfile {
    fn default() -> Self {
        Self {
            flag: "WP_DEBUG".to_string(),
            log_path: "WP_DEBUG_LOG".to_string(),
            display: "WP_DEBUG_DISPLAY".to_string(),
            script_flag: "SCRIPT_DEBUG".to_string(),
        }
    }
}

impl DebugProfile {
    /// Turn file logging on: flag=true, log path set (absolute), display off,
    /// script debugging optionally on. One atomic write for all directives.
    pub fn enable(
        &self,
        file: &ConfigFile,
        log_path: &Path,
        base_dir: &Path,
        script_debug: bool,
    ) -> Result<()> {
        let absolute = if log_path.is_absolute() {
            log_path.to_path_buf()
        } else {
            base_dir.join(log_path)
        };

        let mut content = file.read()?;
        content = upsert(&content, &self.flag, &DirectiveValue::Bool(true))?;
        content = upsert(
            &content,
            &self.log_path,
            &DirectiveValue::Str(absolute.display().to_string()),
        )?;
        content = upsert(&content, &self.display, &DirectiveValue::Bool(false))?;
        if script_debug {
            content = upsert(&content, &self.script_flag, &DirectiveValue::Bool(true))?;
        }
        file.write(&content)?;

        tracing::debug!(config = %file.path().display(), "enabled debug logging directives");
        Ok(())
    }

    /// Turn logging off: restore the snapshot when one exists, otherwise
    /// strip the managed directives.
    pub fn disable(&self, file: &ConfigFile, snapshot: Option<&str>) -> Result<()> {
        match snapshot {
            Some(blob) => file.restore(blob),
            None => file.remove(&self.managed_names()),
        }
    }

    /// Names removed on snapshot-less disable. The script flag is left
    /// alone; it may predate us.
    pub fn managed_names(&self) -> [&str; 3] {
        [&self.flag, &self.log_path, &self.display]
    }
}
