mod commands;
mod config;
mod errors;

use std::fs;
use std::path::Path;

use clap::Parser;
use colored::Colorize;
use tabled::settings::Style;
use tabled::{Table, Tabled};
use tracing_subscriber::EnvFilter;

use crate::commands::{Commands, ConfigCommands};
use crate::config::Config;
use crate::errors::{CliError, Result};
use logkeep_core::config_file::{ConfigFile, DebugProfile, DirectiveValue};
use logkeep_core::{
    JsErrorReport, LogEntry, LogManager, LogSelector, Period, PurgeReport,
};

/// Logkeep - maintenance tooling for runtime error logs
#[derive(Parser, Debug)]
#[command(name = "logkeep")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to logkeep.toml (searched upward from the cwd when omitted)
    #[arg(short = 'f', long = "file", global = true)]
    pub file: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config_path = Config::resolve_config_path(&cli.file)?;
    let config = Config::load(&config_path)?;
    tracing::debug!(config = %config_path.display(), "loaded configuration");

    let manager = LogManager::new(config.log_paths());

    match cli.command {
        Commands::List { kind, json } => handle_list(&manager, &kind, json),
        Commands::Clear { kind } => handle_clear(&manager, &kind),
        Commands::Append {
            message,
            script,
            line,
            column,
            url,
            page,
            error_type,
        } => {
            if !config.js_error_logging {
                return Err(CliError::JsLoggingDisabled);
            }
            manager.append_js_error(&JsErrorReport {
                message,
                script,
                line,
                column,
                site_url: url,
                page_url: page,
                error_type,
            })?;
            println!("Error logged.");
            Ok(())
        }
        Commands::Purge { before, kind, json } => {
            let selector: LogSelector = kind.parse()?;
            let reports = manager.purge_before(selector, &before)?;
            print_purge_reports(&reports, json)
        }
        Commands::Keep {
            number,
            period,
            kind,
            json,
        } => {
            let selector: LogSelector = kind.parse()?;
            let period: Period = period.parse()?;
            let reports = manager.keep_last(selector, number, period)?;
            print_purge_reports(&reports, json)
        }
        Commands::Config { command } => handle_config(&config, &config_path, command),
    }
}

#[derive(Tabled)]
struct EntryRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "KIND")]
    kind: String,
    #[tabled(rename = "COUNT")]
    count: usize,
    #[tabled(rename = "LATEST")]
    latest: String,
    #[tabled(rename = "SOURCE")]
    source: String,
    #[tabled(rename = "MESSAGE")]
    message: String,
}

impl EntryRow {
    fn from_entry(entry: &LogEntry) -> Self {
        Self {
            id: entry.id.chars().take(8).collect(),
            kind: entry.kind.to_string(),
            count: entry.count,
            latest: entry.occurrences.last().cloned().unwrap_or_default(),
            source: entry.source.clone(),
            message: first_line_truncated(&entry.message, 72),
        }
    }
}

/// First line of the message, cut to `max` characters for table display.
fn first_line_truncated(message: &str, max: usize) -> String {
    let line = message.lines().next().unwrap_or_default();
    if line.chars().count() <= max {
        line.to_string()
    } else {
        let mut out: String = line.chars().take(max).collect();
        out.push_str("...");
        out
    }
}

fn handle_list(manager: &LogManager, kind: &str, json: bool) -> Result<()> {
    let selector: LogSelector = kind.parse()?;
    let report = manager.list(selector)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if report.entries.is_empty() {
        println!("No log entries.");
    } else {
        let rows: Vec<EntryRow> = report.entries.iter().map(EntryRow::from_entry).collect();
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{}", table);
    }
    println!(
        "{} entries ({} php, {} js), {}",
        report.count, report.php_count, report.js_count, report.total_size
    );
    Ok(())
}

fn handle_clear(manager: &LogManager, kind: &str) -> Result<()> {
    let selector: LogSelector = kind.parse()?;
    let outcomes = manager.clear(selector);

    for outcome in &outcomes {
        if outcome.success {
            println!("{} {}", "ok".green(), outcome.message);
        } else {
            println!("{} {}", "failed".red(), outcome.message);
        }
    }
    if outcomes.iter().all(|o| !o.success) {
        return Err(CliError::AllTargetsFailed);
    }
    Ok(())
}

fn print_purge_reports(reports: &[PurgeReport], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(reports)?);
        return Ok(());
    }

    for report in reports {
        if report.success {
            println!("{} {}: {}", "ok".green(), report.kind, report.message);
        } else {
            println!("{} {}: {}", "failed".red(), report.kind, report.message);
        }
    }
    if reports.iter().all(|r| !r.success) {
        return Err(CliError::AllTargetsFailed);
    }
    Ok(())
}

fn handle_config(config: &Config, config_path: &Path, command: ConfigCommands) -> Result<()> {
    let runtime = config
        .config_file
        .as_deref()
        .ok_or(CliError::NoRuntimeConfig)?;
    let file = ConfigFile::new(runtime);
    let profile = DebugProfile::default();
    let base_dir = match runtime.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    match command {
        ConfigCommands::Enable {
            log_path,
            no_script_debug,
        } => {
            let log_path = log_path
                .or_else(|| config.php_log.clone())
                .ok_or(CliError::NoLogPath)?;

            // Snapshot once, before the first mutation, so disable can put
            // back the exact original bytes.
            let snapshot = config.snapshot_path(config_path);
            if !snapshot.exists() {
                fs::create_dir_all(config.state_dir(config_path))?;
                fs::write(&snapshot, file.snapshot()?)?;
            }

            profile.enable(&file, &log_path, base_dir, !no_script_debug)?;
            println!("{}", "Debug logging enabled.".green());
        }
        ConfigCommands::Disable => {
            let snapshot = config.snapshot_path(config_path);
            if snapshot.exists() {
                let blob = fs::read_to_string(&snapshot)?;
                profile.disable(&file, Some(&blob))?;
                fs::remove_file(&snapshot)?;
                println!("{}", "Original config restored from snapshot.".green());
            } else {
                profile.disable(&file, None)?;
                println!("{}", "Debug directives removed (no snapshot found).".yellow());
            }
        }
        ConfigCommands::SetPath { path } => {
            let absolute = if path.is_absolute() {
                path
            } else {
                base_dir.join(path)
            };
            file.upsert(
                &profile.log_path,
                &DirectiveValue::Str(absolute.display().to_string()),
            )?;
            println!("Log path directive updated.");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use logkeep_core::LogKind;

    #[test]
    fn test_first_line_truncated_keeps_short_lines() {
        assert_eq!(first_line_truncated("short message", 72), "short message");
    }

    #[test]
    fn test_first_line_truncated_uses_first_line_only() {
        assert_eq!(
            first_line_truncated("head\nStack trace:\n#0 ...", 72),
            "head"
        );
    }

    #[test]
    fn test_first_line_truncated_cuts_long_lines() {
        let long = "x".repeat(100);
        let cut = first_line_truncated(&long, 72);
        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), 75);
    }

    #[test]
    fn test_entry_row_shortens_id() {
        let entry = LogEntry {
            id: "abcdef0123456789".to_string(),
            message: "msg".to_string(),
            source: String::new(),
            occurrences: vec!["01-Jan-2024 10:00:00 UTC".to_string()],
            count: 1,
            kind: LogKind::Php,
        };
        let row = EntryRow::from_entry(&entry);
        assert_eq!(row.id, "abcdef01");
        assert_eq!(row.latest, "01-Jan-2024 10:00:00 UTC");
        assert_eq!(row.kind, "php");
    }
}
