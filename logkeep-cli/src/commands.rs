use std::path::PathBuf;

use clap::Subcommand;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List deduplicated log entries with occurrence counts
    List {
        /// Which log kind to include: all, php or js
        #[arg(long, default_value = "all")]
        kind: String,

        /// Emit the full report as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Truncate log files
    Clear {
        /// Which log kind to clear: all, php or js
        #[arg(long, default_value = "all")]
        kind: String,
    },

    /// Append a runtime-originated error to the js log
    Append {
        /// Error message text
        #[arg(long)]
        message: String,

        /// Script URL or path the error came from
        #[arg(long)]
        script: String,

        #[arg(long, default_value_t = 0)]
        line: u32,

        #[arg(long, default_value_t = 0)]
        column: u32,

        /// Site base URL
        #[arg(long, default_value = "")]
        url: String,

        /// Page path appended to the site URL
        #[arg(long, default_value = "")]
        page: String,

        /// Label written before the message
        #[arg(long, default_value = "JavaScript Error")]
        error_type: String,
    },

    /// Delete entries whose latest occurrence is older than a date
    Purge {
        /// Cutoff date, e.g. "2024-03-01 00:00:00"
        #[arg(long)]
        before: String,

        /// Which log kind to purge: all, php or js
        #[arg(long, default_value = "all")]
        kind: String,

        /// Emit per-target results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Keep only entries active within the last N periods
    Keep {
        /// Number of periods
        number: u32,

        /// Period unit: days, weeks or months
        period: String,

        /// Which log kind to purge: all, php or js
        #[arg(long, default_value = "all")]
        kind: String,

        /// Emit per-target results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage debug directives in the runtime config file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Snapshot the config file, then turn debug logging on
    Enable {
        /// Log file path written into the config (defaults to php_log)
        #[arg(long)]
        log_path: Option<PathBuf>,

        /// Leave the script-debug flag alone
        #[arg(long)]
        no_script_debug: bool,
    },

    /// Turn logging off: restore the snapshot, else strip the directives
    Disable,

    /// Update only the log-path directive
    SetPath {
        path: PathBuf,
    },
}
