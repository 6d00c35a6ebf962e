use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Config file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("Failed to parse config file '{path}': {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("No runtime config file configured; set config_file in logkeep.toml")]
    NoRuntimeConfig,

    #[error("No log path given; pass --log-path or set php_log in logkeep.toml")]
    NoLogPath,

    #[error("JavaScript error logging is disabled in logkeep.toml")]
    JsLoggingDisabled,

    #[error("No log target succeeded")]
    AllTargetsFailed,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode JSON output: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Core(#[from] logkeep_core::CoreError),
}

pub type Result<T> = std::result::Result<T, CliError>;
