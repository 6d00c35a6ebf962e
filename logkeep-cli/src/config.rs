use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::errors::{CliError, Result};
use logkeep_core::LogPaths;

const CONFIG_FILE_NAME: &str = "logkeep.toml";
const DEFAULT_STATE_DIR: &str = ".logkeep";

/// The CLI's own paths file. Everything the engine needs is resolved here
/// once and passed down as explicit parameters.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// The runtime's error log.
    pub php_log: Option<PathBuf>,
    /// The browser-error log fed by `append`.
    pub js_log: Option<PathBuf>,
    /// The runtime config file holding `define( 'NAME', value );` directives.
    pub config_file: Option<PathBuf>,
    /// Where snapshots live. Defaults to `.logkeep` next to logkeep.toml.
    pub state_dir: Option<PathBuf>,
    /// Gate for the `append` command.
    #[serde(default = "default_true")]
    pub js_error_logging: bool,
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Find logkeep.toml in the given directory or any parent.
    pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
        let mut current = start_dir.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILE_NAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Resolve the config path from the CLI flag or by directory search.
    pub fn resolve_config_path(file: &Option<String>) -> Result<PathBuf> {
        match file {
            Some(path) => Ok(PathBuf::from(path)),
            None => {
                let cwd = std::env::current_dir()?;
                Config::find_config_file(&cwd)
                    .ok_or_else(|| CliError::ConfigNotFound(PathBuf::from(CONFIG_FILE_NAME)))
            }
        }
    }

    pub fn load(path: &Path) -> Result<Config> {
        if !path.exists() {
            return Err(CliError::ConfigNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|source| CliError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn log_paths(&self) -> LogPaths {
        LogPaths {
            php: self.php_log.clone(),
            js: self.js_log.clone(),
        }
    }

    /// Snapshot/state directory, relative paths anchored at the logkeep.toml
    /// location.
    pub fn state_dir(&self, config_path: &Path) -> PathBuf {
        let base = config_path.parent().unwrap_or_else(|| Path::new("."));
        match &self.state_dir {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => base.join(dir),
            None => base.join(DEFAULT_STATE_DIR),
        }
    }

    pub fn snapshot_path(&self, config_path: &Path) -> PathBuf {
        self.state_dir(config_path).join("config.snapshot")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_find_config_file_walks_parents() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b/c");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "").unwrap();

        let found = Config::find_config_file(&nested).unwrap();
        assert_eq!(found, dir.path().join(CONFIG_FILE_NAME));
    }

    #[test]
    fn test_load_parses_paths_and_gate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(
            &path,
            "php_log = \"/var/www/debug.log\"\njs_error_logging = false\n",
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.php_log.as_deref(), Some(Path::new("/var/www/debug.log")));
        assert!(config.js_log.is_none());
        assert!(!config.js_error_logging);
    }

    #[test]
    fn test_js_error_logging_defaults_on() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "").unwrap();
        assert!(Config::load(&path).unwrap().js_error_logging);
    }

    #[test]
    fn test_state_dir_defaults_next_to_config() {
        let config: Config = toml::from_str("").unwrap();
        let state = config.state_dir(Path::new("/srv/site/logkeep.toml"));
        assert_eq!(state, PathBuf::from("/srv/site/.logkeep"));
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(toml::from_str::<Config>("unknown_key = 1\n").is_err());
    }
}
