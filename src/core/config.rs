//! Configuration loading and persistence.
//!
//! A single TOML file in the platform config directory holds the service
//! base URL and the preferred theme. Saves go through a tempfile in the same
//! directory followed by an atomic rename.

use std::error::Error as StdError;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

/// Base URL used when neither flag, environment, nor config file names one.
pub const DEFAULT_API_BASE: &str = "http://localhost:4000";

/// Environment override for the service base URL.
pub const API_BASE_ENV: &str = "CHATELAINE_API_BASE";

#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct Config {
    /// Base URL of the character-chat service
    pub api_base: Option<String>,
    /// UI theme name ("dark" or "light")
    pub theme: Option<String>,
}

/// Errors that can occur when loading configuration from disk.
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    Read {
        /// Path to the configuration file that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse the configuration file as valid TOML.
    Parse {
        /// Path to the configuration file with invalid TOML.
        path: PathBuf,
        /// The TOML deserialization error.
        source: toml::de::Error,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read { path, source } => {
                write!(
                    f,
                    "Failed to read config at {}: {}",
                    path_display(path),
                    source
                )
            }
            ConfigError::Parse { path, source } => {
                write!(
                    f,
                    "Failed to parse config at {}: {}",
                    path_display(path),
                    source
                )
            }
        }
    }
}

impl StdError for ConfigError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            ConfigError::Read { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
        }
    }
}

/// Get a user-friendly display string for a path, using ~ notation on
/// Unix-like systems when the path sits under the home directory.
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}

impl Config {
    pub fn load() -> Result<Config, Box<dyn StdError>> {
        Self::load_from_path(&Self::get_config_path())
    }

    pub fn load_from_path(config_path: &PathBuf) -> Result<Config, Box<dyn StdError>> {
        if config_path.exists() {
            let contents = fs::read_to_string(config_path).map_err(|source| ConfigError::Read {
                path: config_path.clone(),
                source,
            })?;
            let config: Config =
                toml::from_str(&contents).map_err(|source| ConfigError::Parse {
                    path: config_path.clone(),
                    source,
                })?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<(), Box<dyn StdError>> {
        self.save_to_path(&Self::get_config_path())
    }

    pub(crate) fn save_to_path(&self, config_path: &Path) -> Result<(), Box<dyn StdError>> {
        let parent = config_path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty());

        if let Some(dir) = parent {
            fs::create_dir_all(dir)?;
        }

        let contents = toml::to_string_pretty(self)?;
        let mut temp_file = match parent {
            Some(dir) => NamedTempFile::new_in(dir)?,
            None => NamedTempFile::new()?,
        };

        temp_file.write_all(contents.as_bytes())?;
        temp_file.as_file_mut().sync_all()?;
        temp_file
            .persist(config_path)
            .map_err(|err| -> Box<dyn StdError> { Box::new(err) })?;
        Ok(())
    }

    pub(crate) fn get_config_path() -> PathBuf {
        let proj_dirs = ProjectDirs::from("org", "permacommons", "chatelaine")
            .expect("Failed to determine config directory");
        proj_dirs.config_dir().join("config.toml")
    }
}

/// Resolve the service base URL. Precedence: CLI flag, then the
/// `CHATELAINE_API_BASE` environment variable, then the config file, then
/// the built-in default.
pub fn resolve_api_base(cli: Option<&str>, env: Option<String>, config: &Config) -> String {
    cli.map(str::to_string)
        .or(env)
        .or_else(|| config.api_base.clone())
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");

        let config = Config::load_from_path(&path).expect("load");
        assert!(config.api_base.is_none());
        assert!(config.theme.is_none());
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "api_base = [not toml").expect("write");

        let err = Config::load_from_path(&path).expect_err("parse failure");
        let msg = err.to_string();
        assert!(msg.contains("Failed to parse config"), "got: {msg}");
    }

    #[test]
    fn save_and_reload_round_trips() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("config.toml");

        let config = Config {
            api_base: Some("https://chat.example.org".to_string()),
            theme: Some("light".to_string()),
        };
        config.save_to_path(&path).expect("save");

        let loaded = Config::load_from_path(&path).expect("load");
        assert_eq!(loaded.api_base.as_deref(), Some("https://chat.example.org"));
        assert_eq!(loaded.theme.as_deref(), Some("light"));
    }

    #[test]
    fn api_base_precedence_is_flag_env_config_default() {
        let config = Config {
            api_base: Some("http://from-config".to_string()),
            theme: None,
        };

        assert_eq!(
            resolve_api_base(Some("http://from-flag"), Some("http://from-env".into()), &config),
            "http://from-flag"
        );
        assert_eq!(
            resolve_api_base(None, Some("http://from-env".into()), &config),
            "http://from-env"
        );
        assert_eq!(resolve_api_base(None, None, &config), "http://from-config");
        assert_eq!(
            resolve_api_base(None, None, &Config::default()),
            DEFAULT_API_BASE
        );
    }
}
