//! On-disk `config.toml` and `state.toml` under the platform config dir.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::app_config::{APP_NAME, APP_ORGANIZATION, APP_QUALIFIER, AppConfig};
use super::state_config::StateConfig;
use crate::domain::TopicId;

const CONFIG_FILE_NAME: &str = "config.toml";
const STATE_FILE_NAME: &str = "state.toml";

/// Failure to locate, read or write a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform has no config directory for this user.
    #[error("no home directory to place configuration in")]
    ConfigDirNotFound,
    /// Filesystem failure on `path`.
    #[error("{path}: {source}")]
    Io {
        /// File or directory being accessed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// A value could not be rendered as TOML.
    #[error("cannot serialize {0}: {1}")]
    Serialize(&'static str, #[source] toml::ser::Error),
}

impl ConfigError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Reads and writes threadroom's TOML files.
pub struct StorageManager {
    config_dir: PathBuf,
}

impl StorageManager {
    /// Resolves the platform config directory.
    ///
    /// # Errors
    /// Returns [`ConfigError::ConfigDirNotFound`] when no home directory exists.
    pub fn new() -> Result<Self, ConfigError> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| Self::with_dir(dirs.config_dir().to_path_buf()))
            .ok_or(ConfigError::ConfigDirNotFound)
    }

    /// Uses `config_dir` instead of the platform directory.
    #[must_use]
    pub const fn with_dir(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    /// Directory holding `config.toml` and `state.toml`.
    #[must_use]
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Loads `config.toml`, or the file at `path_override`.
    ///
    /// A missing file is created with defaults. A malformed file is left
    /// untouched and defaults are used for this run.
    ///
    /// # Errors
    /// Returns error if the file cannot be read or the default cannot be written.
    pub fn load_config(&self, path_override: Option<&Path>) -> Result<AppConfig, ConfigError> {
        let path = path_override.map_or_else(|| self.config_dir.join(CONFIG_FILE_NAME), Path::to_path_buf);

        if let Some(config) = read_toml::<AppConfig>(&path, "config")? {
            return Ok(config);
        }
        if path.exists() {
            return Ok(AppConfig::default());
        }

        info!(path = %path.display(), "Writing default config");
        let config = AppConfig::default();
        write_atomic(&path, "config", &config)?;
        Ok(config)
    }

    /// Loads `state.toml`. Missing or malformed state starts fresh.
    ///
    /// # Errors
    /// Returns error if the file exists but cannot be read.
    pub fn load_state(&self) -> Result<StateConfig, ConfigError> {
        let path = self.config_dir.join(STATE_FILE_NAME);
        Ok(read_toml(&path, "state")?.unwrap_or_default())
    }

    /// Writes `state.toml` atomically.
    ///
    /// # Errors
    /// Returns error if the state file cannot be written.
    pub fn save_state(&self, state: &StateConfig) -> Result<(), ConfigError> {
        write_atomic(&self.config_dir.join(STATE_FILE_NAME), "state", state)
    }

    /// Records `topic_id` as the topic to rejoin on the next start.
    ///
    /// # Errors
    /// Returns error if the state file cannot be written.
    pub fn remember_topic(&self, topic_id: TopicId) -> Result<(), ConfigError> {
        let mut state = self.load_state()?;
        state.last_topic_id = Some(topic_id.as_u64());
        self.save_state(&state)
    }
}

/// `Ok(None)` when the file is absent or does not parse.
fn read_toml<T: DeserializeOwned>(path: &Path, what: &str) -> Result<Option<T>, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(ConfigError::io(path, e)),
    };

    match toml::from_str(&content) {
        Ok(value) => {
            debug!(path = %path.display(), "Loaded {what}");
            Ok(Some(value))
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Ignoring malformed {what} file");
            Ok(None)
        }
    }
}

/// Replaces `path` through a temp file in the same directory.
fn write_atomic<T: Serialize>(path: &Path, what: &'static str, data: &T) -> Result<(), ConfigError> {
    let content = toml::to_string_pretty(data).map_err(|e| ConfigError::Serialize(what, e))?;

    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir).map_err(|e| ConfigError::io(dir, e))?;

    let mut file = tempfile::NamedTempFile::new_in(dir).map_err(|e| ConfigError::io(dir, e))?;
    file.write_all(content.as_bytes())
        .map_err(|e| ConfigError::io(path, e))?;
    file.persist(path).map_err(|e| ConfigError::io(path, e.error))?;
    Ok(())
}
