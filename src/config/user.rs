//! User-wide configuration.
//!
//! Location: `$XDG_CONFIG_HOME/scopetrack/scopetrack.toml`, falling back to the
//! platform config directory (`dirs::config_dir()`).

use super::settings::TrackerSettings;
use std::path::PathBuf;
use thiserror::Error;

pub const CONFIG_FILE_NAME: &str = "scopetrack.toml";

#[derive(Debug, Error)]
pub enum UserConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type UserConfigResult<T> = Result<T, UserConfigError>;

/// Path of the user configuration file, if a config directory is known.
pub fn user_config_path() -> Option<PathBuf> {
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .or_else(dirs::config_dir)?;
    Some(base.join("scopetrack").join(CONFIG_FILE_NAME))
}

/// Load the user configuration. A missing file is `Ok(None)`.
pub fn load_user_config() -> UserConfigResult<Option<TrackerSettings>> {
    let Some(path) = user_config_path() else {
        return Ok(None);
    };
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|source| UserConfigError::Io {
        path: path.clone(),
        source,
    })?;
    toml::from_str(&contents)
        .map(Some)
        .map_err(|source| UserConfigError::Parse { path, source })
}
