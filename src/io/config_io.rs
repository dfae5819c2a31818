use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::AppConfig;

pub const CONFIG_FILE: &str = "taskdeck.toml";

/// Error type for config I/O operations
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Resolve the taskdeck home directory.
///
/// Order: explicit `--home`, `$TASKDECK_HOME`, `$XDG_CONFIG_HOME/taskdeck`,
/// `$HOME/.config/taskdeck`.
pub fn resolve_home(explicit: Option<&Path>) -> PathBuf {
    resolve_home_with(explicit, |key| std::env::var(key).ok())
}

/// Same as [`resolve_home`] with an injectable environment lookup
pub fn resolve_home_with<F>(explicit: Option<&Path>, env: F) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    let non_empty = |key: &str| env(key).filter(|v| !v.is_empty()).map(PathBuf::from);
    if let Some(home) = non_empty("TASKDECK_HOME") {
        return home;
    }
    let config_dir = non_empty("XDG_CONFIG_HOME").unwrap_or_else(|| {
        non_empty("HOME")
            .unwrap_or_else(|| PathBuf::from("/"))
            .join(".config")
    });
    config_dir.join("taskdeck")
}

/// Read taskdeck.toml from `home`. A missing file yields the defaults.
pub fn read_config(home: &Path) -> Result<AppConfig, ConfigError> {
    let path = home.join(CONFIG_FILE);
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(AppConfig::default());
    }
    let text = fs::read_to_string(&path).map_err(|source| ConfigError::ReadError {
        path: path.clone(),
        source,
    })?;
    toml::from_str(&text).map_err(|source| ConfigError::ParseError { path, source })
}
