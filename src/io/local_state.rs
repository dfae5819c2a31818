use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::model::user::{Language, Preferences, Theme, User};

pub const STATE_FILE: &str = "state.json";

/// Session and UI preferences that survive between runs (state.json)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalState {
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub language: Language,
}

impl LocalState {
    pub fn preferences(&self) -> Preferences {
        Preferences {
            theme: self.theme,
            language: self.language,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not serialize local state: {0}")]
    SerializeError(#[from] serde_json::Error),
}

/// Read state.json from `home`. Missing or unreadable state is the default.
pub fn read_local_state(home: &Path) -> LocalState {
    let path = home.join(STATE_FILE);
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return LocalState::default(),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "could not read local state");
            return LocalState::default();
        }
    };
    match serde_json::from_str(&content) {
        Ok(state) => state,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring malformed local state");
            LocalState::default()
        }
    }
}

/// Write state.json atomically (temp file in the same directory, then rename).
pub fn write_local_state(home: &Path, state: &LocalState) -> Result<(), StateError> {
    let path = home.join(STATE_FILE);
    let write_err = |source| StateError::WriteError {
        path: path.clone(),
        source,
    };
    let content = serde_json::to_string_pretty(state)?;
    fs::create_dir_all(home).map_err(write_err)?;
    let mut tmp = tempfile::NamedTempFile::new_in(home).map_err(write_err)?;
    tmp.write_all(content.as_bytes()).map_err(write_err)?;
    tmp.persist(&path).map_err(|e| write_err(e.error))?;
    Ok(())
}
