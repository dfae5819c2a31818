use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::io::local_state::{read_local_state, write_local_state, LocalState, StateError};
use crate::model::user::{Language, Preferences, Theme, User};

pub const DEFAULT_AUTH_LATENCY: Duration = Duration::from_millis(1000);

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error(transparent)]
    State(#[from] StateError),
}

/// The signed-in user and UI preferences, backed by state.json in `home`.
/// Every change is written through immediately.
#[derive(Debug)]
pub struct Session {
    home: PathBuf,
    auth_latency: Duration,
    state: LocalState,
}

impl Session {
    pub fn load(home: &Path, auth_latency: Duration) -> Self {
        Session {
            home: home.to_path_buf(),
            auth_latency,
            state: read_local_state(home),
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.state.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.user.is_some()
    }

    pub fn preferences(&self) -> Preferences {
        self.state.preferences()
    }

    /// Mock sign-in: any non-empty username and password succeed after the
    /// configured delay.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<User, AuthError> {
        tokio::time::sleep(self.auth_latency).await;
        if username.is_empty() || password.is_empty() {
            tracing::warn!("login rejected");
            return Err(AuthError::InvalidCredentials);
        }
        let user = User::mock(username);
        self.state.user = Some(user.clone());
        self.save()?;
        tracing::info!(username, "logged in");
        Ok(user)
    }

    pub fn logout(&mut self) -> Result<(), StateError> {
        if self.state.user.take().is_some() {
            tracing::info!("logged out");
        }
        self.save()
    }

    pub fn set_theme(&mut self, theme: Theme) -> Result<(), StateError> {
        self.state.theme = theme;
        self.save()
    }

    pub fn toggle_theme(&mut self) -> Result<Theme, StateError> {
        let theme = self.state.theme.toggled();
        self.set_theme(theme)?;
        Ok(theme)
    }

    pub fn set_language(&mut self, language: Language) -> Result<(), StateError> {
        self.state.language = language;
        self.save()
    }

    fn save(&self) -> Result<(), StateError> {
        write_local_state(&self.home, &self.state)
    }
}
