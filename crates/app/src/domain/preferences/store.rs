//! Preferences store.

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use tokio::fs;
use tracing::warn;

use crate::domain::preferences::{PreferencesError, models::CheckoutPreferences};

/// Checkout preferences kept in a JSON file.
#[derive(Debug, Clone)]
pub struct PreferencesStore {
    path: PathBuf,
}

impl PreferencesStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored preferences. A missing, unreadable or malformed file yields defaults.
    #[tracing::instrument(
        name = "preferences.store.load",
        skip(self),
        fields(path = %self.path.display())
    )]
    pub async fn load(&self) -> CheckoutPreferences {
        match fs::read_to_string(&self.path).await {
            Ok(json) => CheckoutPreferences::from_json(&json),
            Err(error) if error.kind() == ErrorKind::NotFound => CheckoutPreferences::default(),
            Err(error) => {
                warn!(%error, "checkout preferences unreadable; using defaults");

                CheckoutPreferences::default()
            }
        }
    }

    /// Write the preferences, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns a `PreferencesError` if the file cannot be written.
    #[tracing::instrument(
        name = "preferences.store.save",
        skip(self, preferences),
        fields(path = %self.path.display()),
        err
    )]
    pub async fn save(&self, preferences: &CheckoutPreferences) -> Result<(), PreferencesError> {
        let json = serde_json::to_string_pretty(preferences)?;

        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|source| self.io_error(source))?;
        }

        fs::write(&self.path, json)
            .await
            .map_err(|source| self.io_error(source))
    }

    fn io_error(&self, source: std::io::Error) -> PreferencesError {
        PreferencesError::Io {
            path: self.path.clone(),
            source,
        }
    }
}
