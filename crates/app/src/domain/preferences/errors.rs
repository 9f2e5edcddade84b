//! Preferences errors.

use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PreferencesError {
    #[error("failed to write preferences to {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to serialize preferences")]
    Serialize(#[from] serde_json::Error),
}
