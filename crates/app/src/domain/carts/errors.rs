//! Cart source errors.

use std::{io, path::PathBuf};

use thiserror::Error;

use crate::api::{ApiError, RecordError};

#[derive(Debug, Error)]
pub enum CartSourceError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("invalid cart record")]
    Record(#[from] RecordError),

    #[error("failed to read cart file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed cart file")]
    Parse(#[from] serde_json::Error),
}
