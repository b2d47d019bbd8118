// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use tariff_core::{AuthError, RecordId, RemoteError, StorageError};
use thiserror::Error;

/// All errors surfaced by the sync layer.
///
/// Login rejections arrive from the remote wrapped in
/// [`RemoteError::Rejected`]; they are lifted into [`Error::Auth`] so callers
/// match on a single variant regardless of which remote produced them.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Auth(AuthError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Remote(RemoteError),

    #[error("record not found: {0}")]
    RecordNotFound(RecordId),

    #[error("config error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<RemoteError> for Error {
    fn from(e: RemoteError) -> Self {
        match e {
            RemoteError::Rejected(reason) => Error::Auth(reason),
            other => Error::Remote(other),
        }
    }
}

impl From<AuthError> for Error {
    fn from(e: AuthError) -> Self {
        Error::Auth(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Storage(StorageError::Serialization(e))
    }
}

impl Error {
    /// Returns true when retrying the same operation later may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Storage(e) => e.is_retryable(),
            Error::Remote(e) => !matches!(e, RemoteError::UnexpectedResponse(_)),
            _ => false,
        }
    }
}

/// A specialized Result type for sync operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
