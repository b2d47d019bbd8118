// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for tariff-core operations.
//!
//! The taxonomy is split by origin so callers can apply different recovery
//! rules: authentication rejections are shown to the user, storage failures
//! on writes are propagated, and remote failures fall back to local state.

use thiserror::Error;

/// Reasons the authority refuses a login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthError {
    /// The user exists but the password does not match.
    #[error("invalid password")]
    InvalidCredentials,

    /// No user with the given login exists.
    #[error("user not found")]
    UserNotFound,
}

/// Failures of the local key-value store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing storage could not be opened. Worth retrying later.
    #[error("local store unavailable: {0}")]
    Unavailable(String),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl StorageError {
    /// Returns true when the same write may succeed if attempted again.
    pub fn is_retryable(&self) -> bool {
        match self {
            StorageError::Unavailable(_) | StorageError::Io(_) => true,
            StorageError::Database(e) => matches!(
                e.sqlite_error_code(),
                Some(rusqlite::ErrorCode::DatabaseBusy)
                    | Some(rusqlite::ErrorCode::DatabaseLocked)
                    | Some(rusqlite::ErrorCode::CannotOpen)
            ),
            StorageError::Serialization(_) => false,
        }
    }
}

/// Failures talking to the remote authority.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    #[error("connection closed")]
    ConnectionClosed,

    #[error("send failed: {0}")]
    SendFailed(String),

    #[error("receive failed: {0}")]
    ReceiveFailed(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    /// The authority could not be reached (offline, simulated outage).
    #[error("remote unavailable: {0}")]
    Unavailable(String),

    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    /// The authority answered, and the answer is a login rejection.
    #[error(transparent)]
    Rejected(#[from] AuthError),
}

/// A specialized Result type for storage operations.
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// A specialized Result type for remote operations.
pub type RemoteResult<T> = std::result::Result<T, RemoteError>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
