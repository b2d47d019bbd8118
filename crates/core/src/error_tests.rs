// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use yare::parameterized;

#[parameterized(
    invalid_credentials = { AuthError::InvalidCredentials, "invalid password" },
    user_not_found = { AuthError::UserNotFound, "user not found" },
)]
fn auth_error_display(err: AuthError, expected: &str) {
    assert_eq!(err.to_string(), expected);
}

#[parameterized(
    unavailable = { RemoteError::Unavailable("offline".into()), "offline" },
    closed = { RemoteError::ConnectionClosed, "closed" },
    unexpected = { RemoteError::UnexpectedResponse("pong".into()), "pong" },
)]
fn remote_error_display_contains(err: RemoteError, expected: &str) {
    assert!(err.to_string().contains(expected));
}

#[test]
fn rejected_is_transparent() {
    let err: RemoteError = AuthError::UserNotFound.into();
    assert!(matches!(err, RemoteError::Rejected(AuthError::UserNotFound)));
    assert_eq!(err.to_string(), "user not found");
}

#[test]
fn unavailable_storage_is_retryable() {
    assert!(StorageError::Unavailable("locked".into()).is_retryable());
}

#[test]
fn serialization_storage_error_is_not_retryable() {
    let json_err = serde_json::from_str::<()>("invalid").unwrap_err();
    let err: StorageError = json_err.into();
    assert!(matches!(err, StorageError::Serialization(_)));
    assert!(!err.is_retryable());
}

#[test]
fn storage_error_from_io() {
    let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let err: StorageError = io_err.into();
    assert!(matches!(err, StorageError::Io(_)));
}

#[test]
fn auth_error_serializes_snake_case() {
    let json = serde_json::to_string(&AuthError::InvalidCredentials).unwrap();
    assert_eq!(json, "\"invalid_credentials\"");
}
