// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! WebSocket protocol messages between a client and the tariff authority.
//!
//! The protocol is request/response:
//! - Client asks to authenticate or for the authoritative record set
//! - Server answers each request with exactly one message

use serde::{Deserialize, Serialize};

use crate::error::AuthError;
use crate::record::Record;

/// Messages sent from client to server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Exchange credentials for a session token.
    Authenticate { username: String, password: String },

    /// Request the authoritative record set.
    FetchRecords,

    /// Ping message for keepalive.
    Ping {
        /// Client-chosen ID echoed in Pong.
        id: u64,
    },
}

/// Messages sent from server to client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Successful authentication.
    AuthGranted { token: String, user: String },

    /// Credentials were refused.
    AuthRejected { reason: AuthError },

    /// Response to FetchRecords. Every record is marked processed.
    Records { records: Vec<Record> },

    /// Pong response to client Ping.
    Pong {
        /// Echoed from the Ping message.
        id: u64,
    },

    /// Error message.
    Error {
        /// Human-readable error description.
        message: String,
    },
}

impl ClientMessage {
    /// Creates an Authenticate message.
    pub fn authenticate(username: impl Into<String>, password: impl Into<String>) -> Self {
        ClientMessage::Authenticate {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Creates a FetchRecords message.
    pub fn fetch_records() -> Self {
        ClientMessage::FetchRecords
    }

    /// Creates a Ping message.
    pub fn ping(id: u64) -> Self {
        ClientMessage::Ping { id }
    }

    /// Serializes the message to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes the message from JSON.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

impl ServerMessage {
    pub fn auth_granted(token: impl Into<String>, user: impl Into<String>) -> Self {
        ServerMessage::AuthGranted {
            token: token.into(),
            user: user.into(),
        }
    }

    pub fn auth_rejected(reason: AuthError) -> Self {
        ServerMessage::AuthRejected { reason }
    }

    pub fn records(records: Vec<Record>) -> Self {
        ServerMessage::Records { records }
    }

    /// Creates a Pong message.
    pub fn pong(id: u64) -> Self {
        ServerMessage::Pong { id }
    }

    /// Creates an Error message.
    pub fn error(message: impl Into<String>) -> Self {
        ServerMessage::Error {
            message: message.into(),
        }
    }

    /// Serializes the message to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes the message from JSON.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
