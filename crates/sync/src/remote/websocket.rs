// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Remote authority reached over WebSocket.
//!
//! Every call is one request followed by one response on a lazily opened
//! connection. A broken connection is reopened on the next call.

use tariff_core::protocol::{ClientMessage, ServerMessage};
use tariff_core::{AuthGrant, Record, RemoteError, RemoteResult};
use tracing::{debug, warn};

use super::transport::{Transport, WebSocketTransport};
use super::{Remote, RemoteFuture};

/// Client for a `tariff-remote` server.
pub struct WebSocketRemote<T: Transport = WebSocketTransport> {
    url: String,
    transport: T,
    next_ping: u64,
}

impl WebSocketRemote<WebSocketTransport> {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_transport(url, WebSocketTransport::new())
    }
}

impl<T: Transport> WebSocketRemote<T> {
    /// Create a remote over a custom transport (for testing).
    pub fn with_transport(url: impl Into<String>, transport: T) -> Self {
        WebSocketRemote {
            url: url.into(),
            transport,
            next_ping: 1,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Closes the connection if one is open.
    pub async fn disconnect(&mut self) -> RemoteResult<()> {
        self.transport.disconnect().await
    }

    /// Round-trips a ping to check the authority is reachable.
    pub async fn ping(&mut self) -> RemoteResult<()> {
        let id = self.next_ping;
        self.next_ping += 1;
        match self.request(ClientMessage::ping(id)).await? {
            ServerMessage::Pong { id: echoed } if echoed == id => Ok(()),
            other => Err(unexpected(&other)),
        }
    }

    async fn request(&mut self, msg: ClientMessage) -> RemoteResult<ServerMessage> {
        if !self.transport.is_connected() {
            self.transport.connect(&self.url).await?;
        }
        self.transport.send(msg).await?;

        match self.transport.recv().await? {
            Some(ServerMessage::Error { message }) => {
                warn!(%message, "authority reported an error");
                Err(RemoteError::Unavailable(message))
            }
            Some(reply) => Ok(reply),
            None => Err(RemoteError::ConnectionClosed),
        }
    }
}

fn unexpected(msg: &ServerMessage) -> RemoteError {
    RemoteError::UnexpectedResponse(format!("{msg:?}"))
}

impl<T: Transport> Remote for WebSocketRemote<T> {
    fn authenticate(&mut self, username: &str, password: &str) -> RemoteFuture<'_, AuthGrant> {
        let msg = ClientMessage::authenticate(username, password);
        Box::pin(async move {
            match self.request(msg).await? {
                ServerMessage::AuthGranted { token, user } => {
                    debug!(%user, "login granted");
                    Ok(AuthGrant { token, user })
                }
                ServerMessage::AuthRejected { reason } => Err(RemoteError::Rejected(reason)),
                other => Err(unexpected(&other)),
            }
        })
    }

    fn fetch_records(&mut self) -> RemoteFuture<'_, Vec<Record>> {
        Box::pin(async move {
            match self.request(ClientMessage::fetch_records()).await? {
                ServerMessage::Records { records } => {
                    debug!(count = records.len(), "fetched records");
                    Ok(records)
                }
                other => Err(unexpected(&other)),
            }
        })
    }
}
