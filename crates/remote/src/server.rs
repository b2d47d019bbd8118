// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! WebSocket server implementation.
//!
//! Each connection is served in its own task. Every text frame is one
//! request and gets exactly one reply.

use std::net::SocketAddr;

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info};

use tariff_core::protocol::{ClientMessage, ServerMessage};

use crate::state::AuthorityState;

/// Run the WebSocket server on the given address.
pub async fn run(
    addr: SocketAddr,
    state: AuthorityState,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let listener = TcpListener::bind(addr).await?;
    info!("Listening on: {}", addr);
    serve(listener, state).await?;
    Ok(())
}

/// Accept connections from `listener` forever.
pub(crate) async fn serve(
    listener: TcpListener,
    state: AuthorityState,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    loop {
        let (stream, peer_addr) = listener.accept().await?;
        let state = state.clone();

        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, peer_addr, state).await {
                error!("Connection error from {}: {}", peer_addr, e);
            }
        });
    }
}

/// Handle a single WebSocket connection.
pub(crate) async fn handle_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    state: AuthorityState,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut ws = tokio_tungstenite::accept_async(stream).await?;
    info!("New WebSocket connection from: {}", peer_addr);

    while let Some(msg) = ws.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                let response = handle_client_message(&text, &state).await;
                ws.send(Message::Text(response.to_json()?.into())).await?;
            }
            Ok(Message::Close(_)) => {
                info!("Client {} disconnected", peer_addr);
                break;
            }
            Ok(Message::Ping(data)) => {
                ws.send(Message::Pong(data)).await?;
            }
            // Binary, Pong and raw frames are not part of the protocol
            Ok(_) => {}
            Err(e) => {
                error!("WebSocket error from {}: {}", peer_addr, e);
                break;
            }
        }
    }

    info!("Connection closed: {}", peer_addr);
    Ok(())
}

/// Process one request and produce its reply.
pub(crate) async fn handle_client_message(text: &str, state: &AuthorityState) -> ServerMessage {
    let msg = match ClientMessage::from_json(text) {
        Ok(msg) => msg,
        Err(e) => return ServerMessage::error(format!("invalid message: {e}")),
    };

    match msg {
        ClientMessage::Authenticate { username, password } => {
            match state.authenticate(&username, &password).await {
                Ok(grant) => {
                    info!("Login granted for {}", grant.user);
                    ServerMessage::auth_granted(grant.token, grant.user)
                }
                Err(reason) => {
                    info!("Login rejected for {}: {}", username, reason);
                    ServerMessage::auth_rejected(reason)
                }
            }
        }

        ClientMessage::FetchRecords => {
            let records = state.records().await;
            debug!("Fetch response: {} records", records.len());
            ServerMessage::records(records)
        }

        ClientMessage::Ping { id } => {
            debug!("Ping received: {}", id);
            ServerMessage::pong(id)
        }
    }
}
