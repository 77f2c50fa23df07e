//! Socket task for a single WebSocket connection.
//!
//! Registers a [`ChannelTransport`] with the registry, then pumps queued
//! frames to the client until either side goes away. Inbound text is only
//! logged; the channel is server → client.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};

use super::registry::{Connection, ConnectionRegistry};
use super::transport::{ChannelTransport, Transport};

/// Runs the read/write loop for one socket.
///
/// The connection is removed from `registry` as soon as the loop ends.
pub async fn run_connection(socket: WebSocket, registry: ConnectionRegistry, buffer: usize) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let (transport, mut outbound) = ChannelTransport::new(buffer);
    let transport = Arc::new(transport);
    let connection = Connection::new(Arc::clone(&transport) as Arc<dyn Transport>);
    let id = connection.id();
    registry.add_connection(connection);

    loop {
        tokio::select! {
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        tracing::debug!(connection = %id, message = %text.as_str(), "ws message received");
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        tracing::debug!(connection = %id, error = %e, "ws read failed");
                        break;
                    }
                    Some(Ok(_)) => {}
                }
            }
            frame = outbound.recv() => {
                let Some(frame) = frame else { break };
                if ws_tx.send(Message::text(frame)).await.is_err() {
                    break;
                }
            }
        }
    }

    transport.close();
    tracing::debug!(connection = %id, "ws connection closed");
}
