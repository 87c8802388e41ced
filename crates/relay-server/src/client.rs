// crates/relay-server/src/client.rs

use std::time::Duration;

use anyhow::{Context, Result};
use axum::extract::ws::{Message, WebSocket};
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use relay_core::{Connection, ConnectionId, OutboundRx, Registry, RoomId};
use relay_protocol::format_broadcast;
use tokio::time::timeout;
use tracing::debug;

use crate::types::RelayState;

/// Run the I/O loops for a single connection.
///
/// The connection stays in `room` for exactly as long as this future
/// is alive: the membership guard leaves on every exit path, including
/// errors and the task being dropped.
pub async fn run_client(
    id: ConnectionId,
    socket: WebSocket,
    room: RoomId,
    state: RelayState,
) -> Result<()> {
    let (connection, out_rx) = Connection::channel(id, state.config.outbound_capacity);
    let membership = state.registry.enter(connection, room)?;

    let (sink, stream) = socket.split();

    // Writer task: drain queued broadcasts into the socket.
    let mut writer = tokio::spawn(write_loop(id, sink, out_rx, state.config.send_timeout));

    // Whichever side ends first ends the connection.
    let result = tokio::select! {
        res = read_loop(id, stream, membership.room(), &state.registry) => res,
        res = &mut writer => res.context("writer task failed").and_then(|r| r),
    };

    writer.abort();
    membership.leave();
    result
}

async fn read_loop(
    id: ConnectionId,
    mut stream: SplitStream<WebSocket>,
    room: &RoomId,
    registry: &Registry,
) -> Result<()> {
    while let Some(frame) = stream.next().await {
        match frame.context("read error")? {
            Message::Text(text) => {
                let report = registry.broadcast(room, &format_broadcast(room, &text));
                debug!(
                    connection = %id,
                    room = %room,
                    delivered = report.delivered,
                    failed = report.failed.len(),
                    "relayed message"
                );
            }
            Message::Close(_) => break,
            Message::Binary(_) => debug!(connection = %id, "ignoring binary frame"),
            // Pings are answered by the websocket layer.
            Message::Ping(_) | Message::Pong(_) => {}
        }
    }

    Ok(())
}

async fn write_loop(
    id: ConnectionId,
    mut sink: SplitSink<WebSocket, Message>,
    mut out_rx: OutboundRx,
    send_timeout: Duration,
) -> Result<()> {
    while let Some(frame) = out_rx.recv().await {
        timeout(send_timeout, sink.send(Message::Text(frame.to_string())))
            .await
            .with_context(|| format!("write to connection {id} timed out"))?
            .context("write error")?;
    }

    Ok(())
}
