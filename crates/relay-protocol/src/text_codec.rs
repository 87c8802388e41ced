// crates/relay-protocol/src/text_codec.rs

//! Plain-text wire format.
//!
//! Addressing (client → server, at connection time):
//!
//! - WebSocket upgrade on `/ws/<path>`; the room is the **final** path
//!   segment, e.g. `/ws/lobby` and `/ws/team/lobby` both address `lobby`.
//! - The path is split while still percent-encoded and only the final
//!   segment is decoded, so `/ws/a%2Fb` addresses the room `a/b`.
//!
//! Frames:
//!
//! - Inbound: one text frame = one message, taken verbatim.
//! - Outbound: `Message in {room}: {text}`
//!
//! The outbound prefix is what existing browser clients expect, so it
//! must not change.

use std::fmt;

use relay_core::RoomId;

/// Route prefix under which rooms are addressed.
pub const WS_ROUTE_PREFIX: &str = "/ws/";

const BROADCAST_PREFIX: &str = "Message in ";
const BROADCAST_SEPARATOR: &str = ": ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// The connection path has no usable final segment.
    EmptyRoom,
    /// The final segment does not decode to UTF-8.
    InvalidEncoding,
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::EmptyRoom => write!(f, "Connection path does not name a room"),
            ProtocolError::InvalidEncoding => write!(f, "Room name is not valid percent-encoded UTF-8"),
        }
    }
}

impl std::error::Error for ProtocolError {}

/// Extract the room from a raw (still percent-encoded) request path.
///
/// Accepts either the full request path (`/ws/lobby`) or just the part
/// after the route prefix (`lobby`). A raw `?` starts the query string,
/// which is ignored; an encoded `%3F` is part of the room name.
pub fn room_from_path(path: &str) -> Result<RoomId, ProtocolError> {
    let path = path.split_once('?').map_or(path, |(p, _)| p);
    let segment = path.rsplit('/').next().unwrap_or("");
    let name = urlencoding::decode(segment).map_err(|_| ProtocolError::InvalidEncoding)?;
    RoomId::new(name.into_owned()).map_err(|_| ProtocolError::EmptyRoom)
}

/// Path a client connects to for `room`, with the name percent-encoded.
pub fn room_path(room: &RoomId) -> String {
    format!("{}{}", WS_ROUTE_PREFIX, urlencoding::encode(room.as_str()))
}

/// Wrap inbound `text` for delivery to the members of `room`.
pub fn format_broadcast(room: &RoomId, text: &str) -> String {
    format!("{}{}{}{}", BROADCAST_PREFIX, room, BROADCAST_SEPARATOR, text)
}

/// A decoded outbound frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Broadcast<'a> {
    pub room: &'a str,
    pub text: &'a str,
}

/// Split an outbound frame back into room and text.
///
/// The room ends at the first `": "`, so a room whose name contains
/// that sequence cannot be recovered unambiguously. Returns `None` for
/// anything that does not carry the broadcast prefix.
pub fn parse_broadcast(frame: &str) -> Option<Broadcast<'_>> {
    let rest = frame.strip_prefix(BROADCAST_PREFIX)?;
    let (room, text) = rest.split_once(BROADCAST_SEPARATOR)?;
    if room.is_empty() {
        return None;
    }
    Some(Broadcast { room, text })
}
