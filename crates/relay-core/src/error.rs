//! Error types for the room registry.
//!
//! The registry performs no I/O, so the only failures are a bad room
//! name and a rejected double join. Delivery failures are per-connection
//! and live in [`crate::connection::DeliveryError`].

use thiserror::Error;

use crate::connection::ConnectionId;
use crate::room::RoomId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Room identifiers must be non-empty.
    #[error("room name must not be empty")]
    EmptyRoom,

    /// The connection is already a member of a room.
    ///
    /// A connection belongs to at most one room per lifecycle, so a
    /// second join is refused whether or not it names the same room.
    #[error("connection {connection} already joined room {room}")]
    AlreadyJoined {
        connection: ConnectionId,
        room: RoomId,
    },
}
