//! relay-protocol
//!
//! Wire-level contract for the room relay.
//!
//! This crate is responsible for turning connection paths into
//! `relay_core::RoomId`s and inbound text into the framed broadcast
//! that room members receive, and back again for clients.
//!
//! - [`text_codec`] : room addressing and broadcast framing

pub mod text_codec;

pub use text_codec::{
    ProtocolError,
    Broadcast,
    format_broadcast,
    parse_broadcast,
    room_from_path,
    room_path,
    WS_ROUTE_PREFIX,
};
