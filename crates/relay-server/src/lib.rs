//! relay-server
//!
//! WebSocket front end for the room relay: accepts connections tagged
//! with a room, relays their text to the room, and cleans up on
//! disconnect.

pub mod config;
pub mod types;
pub mod server;

// these are internal modules, not re-exported
mod client;
mod demo_page;
