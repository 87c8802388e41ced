//! relay-core
//!
//! Pure room relay logic:
//! - room identifiers
//! - connection handles and their outbound queues
//! - the room registry and broadcast dispatcher

pub mod connection;
pub mod error;
pub mod registry;
pub mod room;

pub use connection::{Connection, ConnectionId, DeliveryError, OutboundRx, OutboundTx};
pub use error::RegistryError;
pub use registry::{BroadcastReport, Membership, Registry};
pub use room::RoomId;
