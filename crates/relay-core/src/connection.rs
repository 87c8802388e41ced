//! Connection handles as seen by the registry.
//!
//! The transport owns the socket; the registry only ever holds the send
//! side of a bounded queue that the transport's writer task drains.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc;

/// Identifier for a connected client.
///
/// This is intentionally opaque; the transport guarantees uniqueness
/// over the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(pub u64);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Outbound frames queued for one client.
pub type OutboundTx = mpsc::Sender<Arc<str>>;
pub type OutboundRx = mpsc::Receiver<Arc<str>>;

/// Why a single delivery did not reach a connection's queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DeliveryError {
    /// The client is not draining its queue fast enough.
    #[error("outbound queue is full")]
    Full,

    /// The writer side has gone away.
    #[error("connection is closed")]
    Closed,
}

/// Send-capable handle for one client's session.
#[derive(Debug, Clone)]
pub struct Connection {
    id: ConnectionId,
    tx: OutboundTx,
}

impl Connection {
    pub fn new(id: ConnectionId, tx: OutboundTx) -> Self {
        Connection { id, tx }
    }

    /// Create a handle together with the queue it feeds.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn channel(id: ConnectionId, capacity: usize) -> (Self, OutboundRx) {
        let (tx, rx) = mpsc::channel(capacity);
        (Connection::new(id, tx), rx)
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Enqueue one frame without waiting.
    pub fn send(&self, frame: Arc<str>) -> Result<(), DeliveryError> {
        self.tx.try_send(frame).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => DeliveryError::Full,
            mpsc::error::TrySendError::Closed(_) => DeliveryError::Closed,
        })
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}
