//! Room registry and broadcast dispatcher.
//!
//! - Maintains one join-ordered member list per room.
//! - Creates rooms on first join and drops them on last leave.
//! - Tracks `ConnectionId -> RoomId` so a connection can only be in one
//!   room at a time.
//! - Fans text out to a room by enqueueing into each member's outbound
//!   queue. Delivery never blocks and one failing member never affects
//!   the others.
//!
//! All state sits behind a single mutex. Every operation is a short,
//! synchronous map update, so the lock is never held across an await
//! point or an I/O call.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::connection::{Connection, ConnectionId, DeliveryError};
use crate::error::RegistryError;
use crate::room::RoomId;

#[derive(Debug, Default)]
struct Rooms {
    /// Room -> members in join order. Never holds an empty entry.
    rooms: HashMap<RoomId, IndexMap<ConnectionId, Connection>>,

    /// Reverse index used to enforce single-room membership, tagged with
    /// the generation of the join that created it.
    membership: HashMap<ConnectionId, (RoomId, u64)>,

    next_generation: u64,
}

/// Outcome of one [`Registry::broadcast`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Members whose queue accepted the frame.
    pub delivered: usize,

    /// Members that could not be reached, in join order.
    pub failed: Vec<(ConnectionId, DeliveryError)>,
}

impl BroadcastReport {
    pub fn recipients(&self) -> usize {
        self.delivered + self.failed.len()
    }
}

/// Shared handle to the room registry.
///
/// Cloning is cheap; all clones see the same rooms.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    inner: Arc<Mutex<Rooms>>,
}

impl Registry {
    pub fn new() -> Self {
        Registry::default()
    }

    // Mutations finish before anything can panic, so a poisoned lock
    // still guards consistent state.
    fn lock(&self) -> MutexGuard<'_, Rooms> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add `connection` to `room`, creating the room if needed.
    ///
    /// Fails with [`RegistryError::AlreadyJoined`] if the connection is
    /// already a member of any room; the registry is left untouched.
    pub fn join(&self, connection: Connection, room: RoomId) -> Result<(), RegistryError> {
        self.insert(connection, room).map(|_| ())
    }

    fn insert(&self, connection: Connection, room: RoomId) -> Result<u64, RegistryError> {
        let mut state = self.lock();
        let id = connection.id();

        if let Some((current, _)) = state.membership.get(&id) {
            return Err(RegistryError::AlreadyJoined {
                connection: id,
                room: current.clone(),
            });
        }

        let generation = state.next_generation;
        state.next_generation += 1;
        state.membership.insert(id, (room.clone(), generation));
        let members = state.rooms.entry(room.clone()).or_default();
        members.insert(id, connection);
        debug!(connection = %id, room = %room, members = members.len(), "joined room");
        Ok(generation)
    }

    /// Remove `connection` from `room`, dropping the room once empty.
    ///
    /// Returns `false` without touching anything when the connection is
    /// not a member of `room`, so it is safe to call more than once.
    pub fn leave(&self, connection: ConnectionId, room: &RoomId) -> bool {
        self.remove(connection, room, None)
    }

    /// Leave only if the membership still matches `generation` (when given).
    fn remove(&self, connection: ConnectionId, room: &RoomId, generation: Option<u64>) -> bool {
        let mut state = self.lock();

        match state.membership.get(&connection) {
            Some((current, current_gen))
                if current == room && generation.map_or(true, |g| g == *current_gen) => {}
            _ => return false,
        }
        state.membership.remove(&connection);

        let now_empty = match state.rooms.get_mut(room) {
            Some(members) => {
                members.shift_remove(&connection);
                members.is_empty()
            }
            None => false,
        };
        if now_empty {
            state.rooms.remove(room);
            debug!(connection = %connection, room = %room, "left room, room closed");
        } else {
            debug!(connection = %connection, room = %room, "left room");
        }
        true
    }

    /// Join `room` and return a guard that leaves it when dropped.
    ///
    /// The guard only ever undoes its own join: if the connection has
    /// since left and joined again, dropping it is a no-op.
    pub fn enter(&self, connection: Connection, room: RoomId) -> Result<Membership, RegistryError> {
        let id = connection.id();
        let generation = self.insert(connection, room.clone())?;
        Ok(Membership {
            registry: self.clone(),
            connection: id,
            room,
            generation,
            active: true,
        })
    }

    /// Deliver `message` to every member of `room` in join order.
    ///
    /// Members are snapshotted first and the lock is released before any
    /// delivery, so a member joining mid-broadcast may miss the message.
    /// A missing room is not an error; the report is simply empty.
    pub fn broadcast(&self, room: &RoomId, message: &str) -> BroadcastReport {
        let members: Vec<Connection> = {
            let state = self.lock();
            match state.rooms.get(room) {
                Some(members) => members.values().cloned().collect(),
                None => return BroadcastReport::default(),
            }
        };

        let frame: Arc<str> = Arc::from(message);
        let mut report = BroadcastReport::default();
        for member in &members {
            match member.send(Arc::clone(&frame)) {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    warn!(connection = %member.id(), room = %room, error = %e, "failed to deliver broadcast");
                    report.failed.push((member.id(), e));
                }
            }
        }

        debug!(
            room = %room,
            delivered = report.delivered,
            failed = report.failed.len(),
            "broadcast to room"
        );
        report
    }

    /// Room the connection currently belongs to, if any.
    pub fn room_of(&self, connection: ConnectionId) -> Option<RoomId> {
        self.lock().membership.get(&connection).map(|(room, _)| room.clone())
    }

    pub fn contains_room(&self, room: &RoomId) -> bool {
        self.lock().rooms.contains_key(room)
    }

    pub fn member_count(&self, room: &RoomId) -> usize {
        self.lock().rooms.get(room).map_or(0, IndexMap::len)
    }

    /// Members of `room` in join order.
    pub fn members(&self, room: &RoomId) -> Vec<ConnectionId> {
        self.lock()
            .rooms
            .get(room)
            .map(|members| members.keys().copied().collect())
            .unwrap_or_default()
    }

    pub fn room_count(&self) -> usize {
        self.lock().rooms.len()
    }

    pub fn connection_count(&self) -> usize {
        self.lock().membership.len()
    }

    /// Snapshot of `(room, member count)`, sorted by room name.
    pub fn rooms(&self) -> Vec<(RoomId, usize)> {
        let mut rooms: Vec<(RoomId, usize)> = self
            .lock()
            .rooms
            .iter()
            .map(|(room, members)| (room.clone(), members.len()))
            .collect();
        rooms.sort();
        rooms
    }
}

/// Scoped membership of one connection in one room.
///
/// Leaves the room when dropped, which covers normal exit, errors,
/// panics and task cancellation alike.
#[derive(Debug)]
pub struct Membership {
    registry: Registry,
    connection: ConnectionId,
    room: RoomId,
    generation: u64,
    active: bool,
}

impl Membership {
    pub fn connection(&self) -> ConnectionId {
        self.connection
    }

    pub fn room(&self) -> &RoomId {
        &self.room
    }

    /// Leave now instead of at drop. Returns whether a leave happened.
    pub fn leave(mut self) -> bool {
        self.release()
    }

    fn release(&mut self) -> bool {
        if !self.active {
            return false;
        }
        self.active = false;
        self.registry.remove(self.connection, &self.room, Some(self.generation))
    }
}

impl Drop for Membership {
    fn drop(&mut self) {
        self.release();
    }
}
