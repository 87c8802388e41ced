//! Shared types for the relay server.
//!
//! This module defines:
//! - `RelayState`: what every route handler needs
//! - `RoomStats`: one entry of the room listing

use std::sync::Arc;

use relay_core::Registry;
use serde::Serialize;

use crate::config::Config;

/// Application state shared across routes and connection tasks.
#[derive(Debug, Clone)]
pub struct RelayState {
    pub registry: Registry,
    pub config: Arc<Config>,
}

impl RelayState {
    pub fn new(config: Config) -> Self {
        RelayState {
            registry: Registry::new(),
            config: Arc::new(config),
        }
    }
}

/// Room name and current member count, as served by `/api/rooms`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomStats {
    pub room: String,
    pub members: usize,
}
