use std::fmt;

use crate::error::RegistryError;

/// Name of a broadcast group.
///
/// Opaque and case-sensitive; the only validation is that it is
/// non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomId(String);

impl RoomId {
    pub fn new(name: impl Into<String>) -> Result<Self, RegistryError> {
        let name = name.into();
        if name.is_empty() {
            return Err(RegistryError::EmptyRoom);
        }
        Ok(RoomId(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RoomId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for RoomId {
    type Error = RegistryError;

    fn try_from(name: &str) -> Result<Self, Self::Error> {
        RoomId::new(name)
    }
}
