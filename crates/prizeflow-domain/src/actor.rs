//! Administrative actor roles.

use serde::{Deserialize, Serialize};

/// Permission level of the back-office actor calling an admin route.
///
/// Wire format: `u8` (0 = Viewer, 1 = Admin), injected by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorRole {
    Viewer = 0,
    Admin = 1,
}

impl ActorRole {
    /// Convert from `u8` wire value. Returns `None` for unknown values.
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::Viewer),
            1 => Some(Self::Admin),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Whether this role may create, cancel or re-notify awards.
    pub fn can_manage_awards(self) -> bool {
        matches!(self, Self::Admin)
    }
}
