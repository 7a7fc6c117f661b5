// components.rs
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable handle for a player, assigned once at spawn and never reused during a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Role {
    #[default]
    Hider,
    Seeker,
}

impl Role {
    pub fn toggled(self) -> Self {
        match self {
            Role::Hider => Role::Seeker,
            Role::Seeker => Role::Hider,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Hider => f.write_str("Hider"),
            Role::Seeker => f.write_str("Seeker"),
        }
    }
}

#[derive(Component, Debug, Clone)]
pub struct Player {
    pub id: PlayerId,
    // Mirror of the committed role in `RoleState`, kept in sync once per update.
    pub role: Role,
    pub name: String,
}

/// Origin of the player's melee swing, relative to its transform.
#[derive(Component, Debug, Clone, Copy)]
pub struct AttackPoint {
    pub offset: Vec3,
}

impl Default for AttackPoint {
    fn default() -> Self {
        Self {
            offset: Vec3::new(0.0, 0.0, 0.6),
        }
    }
}
