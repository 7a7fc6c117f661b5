use crate::components::{PlayerId, Role};
use bevy::prelude::*;

// Reported by whatever detects a connected attack (melee system or an external detector)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitEvent {
    pub attacker: PlayerId,
    pub victim: PlayerId,
}

// Attack button pressed; resolved into hits by an overlap query around the attack point
#[derive(Event, Debug, Clone, Copy)]
pub struct AttackIntent {
    pub attacker: PlayerId,
}

// A player's committed role changed; fire-and-forget for presentation
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleChanged {
    pub player: PlayerId,
    pub role: Role,
}

// Player became a seeker and should be moved away from the hiders
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct PlacePlayer {
    pub player: PlayerId,
    pub position: Vec3,
}

// Player disconnected or the match is tearing down
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerLeft {
    pub player: PlayerId,
}
