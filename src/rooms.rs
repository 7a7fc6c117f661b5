use crate::components::{PlayerId, Role};
use crate::error::ConfigError;
use bevy::prelude::*;
use rand::seq::IndexedRandom;
use rand::Rng;

pub const DEFAULT_OCCUPANCY_THRESHOLD: f32 = 0.5;

/// Fixed set of room anchors used for spawn and respawn placement.
///
/// Anchors never change after construction. The allocator only reads positions
/// and suggests anchors; moving players is the placement system's job.
#[derive(Resource, Debug, Clone)]
pub struct RoomAllocator {
    anchors: Vec<Vec3>,
    occupancy_threshold: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnPlan {
    pub player: PlayerId,
    pub position: Option<Vec3>,
}

impl RoomAllocator {
    pub fn new(anchors: Vec<Vec3>, occupancy_threshold: f32) -> Self {
        Self {
            anchors,
            occupancy_threshold,
        }
    }

    /// Rejects configurations that can never place anyone. Run once at start-up.
    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.anchors.is_empty() {
            return Err(ConfigError::NoRoomsConfigured);
        }
        if !self.occupancy_threshold.is_finite() || self.occupancy_threshold <= 0.0 {
            return Err(ConfigError::InvalidThreshold(self.occupancy_threshold));
        }
        Ok(self)
    }

    pub fn anchors(&self) -> &[Vec3] {
        &self.anchors
    }

    pub fn occupancy_threshold(&self) -> f32 {
        self.occupancy_threshold
    }

    pub fn is_occupied(&self, anchor: Vec3, excluded: &[Vec3]) -> bool {
        excluded
            .iter()
            .any(|pos| pos.distance(anchor) < self.occupancy_threshold)
    }

    /// Picks uniformly among anchors with no excluded position nearby.
    /// `None` when every room is occupied.
    pub fn get_available_room(&self, excluded: &[Vec3], rng: &mut impl Rng) -> Option<Vec3> {
        let free: Vec<Vec3> = self
            .anchors
            .iter()
            .copied()
            .filter(|anchor| !self.is_occupied(*anchor, excluded))
            .collect();
        free.choose(rng).copied()
    }

    pub fn get_random_room(&self, rng: &mut impl Rng) -> Option<Vec3> {
        self.anchors.choose(rng).copied()
    }

    /// Places players in order. Seekers avoid every room already handed out,
    /// hiders may land anywhere.
    pub fn plan_initial_spawns(
        &self,
        players: &[(PlayerId, Role)],
        rng: &mut impl Rng,
    ) -> Vec<SpawnPlan> {
        let mut occupied = Vec::with_capacity(players.len());
        let mut plans = Vec::with_capacity(players.len());

        for (player, role) in players {
            let position = match role {
                Role::Seeker => self.get_available_room(&occupied, rng),
                Role::Hider => self.get_random_room(rng),
            };
            if let Some(pos) = position {
                occupied.push(pos);
            }
            plans.push(SpawnPlan {
                player: *player,
                position,
            });
        }

        plans
    }
}
