// resources.rs
use crate::components::{PlayerId, Role};
use crate::error::ConfigError;
use crate::events::HitEvent;
use crate::roles::HitRule;
use crate::rooms::{RoomAllocator, DEFAULT_OCCUPANCY_THRESHOLD};
use crate::schedule::DelayQueue;
use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Match configuration, loaded once before the match starts.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchSettings {
    /// Room anchors in world space, in configuration order.
    pub rooms: Vec<[f32; 3]>,
    pub occupancy_threshold: f32,
    /// Radius of the melee overlap check around the attack point.
    pub attack_range: f32,
    pub hit_rule: HitRule,
    /// Ticks between a hit landing and the role change committing. Zero commits on the same tick.
    pub hit_commit_delay_ticks: u64,
    /// Starting role of each player, in spawn order.
    pub players: Vec<Role>,
    pub seed: Option<u64>,
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            rooms: vec![
                [0.0, 0.0, 0.0],
                [10.0, 0.0, 0.0],
                [0.0, 0.0, 10.0],
                [10.0, 0.0, 10.0],
            ],
            occupancy_threshold: DEFAULT_OCCUPANCY_THRESHOLD,
            attack_range: 1.0,
            hit_rule: HitRule::Swap,
            hit_commit_delay_ticks: 0,
            players: vec![Role::Seeker, Role::Hider, Role::Hider, Role::Hider],
            seed: None,
        }
    }
}

impl MatchSettings {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Builds the validated room allocator, failing on configurations that cannot host a match.
    pub fn room_allocator(&self) -> Result<RoomAllocator, ConfigError> {
        if self.players.is_empty() {
            return Err(ConfigError::NoPlayers);
        }
        let anchors = self.rooms.iter().copied().map(Vec3::from_array).collect();
        RoomAllocator::new(anchors, self.occupancy_threshold).validate()
    }
}

/// Injectable random source for room picks. Seeded runs are reproducible.
#[derive(Resource, Debug, Clone)]
pub struct MatchRng(pub StdRng);

impl MatchRng {
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self(StdRng::seed_from_u64(seed)),
            None => Self(StdRng::from_os_rng()),
        }
    }
}

/// Hits waiting for their commit tick.
#[derive(Resource, Debug, Default)]
pub struct PendingHits(pub DelayQueue<HitEvent>);

/// Hands out player ids. Ids are never reused within a match.
#[derive(Resource, Debug, Default)]
pub struct PlayerIdAllocator {
    next: u32,
}

impl PlayerIdAllocator {
    pub fn allocate(&mut self) -> PlayerId {
        let id = PlayerId(self.next);
        self.next += 1;
        id
    }
}

/// Maps player ids to their entities, and remembers who has left.
#[derive(Resource, Debug, Default)]
pub struct PlayerIndex {
    entities: HashMap<PlayerId, Entity>,
    departed: HashSet<PlayerId>,
}

impl PlayerIndex {
    pub fn insert(&mut self, id: PlayerId, entity: Entity) {
        self.entities.insert(id, entity);
    }

    /// Forgets the entity and marks the id as departed. Ids are never reused.
    pub fn remove(&mut self, id: PlayerId) -> Option<Entity> {
        self.departed.insert(id);
        self.entities.remove(&id)
    }

    pub fn has_left(&self, id: PlayerId) -> bool {
        self.departed.contains(&id)
    }

    pub fn get(&self, id: PlayerId) -> Option<Entity> {
        self.entities.get(&id).copied()
    }
}
