//! Role and room core for a hide-and-seek party game.
//!
//! Every player is either a hider or a seeker. A melee hit resolves roles
//! through [`RoleState`], and a player who becomes a seeker is moved to a room
//! with no hider in it, chosen by [`RoomAllocator`].
//!
//! [`HideSeekPlugin`] runs the whole flow once per `Update`, in this order:
//!
//! - advance the match clock
//! - turn [`AttackIntent`]s into [`HitEvent`]s with an overlap check
//! - queue hits until their commit tick
//! - apply due hits in arrival order, emitting [`RoleChanged`] and [`PlacePlayer`]
//! - mirror roles onto [`Player`] components and move respawned seekers
//!
//! Rendering, movement and input are left to the host app.

pub mod components;
pub mod error;
pub mod events;
pub mod resources;
pub mod roles;
pub mod rooms;
pub mod schedule;
pub mod systems;

pub use components::{AttackPoint, Player, PlayerId, Role};
pub use error::{ConfigError, RoleError};
pub use events::{AttackIntent, HitEvent, PlacePlayer, PlayerLeft, RoleChanged};
pub use resources::{MatchRng, MatchSettings, PendingHits, PlayerIdAllocator, PlayerIndex};
pub use roles::{HitResult, HitRule, RoleState};
pub use rooms::{RoomAllocator, SpawnPlan};
pub use schedule::{DelayQueue, MatchClock};

use bevy::prelude::*;
use systems::combat::*;
use systems::player::*;

/// System sets of the match update, chained in this order.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchSet {
    /// Hit detection. Systems that report hits or attack intents run before this.
    Detect,
    Resolve,
    Present,
}

/// Installs the match resources, events and systems.
pub struct HideSeekPlugin {
    settings: MatchSettings,
    rooms: RoomAllocator,
}

impl HideSeekPlugin {
    /// Validates the settings up front so a broken configuration never reaches the app.
    pub fn new(settings: MatchSettings) -> Result<Self, ConfigError> {
        let rooms = settings.room_allocator()?;
        Ok(Self { settings, rooms })
    }
}

impl Plugin for HideSeekPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<AttackIntent>()
            .add_event::<HitEvent>()
            .add_event::<RoleChanged>()
            .add_event::<PlacePlayer>()
            .add_event::<PlayerLeft>()
            .insert_resource(self.settings.clone())
            .insert_resource(self.rooms.clone())
            .insert_resource(RoleState::new(self.settings.hit_rule))
            .insert_resource(MatchRng::new(self.settings.seed))
            .init_resource::<MatchClock>()
            .init_resource::<PendingHits>()
            .init_resource::<PlayerIdAllocator>()
            .init_resource::<PlayerIndex>()
            .configure_sets(
                Update,
                (MatchSet::Detect, MatchSet::Resolve, MatchSet::Present).chain(),
            )
            .add_systems(Startup, spawn_match_players)
            .add_systems(
                Update,
                (
                    (advance_match_clock, melee_attack_system, queue_hits_system)
                        .chain()
                        .in_set(MatchSet::Detect),
                    (handle_player_left, resolve_hits_system)
                        .chain()
                        .in_set(MatchSet::Resolve),
                    (sync_role_components, apply_placements_system).in_set(MatchSet::Present),
                ),
            );
    }
}
