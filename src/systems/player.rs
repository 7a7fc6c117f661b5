use crate::components::{AttackPoint, Player, PlayerId, Role};
use crate::error::RoleError;
use crate::events::{PlacePlayer, PlayerLeft, RoleChanged};
use crate::resources::{MatchRng, MatchSettings, PendingHits, PlayerIdAllocator, PlayerIndex};
use crate::roles::RoleState;
use crate::rooms::RoomAllocator;
use crate::schedule::MatchClock;
use bevy::prelude::*;
use std::collections::HashMap;

// Spawns every configured player and spreads them over the rooms
pub fn spawn_match_players(
    mut commands: Commands,
    settings: Res<MatchSettings>,
    rooms: Res<RoomAllocator>,
    mut rng: ResMut<MatchRng>,
    mut ids: ResMut<PlayerIdAllocator>,
    mut roles: ResMut<RoleState>,
    mut index: ResMut<PlayerIndex>,
) {
    let players: Vec<(PlayerId, Role)> = settings
        .players
        .iter()
        .map(|role| (ids.allocate(), *role))
        .collect();

    info!(
        "starting match: {} players, {} rooms, occupancy threshold {}",
        players.len(),
        rooms.anchors().len(),
        rooms.occupancy_threshold()
    );

    // Plans come back in the order the players were given
    let plans = rooms.plan_initial_spawns(&players, &mut rng.0);
    for ((_, role), plan) in players.iter().copied().zip(plans) {
        let position = plan.position.unwrap_or_else(|| {
            warn!("no available room for {}, spawning at origin", plan.player);
            Vec3::ZERO
        });

        if let Err(err) = roles.register(plan.player, role) {
            error!("{err}");
            continue;
        }

        let entity = commands
            .spawn((
                Transform::from_translation(position),
                Player {
                    id: plan.player,
                    role,
                    name: format!("Player {}", plan.player.0 + 1),
                },
                AttackPoint::default(),
            ))
            .id();
        index.insert(plan.player, entity);

        info!("{} spawned as {} at {}", plan.player, role, position);
    }
}

// Applies every hit that is due this tick, one at a time in arrival order
#[allow(clippy::too_many_arguments)]
pub fn resolve_hits_system(
    clock: Res<MatchClock>,
    rooms: Res<RoomAllocator>,
    index: Res<PlayerIndex>,
    mut pending: ResMut<PendingHits>,
    mut roles: ResMut<RoleState>,
    mut rng: ResMut<MatchRng>,
    transform_query: Query<&Transform, With<Player>>,
    mut role_events: EventWriter<RoleChanged>,
    mut place_events: EventWriter<PlacePlayer>,
) {
    // Placements decided earlier this tick; transforms only catch up in `MatchSet::Present`
    let mut placed: HashMap<PlayerId, Vec3> = HashMap::new();

    for hit in pending.0.drain_due(clock.tick) {
        if index.has_left(hit.attacker) || index.has_left(hit.victim) {
            debug!(
                "dropping hit {} -> {} against a departed player",
                hit.attacker, hit.victim
            );
            continue;
        }

        let attacker_old = roles.get_role(hit.attacker);
        let victim_old = roles.get_role(hit.victim);

        let result = match roles.apply_hit(hit.attacker, hit.victim) {
            Ok(result) => result,
            Err(RoleError::InvalidHit(player)) => {
                debug!("dropping self-hit from {player}");
                continue;
            }
            Err(err) => {
                error!("dropping hit {} -> {}: {err}", hit.attacker, hit.victim);
                if cfg!(debug_assertions) {
                    panic!("hit referenced an unregistered player: {err}");
                }
                continue;
            }
        };

        if attacker_old != Some(result.attacker_new_role) {
            role_events.send(RoleChanged {
                player: hit.attacker,
                role: result.attacker_new_role,
            });
        }
        if victim_old != Some(result.victim_new_role) {
            role_events.send(RoleChanged {
                player: hit.victim,
                role: result.victim_new_role,
            });
        }

        info!(
            "{} hit {}: now {} / {}",
            hit.attacker, hit.victim, result.attacker_new_role, result.victim_new_role
        );

        let Some(seeker) = result.new_seeker else {
            continue;
        };

        // Seekers may not reappear in a room where a hider is standing
        let hider_positions: Vec<Vec3> = roles
            .hiders()
            .filter(|id| *id != seeker)
            .filter_map(|id| {
                placed.get(&id).copied().or_else(|| {
                    let entity = index.get(id)?;
                    transform_query.get(entity).ok().map(|t| t.translation)
                })
            })
            .collect();

        match rooms.get_available_room(&hider_positions, &mut rng.0) {
            Some(position) => {
                placed.insert(seeker, position);
                place_events.send(PlacePlayer {
                    player: seeker,
                    position,
                });
            }
            None => warn!("no safe room available for {seeker} to respawn as seeker"),
        }
    }
}

// Mirrors committed roles onto the player components
pub fn sync_role_components(
    index: Res<PlayerIndex>,
    mut role_events: EventReader<RoleChanged>,
    mut player_query: Query<&mut Player>,
) {
    for event in role_events.read() {
        let Some(entity) = index.get(event.player) else {
            continue;
        };
        if let Ok(mut player) = player_query.get_mut(entity) {
            player.role = event.role;
        }
    }
}

pub fn apply_placements_system(
    index: Res<PlayerIndex>,
    mut place_events: EventReader<PlacePlayer>,
    mut transform_query: Query<&mut Transform, With<Player>>,
) {
    for event in place_events.read() {
        let Some(entity) = index.get(event.player) else {
            warn!("cannot place unknown {}", event.player);
            continue;
        };
        if let Ok(mut transform) = transform_query.get_mut(entity) {
            transform.translation = event.position;
            info!("{} respawned at {}", event.player, event.position);
        }
    }
}

// Drops departed players from the role table, the index and the world.
// Hits still queued against them are discarded.
pub fn handle_player_left(
    mut commands: Commands,
    mut left_events: EventReader<PlayerLeft>,
    mut roles: ResMut<RoleState>,
    mut index: ResMut<PlayerIndex>,
    mut pending: ResMut<PendingHits>,
) {
    for event in left_events.read() {
        let id = event.player;
        if roles.remove(id).is_none() {
            continue;
        }
        pending
            .0
            .retain(|hit| hit.attacker != id && hit.victim != id);
        if let Some(entity) = index.remove(id) {
            commands.entity(entity).despawn();
        }
        info!("{id} left the match");
    }
}
