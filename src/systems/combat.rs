use crate::components::{AttackPoint, Player, PlayerId};
use crate::events::{AttackIntent, HitEvent};
use crate::resources::{MatchSettings, PendingHits, PlayerIndex};
use crate::schedule::MatchClock;
use bevy::prelude::*;

pub fn advance_match_clock(mut clock: ResMut<MatchClock>) {
    clock.tick += 1;
}

// Resolves attack presses into hits: every other player whose centre lies
// within `attack_range` of the attacker's attack point is hit.
pub fn melee_attack_system(
    settings: Res<MatchSettings>,
    index: Res<PlayerIndex>,
    mut intents: EventReader<AttackIntent>,
    player_query: Query<(&Player, &Transform, Option<&AttackPoint>)>,
    mut hit_events: EventWriter<HitEvent>,
) {
    for intent in intents.read() {
        let Some(attacker_entity) = index.get(intent.attacker) else {
            warn!("attack from unregistered {}", intent.attacker);
            continue;
        };
        let Ok((_, attacker_transform, attack_point)) = player_query.get(attacker_entity) else {
            continue;
        };

        let offset = attack_point.copied().unwrap_or_default().offset;
        let origin = attacker_transform.translation + attacker_transform.rotation * offset;

        // Sorted so simultaneous victims are reported in a stable order
        let mut victims: Vec<PlayerId> = player_query
            .iter()
            .filter(|(player, _, _)| player.id != intent.attacker)
            .filter(|(_, transform, _)| transform.translation.distance(origin) <= settings.attack_range)
            .map(|(player, _, _)| player.id)
            .collect();
        victims.sort();

        if victims.is_empty() {
            debug!("{} swung at nothing", intent.attacker);
        }

        for victim in victims {
            hit_events.send(HitEvent {
                attacker: intent.attacker,
                victim,
            });
        }
    }
}

// Hits commit after the configured delay, in the order they were reported.
pub fn queue_hits_system(
    clock: Res<MatchClock>,
    settings: Res<MatchSettings>,
    mut hit_events: EventReader<HitEvent>,
    mut pending: ResMut<PendingHits>,
) {
    let due = clock.tick.saturating_add(settings.hit_commit_delay_ticks);
    for hit in hit_events.read() {
        pending.0.schedule(due, *hit);
    }
}
