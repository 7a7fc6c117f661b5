use bevy::prelude::*;
use hideseek::{
    AttackIntent, HideSeekPlugin, HitEvent, HitRule, MatchSettings, PlacePlayer, Player, PlayerId,
    PlayerIndex, PlayerLeft, Role, RoleChanged, RoleState,
};

const A: PlayerId = PlayerId(0);
const B: PlayerId = PlayerId(1);
const C: PlayerId = PlayerId(2);

fn settings(rooms: &[[f32; 3]], players: &[Role]) -> MatchSettings {
    MatchSettings {
        rooms: rooms.to_vec(),
        players: players.to_vec(),
        seed: Some(17),
        ..default()
    }
}

// Builds the app and runs the first update, which spawns the players
fn start(settings: MatchSettings) -> App {
    let mut app = App::new();
    app.add_plugins(HideSeekPlugin::new(settings).unwrap());
    app.update();
    app
}

fn role(app: &App, id: PlayerId) -> Option<Role> {
    app.world().resource::<RoleState>().get_role(id)
}

fn players(app: &mut App) -> Vec<(Player, Vec3)> {
    let mut query = app.world_mut().query::<(&Player, &Transform)>();
    let mut players: Vec<(Player, Vec3)> = query
        .iter(app.world())
        .map(|(player, transform)| (player.clone(), transform.translation))
        .collect();
    players.sort_by_key(|(player, _)| player.id);
    players
}

fn role_changes(app: &App) -> Vec<RoleChanged> {
    let events = app.world().resource::<Events<RoleChanged>>();
    let mut cursor = events.get_cursor();
    cursor.read(events).copied().collect()
}

#[test]
fn players_spawn_on_room_anchors() {
    let rooms = [[0.0, 0.0, 0.0], [10.0, 0.0, 0.0], [0.0, 0.0, 10.0]];
    let mut app = start(settings(&rooms, &[Role::Seeker, Role::Hider, Role::Hider]));

    let spawned = players(&mut app);
    assert_eq!(spawned.len(), 3);
    for (player, position) in &spawned {
        assert!(rooms.contains(&position.to_array()));
        assert_eq!(role(&app, player.id), Some(player.role));
    }
    assert_eq!(app.world().resource::<RoleState>().seeker_count(), 1);
}

#[test]
fn hider_hitting_seeker_swaps_and_respawns_the_new_seeker() {
    let rooms = [[0.0, 0.0, 0.0], [10.0, 0.0, 0.0], [20.0, 0.0, 0.0]];
    let mut app = start(settings(&rooms, &[Role::Hider, Role::Seeker, Role::Hider]));

    app.world_mut().send_event(HitEvent {
        attacker: A,
        victim: B,
    });
    app.update();

    assert_eq!(role(&app, A), Some(Role::Seeker));
    assert_eq!(role(&app, B), Some(Role::Hider));
    assert_eq!(role(&app, C), Some(Role::Hider));

    let changes = role_changes(&app);
    assert!(changes.contains(&RoleChanged {
        player: A,
        role: Role::Seeker
    }));
    assert!(changes.contains(&RoleChanged {
        player: B,
        role: Role::Hider
    }));

    let spawned = players(&mut app);
    let (seeker, seeker_pos) = &spawned[0];
    assert_eq!(seeker.role, Role::Seeker);
    assert!(rooms.contains(&seeker_pos.to_array()));
    for (other, pos) in &spawned[1..] {
        assert_eq!(other.role, Role::Hider);
        assert!(seeker_pos.distance(*pos) >= 0.5);
    }
}

#[test]
fn self_hit_changes_nothing() {
    let mut app = start(settings(
        &[[0.0, 0.0, 0.0], [10.0, 0.0, 0.0]],
        &[Role::Hider, Role::Seeker],
    ));

    app.world_mut().send_event(HitEvent {
        attacker: A,
        victim: A,
    });
    app.update();

    assert_eq!(role(&app, A), Some(Role::Hider));
    assert_eq!(role(&app, B), Some(Role::Seeker));
    assert!(role_changes(&app).is_empty());
}

#[test]
fn same_tick_hits_apply_in_arrival_order() {
    let rooms = [[0.0, 0.0, 0.0], [10.0, 0.0, 0.0], [20.0, 0.0, 0.0]];
    let mut app = start(settings(&rooms, &[Role::Hider, Role::Seeker, Role::Hider]));

    app.world_mut().send_event(HitEvent {
        attacker: A,
        victim: B,
    });
    app.world_mut().send_event(HitEvent {
        attacker: B,
        victim: C,
    });
    app.update();

    // B is already a hider when its own hit on C lands
    assert_eq!(role(&app, A), Some(Role::Seeker));
    assert_eq!(role(&app, B), Some(Role::Hider));
    assert_eq!(role(&app, C), Some(Role::Hider));
}

#[test]
fn delayed_hits_commit_on_their_tick() {
    let mut app = start(MatchSettings {
        hit_commit_delay_ticks: 3,
        ..settings(&[[0.0, 0.0, 0.0], [10.0, 0.0, 0.0]], &[Role::Hider, Role::Seeker])
    });

    app.world_mut().send_event(HitEvent {
        attacker: A,
        victim: B,
    });
    for _ in 0..3 {
        app.update();
        assert_eq!(role(&app, A), Some(Role::Hider));
    }
    app.update();
    assert_eq!(role(&app, A), Some(Role::Seeker));
    assert_eq!(role(&app, B), Some(Role::Hider));
}

#[test]
fn melee_hits_players_in_range_but_not_the_attacker() {
    // One room: the seeker takes it, the hider lands there too
    let mut app = start(settings(&[[0.0, 0.0, 0.0]], &[Role::Seeker, Role::Hider]));

    app.world_mut().send_event(AttackIntent { attacker: A });
    app.update();

    let hits = app.world().resource::<Events<HitEvent>>();
    let mut cursor = hits.get_cursor();
    let hits: Vec<HitEvent> = cursor.read(hits).copied().collect();
    assert_eq!(
        hits,
        vec![HitEvent {
            attacker: A,
            victim: B
        }]
    );
    assert_eq!(role(&app, A), Some(Role::Hider));
    assert_eq!(role(&app, B), Some(Role::Seeker));
}

#[test]
fn melee_misses_players_out_of_range() {
    let mut app = start(settings(
        &[[0.0, 0.0, 0.0], [10.0, 0.0, 0.0]],
        &[Role::Seeker, Role::Seeker],
    ));

    app.world_mut().send_event(AttackIntent { attacker: A });
    app.update();

    let hits = app.world().resource::<Events<HitEvent>>();
    assert!(hits.is_empty());
}

#[test]
fn flip_rule_only_changes_the_victim() {
    let mut app = start(MatchSettings {
        hit_rule: HitRule::Flip,
        ..settings(&[[0.0, 0.0, 0.0], [10.0, 0.0, 0.0]], &[Role::Seeker, Role::Hider])
    });

    app.world_mut().send_event(HitEvent {
        attacker: A,
        victim: B,
    });
    app.update();

    assert_eq!(role(&app, A), Some(Role::Seeker));
    assert_eq!(role(&app, B), Some(Role::Seeker));
}

#[test]
fn leaving_players_are_removed_with_their_pending_hits() {
    let mut app = start(MatchSettings {
        hit_commit_delay_ticks: 2,
        ..settings(&[[0.0, 0.0, 0.0], [10.0, 0.0, 0.0]], &[Role::Hider, Role::Seeker])
    });

    app.world_mut().send_event(HitEvent {
        attacker: A,
        victim: B,
    });
    app.update();
    app.world_mut().send_event(PlayerLeft { player: B });
    for _ in 0..3 {
        app.update();
    }

    assert_eq!(role(&app, B), None);
    assert_eq!(role(&app, A), Some(Role::Hider));
    assert!(app.world().resource::<PlayerIndex>().get(B).is_none());
    assert_eq!(players(&mut app).len(), 1);
}

#[test]
fn same_tick_respawns_avoid_rooms_taken_earlier_in_the_tick() {
    let rooms = [
        [0.0, 0.0, 0.0],
        [10.0, 0.0, 0.0],
        [20.0, 0.0, 0.0],
        [30.0, 0.0, 0.0],
    ];
    for seed in 0..64 {
        let mut app = start(MatchSettings {
            seed: Some(seed),
            ..settings(&rooms, &[Role::Hider, Role::Seeker, Role::Hider])
        });

        // A becomes a seeker and is moved, then C tags A back to hider in the same tick
        app.world_mut().send_event(HitEvent {
            attacker: A,
            victim: B,
        });
        app.world_mut().send_event(HitEvent {
            attacker: C,
            victim: A,
        });
        app.update();

        assert_eq!(role(&app, A), Some(Role::Hider));
        assert_eq!(role(&app, B), Some(Role::Hider));
        assert_eq!(role(&app, C), Some(Role::Seeker));

        let spawned = players(&mut app);
        let seeker_pos = spawned[2].1;
        for (hider, pos) in &spawned[..2] {
            assert!(
                seeker_pos.distance(*pos) >= 0.5,
                "seed {seed}: {} shares a room with {} at {pos}",
                C,
                hider.id
            );
        }
    }
}

#[test]
fn huge_commit_delay_never_commits() {
    let mut app = start(MatchSettings {
        hit_commit_delay_ticks: u64::MAX,
        ..settings(&[[0.0, 0.0, 0.0], [10.0, 0.0, 0.0]], &[Role::Hider, Role::Seeker])
    });

    app.world_mut().send_event(HitEvent {
        attacker: A,
        victim: B,
    });
    for _ in 0..3 {
        app.update();
    }

    assert_eq!(role(&app, A), Some(Role::Hider));
    assert_eq!(role(&app, B), Some(Role::Seeker));
}

#[cfg(debug_assertions)]
#[test]
#[should_panic]
fn hit_on_unregistered_player_is_fatal_in_debug_builds() {
    let mut app = start(settings(
        &[[0.0, 0.0, 0.0], [10.0, 0.0, 0.0]],
        &[Role::Hider, Role::Seeker],
    ));

    app.world_mut().send_event(HitEvent {
        attacker: A,
        victim: PlayerId(99),
    });
    app.update();
}

#[test]
fn hits_reported_after_a_player_left_are_dropped() {
    let mut app = start(settings(
        &[[0.0, 0.0, 0.0], [10.0, 0.0, 0.0], [20.0, 0.0, 0.0]],
        &[Role::Hider, Role::Seeker, Role::Hider],
    ));

    app.world_mut().send_event(PlayerLeft { player: B });
    app.update();

    // Late report from the detector, a tick after B is gone
    app.world_mut().send_event(HitEvent {
        attacker: A,
        victim: B,
    });
    app.world_mut().send_event(HitEvent {
        attacker: B,
        victim: C,
    });
    app.update();

    assert_eq!(role(&app, B), None);
    assert_eq!(role(&app, A), Some(Role::Hider));
    assert_eq!(role(&app, C), Some(Role::Hider));
    assert!(role_changes(&app).is_empty());
}

#[test]
fn respawn_placement_stands_after_a_same_tick_role_reversal() {
    let rooms = [[0.0, 0.0, 0.0], [10.0, 0.0, 0.0], [20.0, 0.0, 0.0]];
    let mut app = start(settings(&rooms, &[Role::Hider, Role::Seeker]));

    app.world_mut().send_event(HitEvent {
        attacker: A,
        victim: B,
    });
    app.world_mut().send_event(HitEvent {
        attacker: B,
        victim: A,
    });
    app.update();

    let placements = app.world().resource::<Events<PlacePlayer>>();
    let mut cursor = placements.get_cursor();
    let placements: Vec<PlacePlayer> = cursor.read(placements).copied().collect();
    assert_eq!(placements.len(), 2);
    assert_eq!(placements[0].player, A);
    assert_eq!(placements[1].player, B);

    // Both moves were applied even though A ended the tick as a hider again
    let spawned = players(&mut app);
    assert_eq!(spawned[0].1, placements[0].position);
    assert_eq!(spawned[1].1, placements[1].position);
    assert_eq!(spawned[0].0.role, Role::Hider);
    assert!(spawned[0].1.distance(spawned[1].1) >= 0.5);
}
