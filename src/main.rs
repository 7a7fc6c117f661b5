use bevy::app::ScheduleRunnerPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use clap::Parser;
use hideseek::{
    AttackIntent, ConfigError, HideSeekPlugin, HitEvent, MatchClock, MatchSet, MatchSettings,
    Player, PlayerLeft, Role, RoleChanged, RoleState,
};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;
use std::time::Duration;

/// Runs a scripted headless hide-and-seek match and logs every role change.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// JSON match settings; built-in defaults when omitted
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seed for room picks and the scripted players
    #[arg(long)]
    seed: Option<u64>,
    /// Number of updates before the match ends
    #[arg(long, default_value_t = 600)]
    ticks: u64,
}

// Stands in for the physics and input side of a real game
#[derive(Resource)]
struct ScriptedMatch {
    rng: StdRng,
    ticks: u64,
}

fn main() -> Result<(), ConfigError> {
    let args = Args::parse();

    let mut settings = match &args.config {
        Some(path) => MatchSettings::load(path)?,
        None => MatchSettings::default(),
    };
    if args.seed.is_some() {
        settings.seed = args.seed;
    }
    let script_rng = match settings.seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(1)),
        None => StdRng::from_os_rng(),
    };

    let plugin = HideSeekPlugin::new(settings)?;

    App::new()
        .add_plugins(MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(
            Duration::from_secs_f64(1.0 / 60.0),
        )))
        .add_plugins(LogPlugin::default())
        .add_plugins(plugin)
        .insert_resource(ScriptedMatch {
            rng: script_rng,
            ticks: args.ticks,
        })
        .add_systems(
            Update,
            (
                scripted_attacks_system.before(MatchSet::Detect),
                match_timer_system.before(MatchSet::Resolve),
                log_role_changes.after(MatchSet::Resolve),
            ),
        )
        .run();

    Ok(())
}

// Every half second one seeker tags a hider; now and then everyone swings at whoever is near
fn scripted_attacks_system(
    clock: Res<MatchClock>,
    roles: Res<RoleState>,
    mut script: ResMut<ScriptedMatch>,
    mut hit_events: EventWriter<HitEvent>,
    mut attack_events: EventWriter<AttackIntent>,
) {
    if clock.tick % 30 == 29 {
        let seekers: Vec<_> = roles
            .players()
            .filter(|(_, role)| *role == Role::Seeker)
            .map(|(id, _)| id)
            .collect();
        let hiders: Vec<_> = roles.hiders().collect();

        let attacker = seekers.choose(&mut script.rng).copied();
        let victim = hiders.choose(&mut script.rng).copied();
        if let (Some(attacker), Some(victim)) = (attacker, victim) {
            hit_events.send(HitEvent { attacker, victim });
        }
    }

    if clock.tick % 45 == 44 && script.rng.random_bool(0.5) {
        let players: Vec<_> = roles.players().map(|(id, _)| id).collect();
        for attacker in players {
            attack_events.send(AttackIntent { attacker });
        }
    }
}

fn log_role_changes(mut role_events: EventReader<RoleChanged>, player_query: Query<&Player>) {
    for event in role_events.read() {
        let name = player_query
            .iter()
            .find(|player| player.id == event.player)
            .map(|player| player.name.as_str())
            .unwrap_or("unknown player");
        info!("{name} is now a {}", event.role);
    }
}

fn match_timer_system(
    clock: Res<MatchClock>,
    script: Res<ScriptedMatch>,
    roles: Res<RoleState>,
    mut left_events: EventWriter<PlayerLeft>,
    mut exit: EventWriter<AppExit>,
) {
    if clock.tick < script.ticks {
        return;
    }

    info!(
        "Match over after {} ticks: {} seekers, {} hiders",
        clock.tick,
        roles.seeker_count(),
        roles.len() - roles.seeker_count()
    );
    for (player, role) in roles.players() {
        info!("{player} finished as {role}");
        left_events.send(PlayerLeft { player });
    }
    exit.send(AppExit::Success);
}
