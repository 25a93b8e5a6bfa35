//! Headless driver: runs the creature simulation on rolling terrain with a
//! player walking a circle through the lair and swinging at whatever is near.
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context};
use bevy::ecs::prelude::On;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use clap::Parser;
use log::info;
use menagerie::sim_sync::snapshot_player_system;
use menagerie::{
    init_logging, CreatureDied, CreatureKind, CreatureTag, DamageIngress, DamageRequest,
    HeightField, Player, PlayerStruck, SimConfig, Simulation, SimulationPlugin,
};

/// Creature behaviour and population simulation
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
    /// Seed for every random decision
    #[arg(long, default_value_t = 7)]
    seed: u64,
    /// JSON tuning file; defaults apply when omitted
    #[arg(long)]
    config: Option<PathBuf>,
    /// Number of frames to simulate
    #[arg(long, default_value_t = 3000)]
    frames: u32,
    /// Seconds per frame
    #[arg(long, default_value_t = 1.0 / 60.0)]
    frame_dt: f32,
}

const PLAYER_PATH_RADIUS: f32 = 9.0;
const PLAYER_SWING_INTERVAL: f32 = 0.8;
const PLAYER_REACH: f32 = 2.5;
const PLAYER_DAMAGE: i32 = 2;
const SUMMARY_EVERY: u32 = 600;

fn rolling_hills() -> HeightField {
    HeightField::from_fn(Vec2::splat(-80.0), 1.0, 161, 161, |p| {
        (p.x * 0.1).sin() * 0.5 + (p.y * 0.07).cos() * 0.3
    })
}

fn walk_player(time: Res<Time>, mut player: Query<&mut Transform, With<Player>>) {
    let angle = time.elapsed_secs() * 0.2;
    for mut transform in &mut player {
        transform.translation = Vec3::new(
            angle.cos() * PLAYER_PATH_RADIUS,
            0.0,
            angle.sin() * PLAYER_PATH_RADIUS,
        );
    }
}

fn swing_at_nearest(
    mut commands: Commands,
    time: Res<Time>,
    mut cooldown: Local<f32>,
    player: Query<(Entity, &Transform), With<Player>>,
    creatures: Query<(Entity, &Transform), With<CreatureTag>>,
) {
    *cooldown -= time.delta_secs();
    if *cooldown > 0.0 {
        return;
    }
    let Some((_, player)) = player.iter().next() else {
        return;
    };
    let origin = player.translation;
    let nearest = creatures
        .iter()
        .map(|(entity, transform)| (entity, transform.translation.distance(origin)))
        .filter(|(_, distance)| *distance <= PLAYER_REACH)
        .min_by(|a, b| a.1.total_cmp(&b.1));
    if let Some((target, _)) = nearest {
        commands.trigger(DamageIngress::new(DamageRequest {
            target,
            amount: PLAYER_DAMAGE,
            hit_origin: origin,
        }));
        *cooldown = PLAYER_SWING_INTERVAL;
    }
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value for Events V2."
)]
fn log_player_struck(event: On<PlayerStruck>) {
    let PlayerStruck { kind, amount, .. } = event.event();
    info!("player struck by {kind} for {amount}");
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value for Events V2."
)]
fn log_creature_died(event: On<CreatureDied>) {
    let CreatureDied {
        handle,
        kind,
        position,
    } = event.event();
    info!("{kind} {handle} died at {position}");
}

fn summarize(sim: &Simulation) {
    let counts: Vec<String> = CreatureKind::ALL
        .iter()
        .map(|kind| {
            let alive = sim
                .creatures()
                .filter(|(_, creature)| creature.kind() == *kind)
                .count();
            format!("{kind}={alive}")
        })
        .collect();
    info!(
        "t={:.1}s population={} [{}]",
        sim.time(),
        sim.population(),
        counts.join(" ")
    );
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    if !(args.frame_dt.is_finite() && args.frame_dt > 0.0) {
        bail!("--frame-dt must be a positive number of seconds");
    }
    let config = match &args.config {
        Some(path) => SimConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => SimConfig::default(),
    };
    config.validate()?;

    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f32(
            args.frame_dt,
        )))
        .add_plugins(SimulationPlugin::new(config, rolling_hills()).with_seed(args.seed))
        .add_systems(
            Update,
            (walk_player, swing_at_nearest).before(snapshot_player_system),
        )
        .add_observer(log_player_struck)
        .add_observer(log_creature_died);
    app.world_mut()
        .spawn((Player, Transform::from_xyz(PLAYER_PATH_RADIUS, 0.0, 0.0)));

    for frame in 1..=args.frames {
        app.update();
        if frame % SUMMARY_EVERY == 0 {
            summarize(app.world().resource::<Simulation>());
        }
    }
    summarize(app.world().resource::<Simulation>());
    Ok(())
}
