//! A missed ground probe degrades placement and logs one warning.

use log::Level;
use menagerie::{NoGround, SimConfig, SimEvent, Simulation, SpawnerConfig};
use rstest::rstest;
use serial_test::serial;
use test_utils::logs;
use test_utils::terrain::island;

fn tower() -> SpawnerConfig {
    SpawnerConfig {
        name: "tower".to_owned(),
        center: [0.0, 12.0, 0.0],
        ..SpawnerConfig::lair()
    }
}

fn sim_with(ground: impl menagerie::GroundResolver + 'static) -> Simulation {
    let config = SimConfig {
        spawners: vec![tower()],
        ..SimConfig::default()
    };
    Simulation::new(config, Box::new(ground), 13).expect("valid config")
}

#[rstest]
#[serial]
fn missing_ground_falls_back_with_one_warning() {
    logs::install();
    let mut sim = sim_with(NoGround);
    sim.step(0.05);

    let records = logs::take();
    assert_eq!(logs::matching(&records, Level::Warn, "menagerie::spawner"), 1);
    let events = sim.drain_events();
    let Some(SimEvent::Spawned {
        position,
        fell_back,
        ..
    }) = events.first()
    else {
        panic!("expected a spawn, got {events:?}");
    };
    assert!(*fell_back);
    assert!(position.y >= 12.0);
}

#[rstest]
#[serial]
fn found_ground_places_silently() {
    logs::install();
    let mut sim = sim_with(island(100.0, 2.0));
    sim.step(0.05);

    let records = logs::take();
    assert_eq!(logs::matching(&records, Level::Warn, "menagerie"), 0);
    let (_, creature) = sim.creatures().next().expect("spawned");
    let feet = creature.position().y - creature.foot_offset();
    assert!((2.0..2.5).contains(&feet), "feet at {feet}");
}
