//! Creatures outside their roam bound always head home.

use glam::Vec3;
use menagerie::config::KindProfiles;
use menagerie::vector_math::{direction_towards, horizontal_distance};
use menagerie::{Creature, CreatureKind, FlatGround, SimConfig, Simulation};
use rstest::rstest;

const MAX_ROAM: f32 = 4.0;

#[rstest]
#[case(CreatureKind::Goblin)]
#[case(CreatureKind::Skeleton)]
#[case(CreatureKind::Slime)]
#[case(CreatureKind::Rabbit)]
#[case(CreatureKind::Squirrel)]
#[case(CreatureKind::Bird)]
#[case(CreatureKind::Deer)]
#[case(CreatureKind::Fox)]
fn strays_always_point_home(#[case] kind: CreatureKind) {
    let config = SimConfig {
        spawners: Vec::new(),
        max_roam_distance: MAX_ROAM,
        ..SimConfig::default()
    };
    let profile = *KindProfiles::default().get(kind);
    let origin = Vec3::new(0.0, profile.foot_offset, 0.0);
    let mut sim = Simulation::new(config, Box::new(FlatGround::new(0.0)), 31)
        .expect("valid config");
    let handle = sim.adopt(Creature::placed_at(kind, &profile, origin, 0.0));

    let mut furthest: f32 = 0.0;
    for _ in 0..1_200 {
        let before = sim.creature(handle).expect("alive").position();
        sim.step(0.05);
        let creature = sim.creature(handle).expect("alive");
        furthest = furthest.max(horizontal_distance(creature.position(), origin));
        if horizontal_distance(before, origin) > MAX_ROAM {
            let home = direction_towards(before, origin);
            assert!(
                creature.move_direction().dot(home) > 0.99,
                "{kind} at {before} heading {}",
                creature.move_direction()
            );
        }
    }
    assert!(furthest < MAX_ROAM + 3.0, "{kind} roamed {furthest}");
}

#[rstest]
fn creature_placed_far_from_home_walks_back() {
    let config = SimConfig {
        spawners: Vec::new(),
        max_roam_distance: MAX_ROAM,
        ..SimConfig::default()
    };
    let profile = KindProfiles::default().goblin;
    let origin = Vec3::new(0.0, profile.foot_offset, 0.0);
    let mut sim = Simulation::new(config, Box::new(FlatGround::new(0.0)), 32)
        .expect("valid config");
    let handle = sim.adopt(Creature::placed_at(CreatureKind::Goblin, &profile, origin, 0.0));
    sim.creature_mut(handle)
        .expect("goblin")
        .set_position(Vec3::new(20.0, profile.foot_offset, 0.0));

    for _ in 0..200 {
        sim.step(0.05);
    }
    let goblin = sim.creature(handle).expect("goblin");
    assert!(horizontal_distance(goblin.position(), origin) <= MAX_ROAM + 1.0);
}
