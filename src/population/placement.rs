//! Spawn-point selection and ground placement.

use std::f32::consts::TAU;

use glam::{Vec2, Vec3};
use log::warn;
use rand::Rng;

use crate::config::SpawnerConfig;
use crate::ground::{probe_down, resting_height, GroundResolver};

/// Where a new creature goes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Resting position above the ground.
    pub position: Vec3,
    /// The probe missed and the structure's height was used instead.
    pub fell_back: bool,
}

/// Random horizontal offset with magnitude in `[min_distance, radius]` and a
/// uniform angle.
pub fn annulus_offset<R: Rng>(rng: &mut R, min_distance: f32, radius: f32) -> Vec2 {
    let angle = rng.random_range(0.0..TAU);
    let distance = if radius > min_distance {
        rng.random_range(min_distance..=radius)
    } else {
        min_distance
    };
    Vec2::from_angle(angle) * distance
}

/// Picks a spawn point around the spawner and rests it on the ground.
///
/// A missed probe is recoverable: the creature is placed at the structure's
/// own height and a single warning is logged.
pub fn resolve_spawn_position<R: Rng>(
    spawner: &SpawnerConfig,
    foot_offset: f32,
    ground: &dyn GroundResolver,
    rng: &mut R,
) -> Placement {
    let center = spawner.center();
    let offset = annulus_offset(rng, spawner.min_spawn_distance, spawner.spawn_radius);
    let column = Vec2::new(center.x + offset.x, center.z + offset.y);

    match probe_down(ground, column, center.y + spawner.probe_height) {
        Some(surface) => Placement {
            position: Vec3::new(
                column.x,
                resting_height(surface, foot_offset, spawner.clearance),
                column.y,
            ),
            fell_back: false,
        },
        None => {
            warn!(
                target: "menagerie::spawner",
                "spawner {}: no ground below {column}; placing at structure height {}",
                spawner.name,
                center.y
            );
            Placement {
                position: Vec3::new(
                    column.x,
                    resting_height(center.y, foot_offset, spawner.clearance),
                    column.y,
                ),
                fell_back: true,
            }
        }
    }
}
