//! Ground fixtures.

use glam::Vec2;
use menagerie::ground::{GroundFn, GroundResolver, HeightField};

/// A plane tilted along x: `height = x * slope`.
pub fn ramp(slope: f32) -> impl GroundResolver {
    GroundFn(move |at: Vec2| Some(at.x * slope))
}

/// Solid ground only inside the disc of `radius` around the origin.
pub fn island(radius: f32, height: f32) -> impl GroundResolver {
    GroundFn(move |at: Vec2| (at.length() <= radius).then_some(height))
}

/// Gentle sine hills covering `[-extent, extent]` on both axes.
#[must_use]
pub fn hills(extent: f32) -> HeightField {
    let cells = (extent * 2.0).ceil() as usize + 1;
    HeightField::from_fn(Vec2::splat(-extent), 1.0, cells, cells, |p| {
        (p.x * 0.2).sin() * 0.4 + (p.y * 0.15).cos() * 0.3
    })
}
