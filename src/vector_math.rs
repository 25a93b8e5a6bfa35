//! Horizontal-plane vector helpers.
//! The world is y-up; "horizontal" always means the x/z plane.
use std::f32::consts::TAU;

use glam::{Quat, Vec2, Vec3};
use rand::Rng;

/// Projects a world position onto the horizontal plane.
///
/// # Examples
/// ```
/// use glam::{Vec2, Vec3};
/// use menagerie::vector_math::horizontal;
/// assert_eq!(horizontal(Vec3::new(1.0, 5.0, -2.0)), Vec2::new(1.0, -2.0));
/// ```
#[must_use]
pub fn horizontal(v: Vec3) -> Vec2 {
    Vec2::new(v.x, v.z)
}

/// Distance between two points ignoring height.
///
/// # Examples
/// ```
/// use glam::Vec3;
/// use menagerie::vector_math::horizontal_distance;
/// let d = horizontal_distance(Vec3::new(0.0, 10.0, 0.0), Vec3::new(3.0, -4.0, 4.0));
/// assert!((d - 5.0).abs() < 1e-6);
/// ```
#[must_use]
pub fn horizontal_distance(a: Vec3, b: Vec3) -> f32 {
    horizontal(a).distance(horizontal(b))
}

/// Unit horizontal vector pointing from `from` towards `to`.
///
/// Returns `Vec3::ZERO` when the points share a column or the input is not
/// finite.
#[must_use]
pub fn direction_towards(from: Vec3, to: Vec3) -> Vec3 {
    let delta = Vec3::new(to.x - from.x, 0.0, to.z - from.z);
    if !delta.is_finite() {
        return Vec3::ZERO;
    }
    delta.try_normalize().unwrap_or(Vec3::ZERO)
}

/// Unit horizontal vector for an angle in radians, measured from +x towards +z.
#[must_use]
pub fn heading_from_angle(angle: f32) -> Vec3 {
    Vec3::new(angle.cos(), 0.0, angle.sin())
}

/// Uniformly random unit horizontal heading.
pub fn random_heading<R: Rng>(rng: &mut R) -> Vec3 {
    heading_from_angle(rng.random_range(0.0..TAU))
}

/// Rotation facing along a horizontal direction; identity for a zero vector.
#[must_use]
pub fn facing(direction: Vec3) -> Quat {
    if direction.x == 0.0 && direction.z == 0.0 {
        return Quat::IDENTITY;
    }
    Quat::from_rotation_y(direction.x.atan2(direction.z))
}
