//! Kinematic body and fixed-step integration.
//!
//! Bodies combine two velocity channels: `locomotion`, written by the
//! behaviour state machine every logic step, and `velocity`, which carries
//! impulses (knockback, hops) and gravity. Only `velocity` decays with drag,
//! so a stunned creature with frozen locomotion still slides from a hit.

use glam::{Quat, Vec3};

use crate::constants::{
    AIR_DRAG, GRAVITY, GROUNDED_EPSILON, GROUND_DRAG, PHYSICS_TIMESTEP, STEP_HEIGHT,
};
use crate::ground::{ground_under, GroundResolver};

/// Physical state of one creature.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    /// Body origin in world space.
    pub position: Vec3,
    /// Facing rotation.
    pub orientation: Quat,
    /// Desired horizontal velocity from the state machine.
    pub locomotion: Vec3,
    /// Impulse-driven velocity, including the vertical component.
    pub velocity: Vec3,
    /// Feet touched the ground during the last substep.
    pub grounded: bool,
    /// Integration is skipped while `false` (during spawn placement).
    pub physics_enabled: bool,
}

impl Body {
    /// Creates a resting body at `position` with physics enabled.
    #[must_use]
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            orientation: Quat::IDENTITY,
            locomotion: Vec3::ZERO,
            velocity: Vec3::ZERO,
            grounded: false,
            physics_enabled: true,
        }
    }

    /// Adds an instantaneous velocity change. Upward impulses leave the ground.
    pub fn apply_impulse(&mut self, impulse: Vec3) {
        if !impulse.is_finite() {
            return;
        }
        self.velocity += impulse;
        if impulse.y > 0.0 {
            self.grounded = false;
        }
    }

    /// Combined horizontal speed from locomotion and impulses.
    #[must_use]
    pub fn horizontal_speed(&self) -> f32 {
        let planar = self.locomotion + Vec3::new(self.velocity.x, 0.0, self.velocity.z);
        planar.length()
    }
}

/// Integration constants; see [`crate::constants`] for defaults.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsSettings {
    /// Seconds per substep.
    pub timestep: f32,
    /// Downward acceleration, positive.
    pub gravity: f32,
    /// Horizontal velocity decay rate while grounded.
    pub ground_drag: f32,
    /// Horizontal velocity decay rate while airborne.
    pub air_drag: f32,
    /// Ledges up to this height are climbed.
    pub step_height: f32,
    /// Contact distance that still counts as grounded.
    pub grounded_epsilon: f32,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            timestep: PHYSICS_TIMESTEP,
            gravity: GRAVITY,
            ground_drag: GROUND_DRAG,
            air_drag: AIR_DRAG,
            step_height: STEP_HEIGHT,
            grounded_epsilon: GROUNDED_EPSILON,
        }
    }
}

/// Advances `body` by `dt` seconds.
///
/// Ground contact is swept: a body that crosses the surface from above, or
/// that meets ground risen by at most `step_height`, is snapped onto it.
/// Deeper penetration is left in place for the periodic anti-sink check.
pub fn integrate(
    body: &mut Body,
    foot_offset: f32,
    ground: &dyn GroundResolver,
    settings: &PhysicsSettings,
    dt: f32,
) {
    if !body.physics_enabled || dt <= 0.0 {
        return;
    }

    body.velocity.y += settings.gravity * dt;
    let previous_lowest = body.position.y - foot_offset;
    let planar = body.locomotion + Vec3::new(body.velocity.x, 0.0, body.velocity.z);
    body.position += planar * dt + Vec3::Y * body.velocity.y * dt;

    let drag = if body.grounded {
        settings.ground_drag
    } else {
        settings.air_drag
    };
    let decay = (-drag * dt).exp();
    body.velocity.x *= decay;
    body.velocity.z *= decay;

    let Some(surface) = ground_under(ground, body.position) else {
        body.grounded = false;
        return;
    };
    let lowest = body.position.y - foot_offset;
    let touching = lowest <= surface + settings.grounded_epsilon;
    let rising = body.velocity.y > 0.0;
    if touching && !rising && previous_lowest >= surface - settings.step_height {
        body.position.y = surface + foot_offset;
        body.velocity.y = 0.0;
        body.grounded = true;
    } else {
        body.grounded = false;
    }
}
