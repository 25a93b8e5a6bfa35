//! ECS component types mirrored from the simulation.
//! Includes the player marker, creature identity, and the animation-facing view.
use bevy::prelude::*;
use serde::Serialize;

use crate::creature::{Creature, CreatureHandle, CreatureState};
use crate::kind::CreatureKind;

/// Marks the entity whose `Transform` is the player position.
#[derive(Component, Debug, Default, Clone, Copy, Serialize)]
pub struct Player;

/// Links an entity to its simulated creature.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CreatureTag {
    /// Simulation handle.
    pub handle: CreatureHandle,
    /// Creature kind.
    pub kind: CreatureKind,
}

/// Read-only snapshot consumed by animation and UI.
#[derive(Component, Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CreatureView {
    /// Top-level state.
    pub state: CreatureState,
    /// Horizontal speed, for walk-cycle blending.
    pub speed: f32,
    /// Engaged with the player or a hit.
    pub is_aggro: bool,
    /// Teardown progress in `[0, 1]` while dying.
    pub death_progress: Option<f32>,
}

impl Default for CreatureView {
    fn default() -> Self {
        Self {
            state: CreatureState::Patrol,
            speed: 0.0,
            is_aggro: false,
            death_progress: None,
        }
    }
}

impl CreatureView {
    /// Snapshot of `creature` for this frame.
    #[must_use]
    pub fn of(creature: &Creature) -> Self {
        Self {
            state: creature.state(),
            speed: creature.horizontal_speed(),
            is_aggro: creature.is_aggro(),
            death_progress: creature.death_progress(),
        }
    }
}
