//! Observer events crossing the boundary between the ECS world and the
//! simulation.
//!
//! Gameplay code triggers [`DamageIngress`] to hit a creature; everything the
//! simulation reports back is re-triggered as one of the outbound events so
//! presentation layers can attach observers instead of polling.

use bevy::ecs::prelude::On;
use bevy::prelude::*;
use glam::Vec3;

use crate::creature::CreatureHandle;
use crate::kind::CreatureKind;

use super::{DamageInbox, DamageRequest};

/// Event used to enqueue a [`DamageRequest`] for the next step.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct DamageIngress {
    request: DamageRequest,
}

impl DamageIngress {
    /// Wraps `request` for triggering.
    #[must_use]
    pub const fn new(request: DamageRequest) -> Self {
        Self { request }
    }

    /// The buffered hit.
    #[must_use]
    pub const fn request(&self) -> DamageRequest {
        self.request
    }
}

impl From<DamageRequest> for DamageIngress {
    fn from(request: DamageRequest) -> Self {
        Self::new(request)
    }
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must take On<T> by value for Events V2."
)]
pub(crate) fn buffer_damage_ingress(event: On<DamageIngress>, mut inbox: ResMut<DamageInbox>) {
    inbox.push(event.event().request());
}

/// A spawner placed a new creature and its entity now exists.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct CreatureSpawned {
    /// Mirror entity carrying the [`crate::CreatureTag`].
    pub entity: Entity,
    /// Simulation handle.
    pub handle: CreatureHandle,
    /// Creature kind.
    pub kind: CreatureKind,
    /// Resting position after placement.
    pub position: Vec3,
    /// No ground was found and the spawner's own height was used.
    pub fell_back: bool,
}

/// A hit landed. Carries what a floating damage number needs.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct CreatureDamaged {
    /// Mirror entity, or `None` for creatures never mirrored.
    pub entity: Option<Entity>,
    /// Simulation handle.
    pub handle: CreatureHandle,
    /// Creature kind.
    pub kind: CreatureKind,
    /// Damage after clamping negatives to zero.
    pub amount: i32,
    /// Where to float the number.
    pub position: Vec3,
    /// Indicator colour.
    pub color: [f32; 3],
    /// The hit started the death sequence.
    pub lethal: bool,
}

/// A creature's attack connected with the player.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct PlayerStruck {
    /// Mirror entity of the attacker.
    pub attacker: Option<Entity>,
    /// Attacker kind.
    pub kind: CreatureKind,
    /// Damage dealt to the player.
    pub amount: i32,
}

/// Teardown finished; the entity has been despawned.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct CreatureDied {
    /// Simulation handle, now retired.
    pub handle: CreatureHandle,
    /// Creature kind.
    pub kind: CreatureKind,
    /// Where the body came to rest.
    pub position: Vec3,
}
