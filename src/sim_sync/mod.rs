//! Bevy integration for the creature simulation.
//!
//! The [`SimulationPlugin`] owns a [`Simulation`](crate::simulation::Simulation)
//! resource and, every `Update`, feeds it the player position and buffered
//! hits, steps it, then mirrors creatures onto entities and re-triggers what
//! happened as observer events.

mod damage_inbox;
mod events;
mod plugin;
mod systems;

pub use damage_inbox::{DamageInbox, DamageRequest};
pub use events::{CreatureDamaged, CreatureDied, CreatureSpawned, DamageIngress, PlayerStruck};
pub use plugin::{SimulationError, SimulationErrorContext, SimulationPlugin};
pub use systems::{
    drain_damage_inbox_system, publish_simulation_events_system, snapshot_player_system,
    step_simulation_system, sync_creature_views_system, CreatureEntities,
};
