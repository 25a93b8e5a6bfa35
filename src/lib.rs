//! Creature behaviour and population simulation.
//!
//! Monsters patrol, chase, and attack; animals wander and flee. Spawners keep
//! each population topped up by recycling the kind of every creature that
//! dies. The [`Simulation`] runs headless; [`SimulationPlugin`] mirrors it
//! into a Bevy world.
pub mod behavior;
pub mod clock;
pub mod components;
pub mod config;
pub mod constants;
pub mod creature;
pub mod ground;
pub mod kind;
pub mod logging;
pub mod machine;
pub mod physics;
pub mod population;
pub mod sim_sync;
pub mod simulation;
pub mod tasks;
pub mod vector_math;
pub use constants::*;

// Re-export commonly used items
pub use components::{CreatureTag, CreatureView, Player};
pub use config::{ConfigError, KindProfile, SimConfig, SpawnerConfig};
pub use creature::{Creature, CreatureHandle, CreatureState, Health};
pub use ground::{FlatGround, GroundResolver, HeightField, NoGround};
pub use kind::{CreatureKind, Family};
pub use logging::init as init_logging;
pub use machine::DamageReport;
pub use population::{PopulationLedger, RespawnQueue, SpawnScheduler};
pub use sim_sync::{
    CreatureDamaged, CreatureDied, CreatureSpawned, DamageInbox, DamageIngress, DamageRequest,
    PlayerStruck, SimulationPlugin,
};
pub use simulation::{SimEvent, Simulation};

pub mod prelude {
    //! Prelude exports used in documentation examples.
    //!
    //! ```rust,no_run
    //! use menagerie::prelude::*;
    //! ```

    pub use crate::CreatureHandle;
    pub use crate::CreatureKind;
    pub use crate::CreatureState;
    pub use crate::DamageIngress;
    pub use crate::DamageRequest;
    pub use crate::GroundResolver;
    pub use crate::Player;
    pub use crate::SimConfig;
    pub use crate::Simulation;
    pub use crate::SimulationPlugin;
}
