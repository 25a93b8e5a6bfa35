//! Bevy plugin wiring the creature simulation into the schedule.

use std::sync::Arc;

use bevy::ecs::prelude::On;
use bevy::prelude::*;
use log::error;
use thiserror::Error;

use crate::config::SimConfig;
use crate::ground::{FlatGround, GroundResolver};
use crate::simulation::Simulation;

use super::events::buffer_damage_ingress;
use super::{
    drain_damage_inbox_system, publish_simulation_events_system, snapshot_player_system,
    step_simulation_system, sync_creature_views_system, CreatureEntities, DamageInbox,
};

/// Context carried by [`SimulationError`] events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationErrorContext {
    /// Failure surfaced while building the plugin.
    Init,
}

/// Event raised when the simulation cannot be installed.
#[derive(Event, Debug, Clone, Error)]
#[error("{context:?}: {detail}")]
pub struct SimulationError {
    /// Where the failure happened.
    pub context: SimulationErrorContext,
    /// Human-readable cause.
    pub detail: String,
}

impl SimulationError {
    /// Builds an error event for `context`.
    #[must_use]
    pub fn new(context: SimulationErrorContext, detail: impl Into<String>) -> Self {
        Self {
            context,
            detail: detail.into(),
        }
    }
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value for Events V2."
)]
fn log_simulation_error(event: On<SimulationError>) {
    let SimulationError { context, detail } = event.event();
    error!("creature simulation error during {context:?}: {detail}");
}

/// Installs a [`Simulation`] resource and the systems that mirror it.
///
/// The ground resolver is shared, so one terrain can back several apps.
#[derive(Clone)]
pub struct SimulationPlugin {
    config: SimConfig,
    ground: Arc<dyn GroundResolver>,
    seed: u64,
}

impl Default for SimulationPlugin {
    fn default() -> Self {
        Self::new(SimConfig::default(), FlatGround::new(0.0))
    }
}

impl SimulationPlugin {
    /// Plugin running `config` over `ground`, seeded with zero.
    #[must_use]
    pub fn new(config: SimConfig, ground: impl GroundResolver + 'static) -> Self {
        Self {
            config,
            ground: Arc::new(ground),
            seed: 0,
        }
    }

    /// Replaces the seed driving every random decision.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.add_observer(log_simulation_error);

        let sim = match Simulation::new(
            self.config.clone(),
            Box::new(Arc::clone(&self.ground)),
            self.seed,
        ) {
            Ok(sim) => sim,
            Err(e) => {
                app.world_mut().trigger(SimulationError::new(
                    SimulationErrorContext::Init,
                    e.to_string(),
                ));
                return;
            }
        };

        app.insert_resource(sim);
        app.init_resource::<DamageInbox>();
        app.init_resource::<CreatureEntities>();
        app.add_observer(buffer_damage_ingress);
        app.add_systems(
            Update,
            (
                snapshot_player_system,
                drain_damage_inbox_system,
                step_simulation_system,
                publish_simulation_events_system,
                sync_creature_views_system,
            )
                .chain(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SpawnerConfig;
    use rstest::rstest;

    #[rstest]
    fn plugin_initialises_resources() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(SimulationPlugin::default());
        assert!(app.world().contains_resource::<Simulation>());
        assert!(app.world().contains_resource::<DamageInbox>());
        assert!(app.world().contains_resource::<CreatureEntities>());
        app.update();
    }

    #[rstest]
    fn invalid_config_installs_nothing() {
        let config = SimConfig {
            spawners: vec![SpawnerConfig {
                spawn_interval: 0.0,
                ..SpawnerConfig::lair()
            }],
            ..SimConfig::default()
        };
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(SimulationPlugin::new(config, FlatGround::new(0.0)));
        assert!(!app.world().contains_resource::<Simulation>());
        assert!(!app.world().contains_resource::<DamageInbox>());
        app.update();
    }
}
