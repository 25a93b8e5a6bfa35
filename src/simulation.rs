//! Frame driver tying spawners, creatures, and physics together.
//!
//! One call to [`Simulation::step`] runs, in order: every spawner's tick, the
//! logic step of every creature, the fixed-timestep physics substeps, and the
//! routing of completed deaths back to the owning spawner. Everything the
//! outside world may want to react to is queued as a [`SimEvent`].

use std::collections::BTreeMap;
use std::time::Duration;

use bevy::prelude::Resource;
use glam::Vec3;
use log::{debug, trace};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::clock::SimTime;
use crate::config::{ConfigError, SimConfig};
use crate::creature::{Creature, CreatureHandle};
use crate::ground::GroundResolver;
use crate::kind::CreatureKind;
use crate::machine::{DamageReport, StepContext};
use crate::physics::integrate;
use crate::population::{HandleAllocator, SpawnScheduler};

/// Something observable that happened during a step or a damage call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimEvent {
    /// A spawner placed a new creature.
    Spawned {
        /// Handle of the new creature.
        handle: CreatureHandle,
        /// Its kind.
        kind: CreatureKind,
        /// Resting position after placement.
        position: Vec3,
        /// Placement fell back to the structure height.
        fell_back: bool,
    },
    /// A hit registered on a live creature.
    Damaged {
        /// Creature that was hit.
        handle: CreatureHandle,
        /// Its kind.
        kind: CreatureKind,
        /// Indicator data for the hit.
        report: DamageReport,
    },
    /// A creature's attack hit the player.
    PlayerStruck {
        /// Creature whose strike connected.
        attacker: CreatureHandle,
        /// Its kind.
        kind: CreatureKind,
        /// Damage dealt to the player.
        amount: i32,
    },
    /// A death sequence finished and the creature was removed.
    Died {
        /// Creature that died.
        handle: CreatureHandle,
        /// Its kind.
        kind: CreatureKind,
        /// Where the body came to rest.
        position: Vec3,
    },
}

#[derive(Debug)]
struct Tracked {
    creature: Creature,
    /// Index into `Simulation::spawners`; `None` for adopted creatures.
    spawner: Option<usize>,
}

/// The whole creature simulation.
#[derive(Resource)]
pub struct Simulation {
    config: SimConfig,
    ground: Box<dyn GroundResolver>,
    rng: StdRng,
    spawners: Vec<SpawnScheduler>,
    creatures: BTreeMap<CreatureHandle, Tracked>,
    handles: HandleAllocator,
    elapsed: Duration,
    player: Option<Vec3>,
    physics_accumulator: f32,
    outbox: Vec<SimEvent>,
}

impl Simulation {
    /// Builds a simulation with one scheduler per configured spawner. All
    /// randomness derives from `seed`.
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] when `config` fails
    /// [`SimConfig::validate`], for example a monster without health.
    pub fn new(
        config: SimConfig,
        ground: Box<dyn GroundResolver>,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut rng = StdRng::seed_from_u64(seed);
        let spawners = config
            .spawners
            .iter()
            .cloned()
            .map(|spawner| SpawnScheduler::new(spawner, &mut rng, 0.0))
            .collect();
        Ok(Self {
            config,
            ground,
            rng,
            spawners,
            creatures: BTreeMap::new(),
            handles: HandleAllocator::default(),
            elapsed: Duration::ZERO,
            player: None,
            physics_accumulator: 0.0,
            outbox: Vec::new(),
        })
    }

    /// Advances the simulation by `dt` seconds. Non-positive or non-finite
    /// steps are ignored.
    pub fn step(&mut self, dt: f32) {
        if !(dt.is_finite() && dt > 0.0) {
            return;
        }
        match Duration::try_from_secs_f32(dt) {
            Ok(delta) => self.step_by(delta),
            Err(e) => debug!("ignoring unrepresentable step of {dt}s: {e}"),
        }
    }

    /// Advances the simulation by `delta`. The master clock accumulates
    /// whole nanoseconds, so long sessions do not drift. A zero delta is
    /// ignored.
    pub fn step_by(&mut self, delta: Duration) {
        if delta.is_zero() {
            return;
        }
        self.elapsed += delta;
        let now = self.time();
        let dt = delta.as_secs_f32();

        for (index, spawner) in self.spawners.iter_mut().enumerate() {
            let Some(spawned) = spawner.tick(
                now,
                &self.config.kinds,
                self.ground.as_ref(),
                &mut self.handles,
                &mut self.rng,
            ) else {
                continue;
            };
            self.outbox.push(SimEvent::Spawned {
                handle: spawned.handle,
                kind: spawned.creature.kind(),
                position: spawned.placement.position,
                fell_back: spawned.placement.fell_back,
            });
            self.creatures.insert(
                spawned.handle,
                Tracked {
                    creature: spawned.creature,
                    spawner: Some(index),
                },
            );
        }

        let mut died = Vec::new();
        let mut ctx = StepContext {
            now,
            dt,
            player: self.player,
            ground: self.ground.as_ref(),
            config: &self.config,
            rng: &mut self.rng,
        };
        for (handle, tracked) in &mut self.creatures {
            let report = tracked.creature.tick(&mut ctx);
            if let Some(amount) = report.player_damage {
                self.outbox.push(SimEvent::PlayerStruck {
                    attacker: *handle,
                    kind: tracked.creature.kind(),
                    amount,
                });
            }
            if report.died {
                died.push(*handle);
            }
        }

        self.run_physics(dt);

        for handle in died {
            self.retire(handle);
        }
    }

    fn run_physics(&mut self, dt: f32) {
        let settings = self.config.physics.settings();
        let max_substeps = self.config.physics.max_substeps.max(1);
        self.physics_accumulator += dt;
        let mut substeps = 0;
        while self.physics_accumulator >= settings.timestep && substeps < max_substeps {
            for tracked in self.creatures.values_mut() {
                let foot_offset = tracked.creature.foot_offset();
                integrate(
                    &mut tracked.creature.body,
                    foot_offset,
                    self.ground.as_ref(),
                    &settings,
                    settings.timestep,
                );
            }
            self.physics_accumulator -= settings.timestep;
            substeps += 1;
        }
        if self.physics_accumulator >= settings.timestep {
            debug!(
                "dropping {:.3}s of physics backlog after {substeps} substeps",
                self.physics_accumulator
            );
            self.physics_accumulator %= settings.timestep;
        }
    }

    /// Removes a dead creature and tells its spawner.
    fn retire(&mut self, handle: CreatureHandle) {
        let Some(tracked) = self.creatures.remove(&handle) else {
            return;
        };
        let kind = tracked.creature.kind();
        if let Some(spawner) = tracked
            .spawner
            .and_then(|index| self.spawners.get_mut(index))
        {
            spawner.on_creature_died(kind, handle);
        }
        self.outbox.push(SimEvent::Died {
            handle,
            kind,
            position: tracked.creature.position(),
        });
    }

    /// Inbound damage. Unknown handles and creatures that are already dying
    /// are ignored.
    pub fn apply_damage(
        &mut self,
        handle: CreatureHandle,
        amount: i32,
        hit_origin: Vec3,
    ) -> Option<DamageReport> {
        let now = self.time();
        let Some(tracked) = self.creatures.get_mut(&handle) else {
            trace!("damage for unknown creature {handle} ignored");
            return None;
        };
        let report = tracked
            .creature
            .apply_damage(amount, hit_origin, now, &self.config)?;
        self.outbox.push(SimEvent::Damaged {
            handle,
            kind: tracked.creature.kind(),
            report,
        });
        Some(report)
    }

    /// Tracks a creature built outside any spawner. Its death is reported
    /// but queues no replacement.
    pub fn adopt(&mut self, creature: Creature) -> CreatureHandle {
        let handle = self.handles.allocate();
        self.creatures.insert(
            handle,
            Tracked {
                creature,
                spawner: None,
            },
        );
        handle
    }

    /// Sets the player position read by every creature on the next step.
    pub fn set_player(&mut self, player: Option<Vec3>) {
        self.player = player;
    }

    /// Player position seen by the last step.
    #[must_use]
    pub const fn player(&self) -> Option<Vec3> {
        self.player
    }

    /// Takes every event queued since the last drain.
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.outbox)
    }

    /// Seconds simulated since creation.
    #[must_use]
    pub fn time(&self) -> SimTime {
        self.elapsed.as_secs_f64()
    }

    /// Total simulated time.
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Tuning the simulation was built with.
    #[must_use]
    pub const fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Read-only view of a live creature.
    #[must_use]
    pub fn creature(&self, handle: CreatureHandle) -> Option<&Creature> {
        self.creatures.get(&handle).map(|tracked| &tracked.creature)
    }

    /// Test and tooling access to a creature.
    pub fn creature_mut(&mut self, handle: CreatureHandle) -> Option<&mut Creature> {
        self.creatures
            .get_mut(&handle)
            .map(|tracked| &mut tracked.creature)
    }

    /// Live creatures in handle order.
    pub fn creatures(&self) -> impl Iterator<Item = (CreatureHandle, &Creature)> + '_ {
        self.creatures
            .iter()
            .map(|(handle, tracked)| (*handle, &tracked.creature))
    }

    /// Number of live creatures, dying ones included.
    #[must_use]
    pub fn population(&self) -> usize {
        self.creatures.len()
    }

    /// Every spawner, in configuration order.
    #[must_use]
    pub fn spawners(&self) -> &[SpawnScheduler] {
        &self.spawners
    }

    /// Spawner by configured name.
    #[must_use]
    pub fn spawner(&self, name: &str) -> Option<&SpawnScheduler> {
        self.spawners.iter().find(|spawner| spawner.name() == name)
    }

    /// Mutable spawner by configured name.
    pub fn spawner_mut(&mut self, name: &str) -> Option<&mut SpawnScheduler> {
        self.spawners
            .iter_mut()
            .find(|spawner| spawner.name() == name)
    }
}
