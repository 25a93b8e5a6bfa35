//! Spawn and respawn lifecycle.
//!
//! Each [`SpawnScheduler`] owns a [`RespawnQueue`] of kinds waiting to spawn
//! and a [`PopulationLedger`] of the creatures it has placed. Deaths push the
//! kind back onto the queue, so the population target is conserved.

mod ledger;
mod placement;
mod queue;

use log::debug;
use rand::Rng;

use crate::clock::{after, SimTime};
use crate::config::{KindProfiles, SpawnerConfig};
use crate::creature::{Creature, CreatureHandle};
use crate::ground::GroundResolver;
use crate::kind::CreatureKind;

pub use ledger::PopulationLedger;
pub use placement::{annulus_offset, resolve_spawn_position, Placement};
pub use queue::RespawnQueue;

/// Hands out unique creature handles across all spawners.
#[derive(Debug, Clone, Default)]
pub struct HandleAllocator {
    next: u64,
}

impl HandleAllocator {
    /// Returns the next unused handle.
    #[must_use]
    pub fn allocate(&mut self) -> CreatureHandle {
        let handle = CreatureHandle(self.next);
        self.next += 1;
        handle
    }
}

/// A creature fresh from a spawner, placed and registered.
#[derive(Debug)]
pub struct Spawned {
    /// Handle registered in the spawner's ledger.
    pub handle: CreatureHandle,
    /// The placed creature, physics enabled.
    pub creature: Creature,
    /// Where the creature was put and whether placement fell back.
    pub placement: Placement,
}

/// Time-gated dequeue loop for one spawner.
#[derive(Debug, Clone)]
pub struct SpawnScheduler {
    config: SpawnerConfig,
    queue: RespawnQueue,
    ledger: PopulationLedger,
    next_spawn_time: SimTime,
}

impl SpawnScheduler {
    /// Creates a scheduler whose queue holds `max_per_kind` shuffled requests
    /// per configured kind. The first spawn is due at `now`.
    pub fn new<R: Rng>(config: SpawnerConfig, rng: &mut R, now: SimTime) -> Self {
        let queue = RespawnQueue::seeded(&config.kinds, config.max_per_kind, rng);
        Self::with_queue(config, queue, now)
    }

    /// Creates a scheduler around an explicit queue.
    #[must_use]
    pub fn with_queue(config: SpawnerConfig, queue: RespawnQueue, now: SimTime) -> Self {
        Self {
            config,
            queue,
            ledger: PopulationLedger::default(),
            next_spawn_time: now,
        }
    }

    /// Spawns the next queued kind once the spawn interval has elapsed.
    /// An empty queue is the steady state and does nothing.
    pub fn tick<R: Rng>(
        &mut self,
        now: SimTime,
        profiles: &KindProfiles,
        ground: &dyn GroundResolver,
        handles: &mut HandleAllocator,
        rng: &mut R,
    ) -> Option<Spawned> {
        if now < self.next_spawn_time {
            return None;
        }
        let kind = self.queue.pop()?;
        let profile = profiles.get(kind);
        let mut creature = Creature::new(kind, profile, now);
        let placement = resolve_spawn_position(&self.config, profile.foot_offset, ground, rng);
        creature.place(placement.position);

        let handle = handles.allocate();
        self.ledger.insert(kind, handle);
        self.next_spawn_time = after(now, self.config.spawn_interval);
        debug!(
            "spawner {} placed {kind} {handle} at {}",
            self.config.name, placement.position
        );
        Some(Spawned {
            handle,
            creature,
            placement,
        })
    }

    /// Removes a dead creature and queues its replacement. Returns `false`
    /// (and queues nothing) for handles this spawner is not tracking.
    pub fn on_creature_died(&mut self, kind: CreatureKind, handle: CreatureHandle) -> bool {
        if !self.ledger.remove(kind, handle) {
            debug!(
                "spawner {} ignored death of untracked {kind} {handle}",
                self.config.name
            );
            return false;
        }
        self.queue.push(kind);
        true
    }

    /// Adds one request to the back of the queue.
    pub fn request(&mut self, kind: CreatureKind) {
        self.queue.push(kind);
    }

    /// Spawner name used in logs.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Configuration this scheduler was built from.
    #[must_use]
    pub const fn config(&self) -> &SpawnerConfig {
        &self.config
    }

    /// Kinds waiting to spawn, front first.
    #[must_use]
    pub const fn queue(&self) -> &RespawnQueue {
        &self.queue
    }

    /// Live creatures this spawner placed.
    #[must_use]
    pub const fn ledger(&self) -> &PopulationLedger {
        &self.ledger
    }

    /// Earliest time the next queued kind may spawn.
    #[must_use]
    pub const fn next_spawn_time(&self) -> SimTime {
        self.next_spawn_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ground::FlatGround;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rstest::{fixture, rstest};

    struct Rig {
        profiles: KindProfiles,
        ground: FlatGround,
        handles: HandleAllocator,
        rng: StdRng,
    }

    #[fixture]
    fn rig() -> Rig {
        Rig {
            profiles: KindProfiles::default(),
            ground: FlatGround::new(0.0),
            handles: HandleAllocator::default(),
            rng: StdRng::seed_from_u64(17),
        }
    }

    fn tick(scheduler: &mut SpawnScheduler, rig: &mut Rig, now: SimTime) -> Option<Spawned> {
        scheduler.tick(now, &rig.profiles, &rig.ground, &mut rig.handles, &mut rig.rng)
    }

    fn goblin_lair() -> SpawnerConfig {
        SpawnerConfig {
            kinds: vec![CreatureKind::Goblin],
            ..SpawnerConfig::lair()
        }
    }

    #[rstest]
    fn spawns_are_gated_by_interval(mut rig: Rig) {
        let mut scheduler = SpawnScheduler::new(goblin_lair(), &mut rig.rng, 0.0);
        assert!(tick(&mut scheduler, &mut rig, 0.0).is_some());
        assert!(tick(&mut scheduler, &mut rig, 1.0).is_none());
        assert!(tick(&mut scheduler, &mut rig, 2.0).is_some());
        assert_eq!(scheduler.queue().len(), 3);
        assert_eq!(scheduler.ledger().count(CreatureKind::Goblin), 2);
    }

    #[rstest]
    fn spawned_creatures_are_placed_with_physics_on(mut rig: Rig) {
        let mut scheduler = SpawnScheduler::new(goblin_lair(), &mut rig.rng, 0.0);
        let spawned = tick(&mut scheduler, &mut rig, 0.0).expect("first spawn");
        assert!(spawned.creature.body().physics_enabled);
        assert_eq!(spawned.creature.spawn_origin(), spawned.placement.position);
        assert!(scheduler
            .ledger()
            .contains(CreatureKind::Goblin, spawned.handle));
    }

    #[rstest]
    fn empty_queue_is_a_no_op(mut rig: Rig) {
        let mut scheduler =
            SpawnScheduler::with_queue(goblin_lair(), RespawnQueue::default(), 0.0);
        assert!(tick(&mut scheduler, &mut rig, 10.0).is_none());
        assert!(scheduler.next_spawn_time() <= 0.0, "timer untouched");
    }

    #[rstest]
    fn death_round_trip_conserves_population(mut rig: Rig) {
        let mut scheduler =
            SpawnScheduler::with_queue(goblin_lair(), RespawnQueue::default(), 0.0);
        let before = scheduler.queue().count(CreatureKind::Fox);
        scheduler.request(CreatureKind::Fox);
        let spawned = tick(&mut scheduler, &mut rig, 0.0).expect("fox spawns");
        assert_eq!(spawned.creature.kind(), CreatureKind::Fox);
        assert!(scheduler.on_creature_died(CreatureKind::Fox, spawned.handle));
        assert_eq!(scheduler.queue().count(CreatureKind::Fox), before + 1);
    }

    #[rstest]
    fn repeated_or_foreign_deaths_enqueue_nothing(mut rig: Rig) {
        let mut scheduler = SpawnScheduler::new(goblin_lair(), &mut rig.rng, 0.0);
        let spawned = tick(&mut scheduler, &mut rig, 0.0).expect("spawn");
        assert!(scheduler.on_creature_died(CreatureKind::Goblin, spawned.handle));
        assert!(!scheduler.on_creature_died(CreatureKind::Goblin, spawned.handle));
        assert!(!scheduler.on_creature_died(CreatureKind::Goblin, CreatureHandle(999)));
        assert_eq!(scheduler.queue().count(CreatureKind::Goblin), 5);
    }

    #[rstest]
    fn handles_are_unique_across_spawners(mut rig: Rig) {
        let mut lair = SpawnScheduler::new(goblin_lair(), &mut rig.rng, 0.0);
        let mut meadow = SpawnScheduler::new(SpawnerConfig::meadow(), &mut rig.rng, 0.0);
        let first = tick(&mut lair, &mut rig, 0.0).expect("lair spawn");
        let second = tick(&mut meadow, &mut rig, 0.0).expect("meadow spawn");
        assert_ne!(first.handle, second.handle);
        assert!(!second.creature.kind().is_monster());
    }
}
