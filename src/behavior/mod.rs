//! Per-kind behaviour variants.
//!
//! The shared state machine in [`crate::machine`] owns the top-level states.
//! A [`KindBehavior`] fills in the parts that differ between kinds: how a
//! creature patrols, how it pursues or flees once aggro, whether it strikes,
//! and how it resets its own timers after straying past its roam bound.

mod animals;
mod monsters;

use std::fmt;

use glam::Vec3;
use rand::rngs::StdRng;
use rand::Rng;

use crate::clock::{after, BehaviorClock, SimTime};
use crate::config::{HopProfile, KindProfile};
use crate::constants::HOP_WINDUP;
use crate::kind::CreatureKind;
use crate::physics::Body;
use crate::tasks::{StepTask, TaskList};
use crate::vector_math::{direction_towards, random_heading};

pub use animals::{Bird, Deer, Fox, Rabbit, Squirrel};
pub use monsters::{Goblin, Skeleton, Slime};

/// How the creature wants to move this logic step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gait {
    /// Walk along the current heading at this speed.
    Walk(f32),
    /// Stand still; reported as [`crate::creature::CreatureState::Paused`]
    /// while patrolling.
    Still,
    /// Movement comes from hop impulses only.
    Hopping,
}

impl Gait {
    /// Locomotion speed for this gait.
    #[must_use]
    pub const fn speed(self) -> f32 {
        match self {
            Self::Walk(speed) => speed,
            Self::Still | Self::Hopping => 0.0,
        }
    }
}

/// Mutable view of a creature handed to its behaviour each step.
pub struct BehaviorCtx<'a> {
    /// Simulation time of this step.
    pub now: SimTime,
    /// Tuning for the creature's kind.
    pub profile: &'a KindProfile,
    /// The creature's deadlines.
    pub clock: &'a mut BehaviorClock,
    /// Physics body; behaviours only read it or queue hops.
    pub body: &'a mut Body,
    /// Pending multi-frame tasks.
    pub tasks: &'a mut TaskList,
    /// Horizontal move direction, unit length.
    pub heading: &'a mut Vec3,
    /// Shared simulation RNG.
    pub rng: &'a mut StdRng,
    /// Direction back to the spawn origin while beyond the roam bound.
    pub homeward: Option<Vec3>,
}

impl BehaviorCtx<'_> {
    /// Uniform sample from `[low, high]`.
    pub fn uniform(&mut self, low: f32, high: f32) -> f32 {
        if high <= low {
            return low;
        }
        self.rng.random_range(low..=high)
    }

    /// Picks a new heading: homeward while returning, otherwise random.
    pub fn pick_heading(&mut self) {
        *self.heading = match self.homeward {
            Some(home) => home,
            None => random_heading(&mut *self.rng),
        };
    }

    /// Points the heading at `target`, keeping the old one if they coincide.
    pub fn face_towards(&mut self, target: Vec3) {
        let towards = direction_towards(self.body.position, target);
        if towards != Vec3::ZERO {
            *self.heading = towards;
        }
    }

    /// Points the heading away from `threat`; random if they coincide.
    pub fn face_away_from(&mut self, threat: Vec3) {
        let away = direction_towards(threat, self.body.position);
        *self.heading = if away == Vec3::ZERO {
            random_heading(&mut *self.rng)
        } else {
            away
        };
    }

    /// Schedules the next decision a uniform `[low, high]` seconds ahead.
    pub fn decide_in(&mut self, low: f32, high: f32) {
        let wait = self.uniform(low, high);
        self.clock.next_decision = after(self.now, wait);
    }

    /// Queues a hop along the current heading. Returns `false` while
    /// airborne or when a hop is already winding up.
    pub fn queue_hop(&mut self, hop: HopProfile) -> bool {
        if !self.body.grounded || self.tasks.hop_pending() {
            return false;
        }
        let impulse = *self.heading * hop.horizontal + Vec3::Y * hop.vertical;
        self.tasks.spawn(StepTask::Hop {
            windup: HOP_WINDUP,
            impulse,
        });
        true
    }
}

/// Kind-specific decisions layered over the shared state machine.
pub trait KindBehavior: Send + Sync + fmt::Debug {
    /// Ambient movement while not aggro. Called every logic step.
    fn patrol(&mut self, ctx: &mut BehaviorCtx<'_>) -> Gait;

    /// Movement while aggro. `threat` is the player, or the last hit origin
    /// when no player is present. Monsters chase by default.
    fn pursue(&mut self, ctx: &mut BehaviorCtx<'_>, threat: Option<Vec3>) -> Gait {
        if let Some(target) = threat {
            ctx.face_towards(target);
        }
        Gait::Walk(ctx.profile.chase_speed)
    }

    /// Resets kind timers when the creature first strays past its roam
    /// bound, so it turns for home on a fresh interval.
    fn on_bounds_exceeded(&mut self, ctx: &mut BehaviorCtx<'_>);

    /// Called once on each transition into aggro.
    fn on_aggro_enter(&mut self) {}

    /// Damage dealt to the player when an attack window opens.
    fn strike(&mut self, _profile: &KindProfile) -> Option<i32> {
        None
    }
}

/// Builds the behaviour variant for `kind`.
#[must_use]
pub fn behavior_for(kind: CreatureKind) -> Box<dyn KindBehavior> {
    match kind {
        CreatureKind::Goblin => Box::new(Goblin),
        CreatureKind::Skeleton => Box::new(Skeleton::default()),
        CreatureKind::Slime => Box::new(Slime),
        CreatureKind::Rabbit => Box::new(Rabbit::default()),
        CreatureKind::Squirrel => Box::new(Squirrel::default()),
        CreatureKind::Bird => Box::new(Bird::default()),
        CreatureKind::Deer => Box::new(Deer::default()),
        CreatureKind::Fox => Box::new(Fox::default()),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! A self-contained context for exercising behaviours in isolation.

    use super::*;
    use rand::SeedableRng;

    pub struct Harness {
        pub profile: KindProfile,
        pub clock: BehaviorClock,
        pub body: Body,
        pub tasks: TaskList,
        pub heading: Vec3,
        pub rng: StdRng,
        pub homeward: Option<Vec3>,
    }

    impl Harness {
        pub fn new(profile: KindProfile) -> Self {
            let mut body = Body::at(Vec3::ZERO);
            body.grounded = true;
            Self {
                profile,
                clock: BehaviorClock::started_at(0.0),
                body,
                tasks: TaskList::default(),
                heading: Vec3::X,
                rng: StdRng::seed_from_u64(11),
                homeward: None,
            }
        }

        pub fn ctx(&mut self, now: SimTime) -> BehaviorCtx<'_> {
            BehaviorCtx {
                now,
                profile: &self.profile,
                clock: &mut self.clock,
                body: &mut self.body,
                tasks: &mut self.tasks,
                heading: &mut self.heading,
                rng: &mut self.rng,
                homeward: self.homeward,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::Harness;
    use super::*;
    use crate::config::KindProfiles;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    fn homeward_overrides_random_heading() {
        let mut harness = Harness::new(KindProfile::default());
        harness.homeward = Some(Vec3::NEG_Z);
        harness.ctx(0.0).pick_heading();
        assert_eq!(harness.heading, Vec3::NEG_Z);
    }

    #[rstest]
    fn fleeing_points_away_from_threat() {
        let mut harness = Harness::new(KindProfiles::default().rabbit);
        harness.ctx(0.0).face_away_from(Vec3::new(-2.0, 0.0, 0.0));
        assert_relative_eq!(harness.heading.x, 1.0);
    }

    #[rstest]
    fn default_pursuit_chases_at_chase_speed() {
        let profile = KindProfiles::default().goblin;
        let mut harness = Harness::new(profile);
        let mut goblin = Goblin;
        let gait = goblin.pursue(&mut harness.ctx(0.0), Some(Vec3::new(0.0, 0.0, 5.0)));
        assert_eq!(gait, Gait::Walk(profile.chase_speed));
        assert_relative_eq!(harness.heading.z, 1.0);
    }

    #[rstest]
    fn hops_queue_only_when_grounded() {
        let profile = KindProfiles::default().slime;
        let hop = profile.hop.expect("slime hops");
        let mut harness = Harness::new(profile);
        assert!(harness.ctx(0.0).queue_hop(hop));
        assert!(!harness.ctx(0.0).queue_hop(hop), "one hop at a time");
        harness.tasks.clear();
        harness.body.grounded = false;
        assert!(!harness.ctx(0.0).queue_hop(hop));
    }

    #[rstest]
    fn only_skeletons_strike() {
        let profiles = KindProfiles::default();
        for kind in CreatureKind::ALL {
            let mut behavior = behavior_for(kind);
            let damage = behavior.strike(profiles.get(kind));
            assert_eq!(damage.is_some(), kind == CreatureKind::Skeleton, "{kind}");
        }
    }
}
