//! The simulated creature and its read-only views.
//!
//! A [`Creature`] bundles its body, health, clock, tasks and the per-kind
//! behaviour. State transitions live in [`crate::machine`]; this module only
//! constructs creatures and exposes what collaborators may read.

use std::fmt;

use glam::{Quat, Vec3};
use log::debug;
use serde::Serialize;

use crate::behavior::{behavior_for, KindBehavior};
use crate::clock::{BehaviorClock, SimTime};
use crate::config::KindProfile;
use crate::kind::CreatureKind;
use crate::physics::Body;
use crate::tasks::{TaskList, TeardownStyle};

/// Stable identifier handed out by spawners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CreatureHandle(pub u64);

impl fmt::Display for CreatureHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Top-level behaviour state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CreatureState {
    /// Moving under the kind's patrol rhythm.
    Patrol,
    /// Standing still between patrol moves.
    Paused,
    /// Chasing (monsters) or fleeing (animals).
    Aggro,
    /// Frozen facing the player for the attack window.
    Attacking,
    /// Locomotion frozen after a hit.
    Stunned,
    /// Death teardown in progress.
    Dying,
    /// Teardown finished; awaiting removal.
    Dead,
}

impl CreatureState {
    /// `true` for the two states that block damage and decisions.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Dying | Self::Dead)
    }
}

/// Hit points for damageable kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Health {
    /// Remaining hit points; may go negative.
    pub current: i32,
    /// Hit points at spawn.
    pub max: i32,
}

impl Health {
    /// Health at its maximum.
    #[must_use]
    pub const fn full(max: i32) -> Self {
        Self { current: max, max }
    }

    /// `true` at zero or below.
    #[must_use]
    pub const fn is_depleted(&self) -> bool {
        self.current <= 0
    }
}

/// One simulated monster or animal.
pub struct Creature {
    pub(crate) kind: CreatureKind,
    pub(crate) profile: KindProfile,
    pub(crate) body: Body,
    pub(crate) spawn_origin: Vec3,
    pub(crate) placed: bool,
    pub(crate) move_direction: Vec3,
    pub(crate) state: CreatureState,
    pub(crate) health: Option<Health>,
    pub(crate) clock: BehaviorClock,
    pub(crate) engaged: bool,
    pub(crate) returning_home: bool,
    pub(crate) last_hit_origin: Option<Vec3>,
    pub(crate) tasks: TaskList,
    pub(crate) behavior: Box<dyn KindBehavior>,
}

impl fmt::Debug for Creature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Creature")
            .field("kind", &self.kind)
            .field("state", &self.state)
            .field("position", &self.body.position)
            .field("health", &self.health)
            .field("engaged", &self.engaged)
            .finish_non_exhaustive()
    }
}

impl Creature {
    /// Creates a creature with physics disabled, awaiting [`Creature::place`].
    ///
    /// Monsters start at full health; animals carry no health at all.
    #[must_use]
    pub fn new(kind: CreatureKind, profile: &KindProfile, now: SimTime) -> Self {
        let health = if kind.is_monster() {
            profile.max_health.map(|max| Health::full(max.max(1)))
        } else {
            None
        };
        let mut body = Body::at(Vec3::ZERO);
        body.physics_enabled = false;
        Self {
            kind,
            profile: *profile,
            body,
            spawn_origin: Vec3::ZERO,
            placed: false,
            move_direction: Vec3::X,
            state: CreatureState::Patrol,
            health,
            clock: BehaviorClock::started_at(now),
            engaged: false,
            returning_home: false,
            last_hit_origin: None,
            tasks: TaskList::default(),
            behavior: behavior_for(kind),
        }
    }

    /// Convenience for tests and tools: a creature already placed at
    /// `position`.
    #[must_use]
    pub fn placed_at(
        kind: CreatureKind,
        profile: &KindProfile,
        position: Vec3,
        now: SimTime,
    ) -> Self {
        let mut creature = Self::new(kind, profile, now);
        creature.place(position);
        creature
    }

    /// Puts the creature at its spawn position, fixes its roam origin and
    /// re-enables physics. Only the first call has any effect.
    pub fn place(&mut self, position: Vec3) {
        if self.placed {
            debug!("{} already placed; ignoring move to {position}", self.kind);
            return;
        }
        self.body.position = position;
        self.spawn_origin = position;
        self.placed = true;
        self.body.physics_enabled = true;
    }

    /// Moves the body without touching the spawn origin. Ignored once dead.
    pub fn set_position(&mut self, position: Vec3) {
        if self.state == CreatureState::Dead {
            return;
        }
        self.body.position = position;
    }

    /// Creature kind.
    #[must_use]
    pub const fn kind(&self) -> CreatureKind {
        self.kind
    }

    /// Top-level state.
    #[must_use]
    pub const fn state(&self) -> CreatureState {
        self.state
    }

    /// Whether the creature is currently pursuing (or fleeing) the player.
    #[must_use]
    pub const fn is_aggro(&self) -> bool {
        self.engaged && !self.state.is_terminal()
    }

    /// `false` once dying.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        !self.state.is_terminal()
    }

    /// `true` once the death sequence has completed.
    #[must_use]
    pub const fn is_dead(&self) -> bool {
        matches!(self.state, CreatureState::Dead)
    }

    /// Body origin in world space.
    #[must_use]
    pub const fn position(&self) -> Vec3 {
        self.body.position
    }

    /// Facing rotation.
    #[must_use]
    pub const fn orientation(&self) -> Quat {
        self.body.orientation
    }

    /// Where the creature was placed; the roam bound is measured from here.
    #[must_use]
    pub const fn spawn_origin(&self) -> Vec3 {
        self.spawn_origin
    }

    /// Current horizontal heading.
    #[must_use]
    pub const fn move_direction(&self) -> Vec3 {
        self.move_direction
    }

    /// Hit points; `None` for animals.
    #[must_use]
    pub const fn health(&self) -> Option<Health> {
        self.health
    }

    /// Behaviour deadlines.
    #[must_use]
    pub const fn clock(&self) -> &BehaviorClock {
        &self.clock
    }

    /// Physics body.
    #[must_use]
    pub const fn body(&self) -> &Body {
        &self.body
    }

    /// Tuning the creature was built with.
    #[must_use]
    pub const fn profile(&self) -> &KindProfile {
        &self.profile
    }

    /// Horizontal speed for walk-cycle animation.
    #[must_use]
    pub fn horizontal_speed(&self) -> f32 {
        self.body.horizontal_speed()
    }

    /// Completed fraction of the death sequence while dying; `1.0` once dead.
    #[must_use]
    pub fn death_progress(&self) -> Option<f32> {
        match self.state {
            CreatureState::Dead => Some(1.0),
            _ => self.tasks.death_progress(),
        }
    }

    /// How the body is torn down when it dies.
    #[must_use]
    pub fn teardown_style(&self) -> TeardownStyle {
        self.tasks
            .teardown_style()
            .unwrap_or_else(|| TeardownStyle::for_kind(self.kind))
    }

    /// Lowest extent below the body origin.
    #[must_use]
    pub const fn foot_offset(&self) -> f32 {
        self.profile.foot_offset
    }
}
