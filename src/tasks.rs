//! Cooperative multi-frame tasks owned by a creature.
//!
//! A task keeps its own progress, advances once per logic step and reports
//! completion. Tasks live inside the creature, so destroying the creature
//! drops any task mid-flight without touching freed state.

use glam::Vec3;

use crate::kind::CreatureKind;
use crate::physics::Body;

/// How a creature's body comes apart while dying. Rendering is left to the
/// animation layer; the simulation only tracks progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeardownStyle {
    /// Parts fly apart (bones, limbs).
    Scatter,
    /// Body shrinks to nothing.
    Shrink,
    /// Body squashes flat into the ground.
    Flatten,
}

impl TeardownStyle {
    /// Teardown used by `kind`.
    #[must_use]
    pub const fn for_kind(kind: CreatureKind) -> Self {
        match kind {
            CreatureKind::Goblin | CreatureKind::Skeleton => Self::Scatter,
            CreatureKind::Slime => Self::Flatten,
            CreatureKind::Rabbit
            | CreatureKind::Squirrel
            | CreatureKind::Bird
            | CreatureKind::Deer
            | CreatureKind::Fox => Self::Shrink,
        }
    }
}

/// A single cooperative task.
#[derive(Debug, Clone, PartialEq)]
pub enum StepTask {
    /// Crouch for `windup` seconds, then launch with `impulse`.
    Hop {
        /// Seconds left before launch.
        windup: f32,
        /// Velocity change applied at launch.
        impulse: Vec3,
    },
    /// Teardown sequence running for `duration` seconds.
    Death {
        /// How the body comes apart.
        style: TeardownStyle,
        /// Seconds run so far.
        elapsed: f32,
        /// Total seconds.
        duration: f32,
    },
}

/// Completion reported by [`TaskList::advance`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TaskEvent {
    /// A hop launched with the given impulse.
    Hopped(Vec3),
    /// A hop expired while airborne and was abandoned.
    HopAbandoned,
    /// The death sequence finished.
    DeathComplete,
}

enum Progress {
    Running,
    Done(TaskEvent),
}

impl StepTask {
    fn step(&mut self, dt: f32, body: &mut Body) -> Progress {
        match self {
            Self::Hop { windup, impulse } => {
                *windup -= dt;
                if *windup > 0.0 {
                    return Progress::Running;
                }
                if !body.grounded {
                    return Progress::Done(TaskEvent::HopAbandoned);
                }
                body.apply_impulse(*impulse);
                Progress::Done(TaskEvent::Hopped(*impulse))
            }
            Self::Death {
                elapsed, duration, ..
            } => {
                *elapsed += dt;
                if *elapsed >= *duration {
                    Progress::Done(TaskEvent::DeathComplete)
                } else {
                    Progress::Running
                }
            }
        }
    }
}

/// Tasks currently running for one creature.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskList {
    tasks: Vec<StepTask>,
}

impl TaskList {
    /// Starts `task` on the next advance.
    pub fn spawn(&mut self, task: StepTask) {
        self.tasks.push(task);
    }

    /// Steps every task once and removes finished ones.
    pub fn advance(&mut self, dt: f32, body: &mut Body) -> Vec<TaskEvent> {
        let mut events = Vec::new();
        self.tasks.retain_mut(|task| match task.step(dt, body) {
            Progress::Running => true,
            Progress::Done(event) => {
                events.push(event);
                false
            }
        });
        events
    }

    /// Drops pending hops; used when a stun freezes movement.
    pub fn cancel_hops(&mut self) {
        self.tasks
            .retain(|task| !matches!(task, StepTask::Hop { .. }));
    }

    /// `true` while a hop is winding up.
    #[must_use]
    pub fn hop_pending(&self) -> bool {
        self.tasks
            .iter()
            .any(|task| matches!(task, StepTask::Hop { .. }))
    }

    /// Fraction of the death sequence completed, if one is running.
    #[must_use]
    pub fn death_progress(&self) -> Option<f32> {
        self.tasks.iter().find_map(|task| match task {
            StepTask::Death {
                elapsed, duration, ..
            } => Some((elapsed / duration.max(f32::EPSILON)).clamp(0.0, 1.0)),
            StepTask::Hop { .. } => None,
        })
    }

    /// Style of the running death sequence.
    #[must_use]
    pub fn teardown_style(&self) -> Option<TeardownStyle> {
        self.tasks.iter().find_map(|task| match task {
            StepTask::Death { style, .. } => Some(*style),
            StepTask::Hop { .. } => None,
        })
    }

    /// Number of running tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// `true` when nothing is running.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Drops every task.
    pub fn clear(&mut self) {
        self.tasks.clear();
    }
}
