//! Ambient animal variants. Animals never attack; once aggro they flee.

use std::f32::consts::FRAC_PI_3;

use glam::{Quat, Vec3};
use rand::Rng;

use super::{BehaviorCtx, Gait, KindBehavior};
use crate::clock::{after, SimTime};

const RABBIT_RUN: (f32, f32) = (0.5, 1.5);
const RABBIT_NIBBLE: (f32, f32) = (1.0, 3.0);
/// Chance that a rabbit run is a sprint at burst speed.
const RABBIT_SPRINT_CHANCE: f64 = 0.25;
const SQUIRREL_DART: (f32, f32) = (0.3, 1.0);
const SQUIRREL_FREEZE: (f32, f32) = (0.5, 2.0);
const BIRD_WALK: (f32, f32) = (1.0, 2.0);
const BIRD_PECK: (f32, f32) = (1.0, 3.0);
/// Seconds between swoops.
const BIRD_SWOOP_EVERY: (f32, f32) = (6.0, 12.0);
const BIRD_SWOOP_LENGTH: (f32, f32) = (0.8, 1.2);
const DEER_WALK: (f32, f32) = (3.0, 6.0);
const DEER_GRAZE: (f32, f32) = (4.0, 8.0);
const FOX_STALK: (f32, f32) = (2.0, 4.0);
const FOX_DASH: (f32, f32) = (0.5, 1.0);
const FOX_REST: (f32, f32) = (1.0, 3.0);

fn flee(ctx: &mut BehaviorCtx<'_>, threat: Option<Vec3>) -> Gait {
    if let Some(origin) = threat {
        ctx.face_away_from(origin);
    }
    Gait::Walk(ctx.profile.chase_speed)
}

/// Outcome of one [`Rhythm::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Beat {
    moving: bool,
    started: bool,
}

/// Alternating move/pause cycle shared by most animals. Starts paused, so
/// the first decision sets off moving.
#[derive(Debug, Clone, Copy, Default)]
struct Rhythm {
    moving: bool,
}

impl Rhythm {
    fn step(
        &mut self,
        ctx: &mut BehaviorCtx<'_>,
        move_for: (f32, f32),
        pause_for: (f32, f32),
    ) -> Beat {
        let mut started = false;
        if ctx.clock.decision_due(ctx.now) {
            if self.moving {
                self.moving = false;
                ctx.decide_in(pause_for.0, pause_for.1);
            } else {
                self.start(ctx, move_for);
                started = true;
            }
        }
        Beat {
            moving: self.moving,
            started,
        }
    }

    fn start(&mut self, ctx: &mut BehaviorCtx<'_>, move_for: (f32, f32)) {
        self.moving = true;
        ctx.pick_heading();
        ctx.decide_in(move_for.0, move_for.1);
    }
}

/// Short runs broken by long nibbling pauses; some runs are sprints.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rabbit {
    rhythm: Rhythm,
    sprinting: bool,
}

impl KindBehavior for Rabbit {
    fn patrol(&mut self, ctx: &mut BehaviorCtx<'_>) -> Gait {
        let beat = self.rhythm.step(ctx, RABBIT_RUN, RABBIT_NIBBLE);
        if beat.started {
            self.sprinting = ctx.rng.random_bool(RABBIT_SPRINT_CHANCE);
        }
        match (beat.moving, self.sprinting) {
            (false, _) => Gait::Still,
            (true, true) => Gait::Walk(ctx.profile.burst_speed),
            (true, false) => Gait::Walk(ctx.profile.patrol_speed),
        }
    }

    fn pursue(&mut self, ctx: &mut BehaviorCtx<'_>, threat: Option<Vec3>) -> Gait {
        flee(ctx, threat)
    }

    fn on_bounds_exceeded(&mut self, ctx: &mut BehaviorCtx<'_>) {
        self.sprinting = false;
        self.rhythm.start(ctx, RABBIT_RUN);
    }
}

/// Quick zig-zag darts with frozen pauses in between.
#[derive(Debug, Clone, Copy, Default)]
pub struct Squirrel {
    rhythm: Rhythm,
}

impl KindBehavior for Squirrel {
    fn patrol(&mut self, ctx: &mut BehaviorCtx<'_>) -> Gait {
        let previous = *ctx.heading;
        let beat = self.rhythm.step(ctx, SQUIRREL_DART, SQUIRREL_FREEZE);
        if beat.started && ctx.homeward.is_none() && previous != Vec3::ZERO {
            // Zig-zag: swerve off the last dart instead of a fresh heading.
            let swerve = ctx.uniform(-FRAC_PI_3, FRAC_PI_3);
            *ctx.heading = Quat::from_rotation_y(swerve) * previous;
        }
        if beat.moving {
            Gait::Walk(ctx.profile.patrol_speed)
        } else {
            Gait::Still
        }
    }

    fn pursue(&mut self, ctx: &mut BehaviorCtx<'_>, threat: Option<Vec3>) -> Gait {
        flee(ctx, threat)
    }

    fn on_bounds_exceeded(&mut self, ctx: &mut BehaviorCtx<'_>) {
        self.rhythm.start(ctx, SQUIRREL_DART);
    }
}

/// Walks and pecks on the ground, swooping off at burst speed every few
/// seconds.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bird {
    rhythm: Rhythm,
    swoop_armed: bool,
    swoop_until: Option<SimTime>,
}

impl Bird {
    fn arm_swoop(ctx: &mut BehaviorCtx<'_>) {
        let wait = ctx.uniform(BIRD_SWOOP_EVERY.0, BIRD_SWOOP_EVERY.1);
        ctx.clock.next_flourish = after(ctx.now, wait);
    }
}

impl KindBehavior for Bird {
    fn patrol(&mut self, ctx: &mut BehaviorCtx<'_>) -> Gait {
        if !self.swoop_armed {
            self.swoop_armed = true;
            Self::arm_swoop(ctx);
        }
        if let Some(until) = self.swoop_until {
            if ctx.now < until {
                return Gait::Walk(ctx.profile.burst_speed);
            }
            self.swoop_until = None;
        }
        if ctx.now >= ctx.clock.next_flourish {
            let length = ctx.uniform(BIRD_SWOOP_LENGTH.0, BIRD_SWOOP_LENGTH.1);
            self.swoop_until = Some(after(ctx.now, length));
            ctx.pick_heading();
            Self::arm_swoop(ctx);
            return Gait::Walk(ctx.profile.burst_speed);
        }
        if self.rhythm.step(ctx, BIRD_WALK, BIRD_PECK).moving {
            Gait::Walk(ctx.profile.patrol_speed)
        } else {
            Gait::Still
        }
    }

    fn pursue(&mut self, ctx: &mut BehaviorCtx<'_>, threat: Option<Vec3>) -> Gait {
        flee(ctx, threat)
    }

    fn on_bounds_exceeded(&mut self, ctx: &mut BehaviorCtx<'_>) {
        self.swoop_until = None;
        self.swoop_armed = true;
        Self::arm_swoop(ctx);
        self.rhythm.start(ctx, BIRD_WALK);
    }

    fn on_aggro_enter(&mut self) {
        self.swoop_until = None;
    }
}

/// Slow walks and long grazing stops.
#[derive(Debug, Clone, Copy, Default)]
pub struct Deer {
    rhythm: Rhythm,
}

impl KindBehavior for Deer {
    fn patrol(&mut self, ctx: &mut BehaviorCtx<'_>) -> Gait {
        if self.rhythm.step(ctx, DEER_WALK, DEER_GRAZE).moving {
            Gait::Walk(ctx.profile.patrol_speed)
        } else {
            Gait::Still
        }
    }

    fn pursue(&mut self, ctx: &mut BehaviorCtx<'_>, threat: Option<Vec3>) -> Gait {
        flee(ctx, threat)
    }

    fn on_bounds_exceeded(&mut self, ctx: &mut BehaviorCtx<'_>) {
        self.rhythm.start(ctx, DEER_WALK);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum FoxPhase {
    Stalking,
    Dashing,
    #[default]
    Resting,
}

/// Stalks slowly, dashes, then rests.
#[derive(Debug, Clone, Copy, Default)]
pub struct Fox {
    phase: FoxPhase,
}

impl Fox {
    fn stalk(&mut self, ctx: &mut BehaviorCtx<'_>) {
        self.phase = FoxPhase::Stalking;
        ctx.pick_heading();
        ctx.decide_in(FOX_STALK.0, FOX_STALK.1);
    }
}

impl KindBehavior for Fox {
    fn patrol(&mut self, ctx: &mut BehaviorCtx<'_>) -> Gait {
        if ctx.clock.decision_due(ctx.now) {
            match self.phase {
                FoxPhase::Stalking => {
                    self.phase = FoxPhase::Dashing;
                    ctx.decide_in(FOX_DASH.0, FOX_DASH.1);
                }
                FoxPhase::Dashing => {
                    self.phase = FoxPhase::Resting;
                    ctx.decide_in(FOX_REST.0, FOX_REST.1);
                }
                FoxPhase::Resting => self.stalk(ctx),
            }
        }
        match self.phase {
            FoxPhase::Stalking => Gait::Walk(ctx.profile.patrol_speed),
            FoxPhase::Dashing => Gait::Walk(ctx.profile.burst_speed),
            FoxPhase::Resting => Gait::Still,
        }
    }

    fn pursue(&mut self, ctx: &mut BehaviorCtx<'_>, threat: Option<Vec3>) -> Gait {
        flee(ctx, threat)
    }

    fn on_bounds_exceeded(&mut self, ctx: &mut BehaviorCtx<'_>) {
        self.stalk(ctx);
    }

    fn on_aggro_enter(&mut self) {
        self.phase = FoxPhase::Resting;
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::Harness;
    use super::*;
    use crate::config::KindProfiles;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    fn deer_walks_then_grazes() {
        let mut harness = Harness::new(KindProfiles::default().deer);
        let mut deer = Deer::default();
        assert_eq!(deer.patrol(&mut harness.ctx(0.0)), Gait::Walk(1.5));
        let graze_at = harness.clock.next_decision;
        assert!((3.0..=6.0).contains(&graze_at));
        assert_eq!(deer.patrol(&mut harness.ctx(graze_at)), Gait::Still);
        let resume_at = harness.clock.next_decision;
        assert!((4.0..=8.0).contains(&(resume_at - graze_at)));
    }

    #[rstest]
    fn fox_cycles_stalk_dash_rest() {
        let mut harness = Harness::new(KindProfiles::default().fox);
        let mut fox = Fox::default();
        assert_eq!(fox.patrol(&mut harness.ctx(0.0)), Gait::Walk(1.0));
        let dash_at = harness.clock.next_decision;
        assert_eq!(fox.patrol(&mut harness.ctx(dash_at)), Gait::Walk(3.5));
        let rest_at = harness.clock.next_decision;
        assert!((0.5..=1.0).contains(&(rest_at - dash_at)));
        assert_eq!(fox.patrol(&mut harness.ctx(rest_at)), Gait::Still);
    }

    #[rstest]
    fn bird_swoops_on_its_own_timer() {
        let mut harness = Harness::new(KindProfiles::default().bird);
        let mut bird = Bird::default();
        bird.patrol(&mut harness.ctx(0.0));
        let swoop_at = harness.clock.next_flourish;
        assert!((6.0..=12.0).contains(&swoop_at));
        assert_eq!(bird.patrol(&mut harness.ctx(swoop_at)), Gait::Walk(4.0));
        assert!(harness.clock.next_flourish >= swoop_at + 6.0);
        assert_eq!(bird.patrol(&mut harness.ctx(swoop_at + 0.5)), Gait::Walk(4.0));
    }

    #[rstest]
    fn bounds_reset_restarts_the_swoop_timer() {
        let mut harness = Harness::new(KindProfiles::default().bird);
        let mut bird = Bird::default();
        bird.patrol(&mut harness.ctx(0.0));
        harness.homeward = Some(Vec3::Z);
        bird.on_bounds_exceeded(&mut harness.ctx(5.0));
        assert!(harness.clock.next_flourish >= 11.0);
        assert_eq!(harness.heading, Vec3::Z);
        assert_eq!(bird.patrol(&mut harness.ctx(5.1)), Gait::Walk(0.8));
    }

    #[rstest]
    fn squirrel_darts_swerve_from_previous_heading() {
        let mut harness = Harness::new(KindProfiles::default().squirrel);
        harness.heading = Vec3::X;
        let mut squirrel = Squirrel::default();
        squirrel.patrol(&mut harness.ctx(0.0));
        assert_relative_eq!(harness.heading.length(), 1.0, epsilon = 1e-5);
        assert!(harness.heading.x >= 0.5 - 1e-5, "swerve stays within 60 degrees");
    }

    #[rstest]
    fn fleeing_animals_run_at_chase_speed() {
        let mut harness = Harness::new(KindProfiles::default().rabbit);
        let mut rabbit = Rabbit::default();
        let gait = rabbit.pursue(&mut harness.ctx(0.0), Some(Vec3::new(0.0, 0.0, 3.0)));
        assert_eq!(gait, Gait::Walk(5.0));
        assert_relative_eq!(harness.heading.z, -1.0);
    }
}
