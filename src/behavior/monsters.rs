//! Monster patrol variants.

use glam::Vec3;

use super::{BehaviorCtx, Gait, KindBehavior};
use crate::clock::after;
use crate::config::KindProfile;

/// Seconds between goblin heading changes.
const GOBLIN_TURN: (f32, f32) = (1.0, 2.0);
/// Seconds a skeleton walks before resting.
const SKELETON_WALK: (f32, f32) = (2.0, 4.0);
/// Seconds a skeleton rests between walks.
const SKELETON_REST: f32 = 1.5;
/// Seconds between patrol hops.
const SLIME_PATROL_HOP: (f32, f32) = (0.5, 1.0);
/// Seconds between hops while chasing.
const SLIME_CHASE_HOP: (f32, f32) = (0.35, 0.6);

/// Wanders continuously, picking a fresh random heading every second or two.
#[derive(Debug, Clone, Copy, Default)]
pub struct Goblin;

impl KindBehavior for Goblin {
    fn patrol(&mut self, ctx: &mut BehaviorCtx<'_>) -> Gait {
        if ctx.clock.decision_due(ctx.now) {
            ctx.pick_heading();
            ctx.decide_in(GOBLIN_TURN.0, GOBLIN_TURN.1);
        }
        Gait::Walk(ctx.profile.patrol_speed)
    }

    fn on_bounds_exceeded(&mut self, ctx: &mut BehaviorCtx<'_>) {
        ctx.pick_heading();
        ctx.decide_in(GOBLIN_TURN.0, GOBLIN_TURN.1);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum SkeletonPhase {
    Walking,
    /// Initial phase, so the first decision starts a walk.
    #[default]
    Resting,
}

/// Walks slowly for a few seconds, then rests briefly.
#[derive(Debug, Clone, Copy, Default)]
pub struct Skeleton {
    phase: SkeletonPhase,
}

impl Skeleton {
    fn start_walk(&mut self, ctx: &mut BehaviorCtx<'_>) {
        self.phase = SkeletonPhase::Walking;
        ctx.pick_heading();
        ctx.decide_in(SKELETON_WALK.0, SKELETON_WALK.1);
    }
}

impl KindBehavior for Skeleton {
    fn patrol(&mut self, ctx: &mut BehaviorCtx<'_>) -> Gait {
        if ctx.clock.decision_due(ctx.now) {
            match self.phase {
                SkeletonPhase::Walking => {
                    self.phase = SkeletonPhase::Resting;
                    ctx.clock.next_decision = after(ctx.now, SKELETON_REST);
                }
                SkeletonPhase::Resting => self.start_walk(ctx),
            }
        }
        match self.phase {
            SkeletonPhase::Walking => Gait::Walk(ctx.profile.patrol_speed),
            SkeletonPhase::Resting => Gait::Still,
        }
    }

    fn on_bounds_exceeded(&mut self, ctx: &mut BehaviorCtx<'_>) {
        self.start_walk(ctx);
    }

    fn on_aggro_enter(&mut self) {
        self.phase = SkeletonPhase::Walking;
    }

    fn strike(&mut self, profile: &KindProfile) -> Option<i32> {
        profile.attack.map(|attack| attack.damage)
    }
}

/// Moves only by hopping, and only while grounded.
#[derive(Debug, Clone, Copy, Default)]
pub struct Slime;

impl Slime {
    /// Hops along the current heading when due and grounded. An airborne
    /// slime keeps its decision pending until it lands.
    fn hop_if_due(ctx: &mut BehaviorCtx<'_>, cadence: (f32, f32)) {
        let Some(hop) = ctx.profile.hop else {
            return;
        };
        if !ctx.clock.decision_due(ctx.now) {
            return;
        }
        if ctx.queue_hop(hop) {
            ctx.decide_in(cadence.0, cadence.1);
        }
    }
}

impl KindBehavior for Slime {
    fn patrol(&mut self, ctx: &mut BehaviorCtx<'_>) -> Gait {
        if ctx.clock.decision_due(ctx.now) && ctx.body.grounded && !ctx.tasks.hop_pending() {
            ctx.pick_heading();
        }
        Self::hop_if_due(ctx, SLIME_PATROL_HOP);
        Gait::Hopping
    }

    fn pursue(&mut self, ctx: &mut BehaviorCtx<'_>, threat: Option<Vec3>) -> Gait {
        if let Some(target) = threat {
            ctx.face_towards(target);
        }
        Self::hop_if_due(ctx, SLIME_CHASE_HOP);
        Gait::Hopping
    }

    fn on_bounds_exceeded(&mut self, ctx: &mut BehaviorCtx<'_>) {
        ctx.pick_heading();
        ctx.clock.next_decision = ctx.now;
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::Harness;
    use super::*;
    use crate::config::KindProfiles;
    use rstest::rstest;

    #[rstest]
    fn goblin_turns_on_its_cadence() {
        let mut harness = Harness::new(KindProfiles::default().goblin);
        let mut goblin = Goblin;
        let gait = goblin.patrol(&mut harness.ctx(0.0));
        assert_eq!(gait, Gait::Walk(3.0));
        let next = harness.clock.next_decision;
        assert!((1.0..=2.0).contains(&next), "next decision at {next}");
        let heading = harness.heading;
        goblin.patrol(&mut harness.ctx(0.5));
        assert_eq!(harness.heading, heading, "no turn before the decision");
    }

    #[rstest]
    fn skeleton_alternates_walking_and_resting() {
        let mut harness = Harness::new(KindProfiles::default().skeleton);
        let mut skeleton = Skeleton::default();
        assert_eq!(skeleton.patrol(&mut harness.ctx(0.0)), Gait::Walk(1.5));
        let rest_at = harness.clock.next_decision;
        assert!((2.0..=4.0).contains(&rest_at));
        assert_eq!(skeleton.patrol(&mut harness.ctx(rest_at)), Gait::Still);
        let resume_at = harness.clock.next_decision;
        assert!((resume_at - rest_at - f64::from(SKELETON_REST)).abs() < 1e-5);
        assert_eq!(skeleton.patrol(&mut harness.ctx(resume_at)), Gait::Walk(1.5));
    }

    #[rstest]
    fn resting_skeleton_resumes_when_out_of_bounds() {
        let mut harness = Harness::new(KindProfiles::default().skeleton);
        let mut skeleton = Skeleton::default();
        skeleton.patrol(&mut harness.ctx(0.0));
        let rest_at = harness.clock.next_decision;
        skeleton.patrol(&mut harness.ctx(rest_at));
        harness.homeward = Some(Vec3::NEG_X);
        skeleton.on_bounds_exceeded(&mut harness.ctx(rest_at + 0.1));
        assert_eq!(harness.heading, Vec3::NEG_X);
        assert_eq!(skeleton.patrol(&mut harness.ctx(rest_at + 0.2)), Gait::Walk(1.5));
    }

    #[rstest]
    fn slime_hops_only_from_the_ground() {
        let mut harness = Harness::new(KindProfiles::default().slime);
        let mut slime = Slime;
        harness.body.grounded = false;
        assert_eq!(slime.patrol(&mut harness.ctx(0.0)), Gait::Hopping);
        assert!(harness.tasks.is_empty());
        assert!(harness.clock.decision_due(0.0), "decision waits for landing");

        harness.body.grounded = true;
        slime.patrol(&mut harness.ctx(0.1));
        assert!(harness.tasks.hop_pending());
        assert!(!harness.clock.decision_due(0.1));
    }

    #[rstest]
    fn slime_chase_hop_aims_at_threat() {
        let mut harness = Harness::new(KindProfiles::default().slime);
        let mut slime = Slime;
        slime.pursue(&mut harness.ctx(0.0), Some(Vec3::new(0.0, 0.0, -4.0)));
        let mut body = harness.body.clone();
        let events = harness.tasks.advance(1.0, &mut body);
        assert_eq!(events.len(), 1);
        assert!(body.velocity.z < 0.0);
        assert!(body.velocity.y > 0.0);
    }
}
