//! Shared behaviour state machine.
//!
//! Every kind runs the same top-level machine:
//!
//! ```text
//! Patrol <-> Paused
//!   |  player in aggro range, or hit
//!   v
//! Aggro <-> Attacking        (any live state) -- hit --> Stunned -> Aggro
//!   |  out of range for the cooldown                           |
//!   v                                                          v
//! Patrol                              health <= 0 --> Dying --> Dead
//! ```
//!
//! Kind-specific decisions are delegated to the creature's
//! [`crate::behavior::KindBehavior`].

use glam::Vec3;
use log::{debug, info, trace};
use rand::rngs::StdRng;

use crate::behavior::{BehaviorCtx, Gait, KindBehavior};
use crate::clock::{after, SimTime};
use crate::config::{AttackProfile, SimConfig};
use crate::creature::{Creature, CreatureState};
use crate::ground::{check_ground, GroundCheck, GroundResolver};
use crate::tasks::{StepTask, TaskEvent};
use crate::vector_math::{direction_towards, facing, horizontal_distance};

/// Indicator colour for a survivable hit on a monster.
pub const HIT_COLOR: [f32; 3] = [1.0, 1.0, 1.0];
/// Indicator colour for the hit that kills.
pub const LETHAL_COLOR: [f32; 3] = [1.0, 0.25, 0.2];
/// Indicator colour for hits on creatures without health.
pub const UNHARMED_COLOR: [f32; 3] = [0.7, 0.7, 0.7];

/// Inputs shared by every creature during one logic step.
pub struct StepContext<'a> {
    /// Simulation time at the start of this step.
    pub now: SimTime,
    /// Seconds covered by this step.
    pub dt: f32,
    /// Player position; `None` disables proximity aggro and attacks.
    pub player: Option<Vec3>,
    /// Terrain for anti-sink checks.
    pub ground: &'a dyn GroundResolver,
    /// Simulation tuning.
    pub config: &'a SimConfig,
    /// Shared simulation RNG.
    pub rng: &'a mut StdRng,
}

/// What one logic step produced for the outside world.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepReport {
    /// Damage dealt to the player by a strike that opened this step.
    pub player_damage: Option<i32>,
    /// Set on the single step the death sequence completes.
    pub died: bool,
    /// Outcome of the anti-sink check, when one ran.
    pub ground_check: Option<GroundCheck>,
}

/// Data for the floating damage indicator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageReport {
    /// Damage after clamping negatives to zero.
    pub amount: i32,
    /// Where to float the number.
    pub position: Vec3,
    /// Indicator colour.
    pub color: [f32; 3],
    /// The hit started the death sequence.
    pub lethal: bool,
}

impl Creature {
    /// Runs one logic step.
    pub fn tick(&mut self, ctx: &mut StepContext<'_>) -> StepReport {
        let mut report = StepReport::default();
        if self.state == CreatureState::Dead {
            return report;
        }
        let now = ctx.now;

        for event in self.tasks.advance(ctx.dt, &mut self.body) {
            match event {
                TaskEvent::DeathComplete => self.finish_dying(&mut report),
                TaskEvent::Hopped(impulse) => trace!("{} hopped with {impulse}", self.kind),
                TaskEvent::HopAbandoned => trace!("{} hop abandoned mid-air", self.kind),
            }
        }
        if self.state == CreatureState::Dead {
            return report;
        }

        if self.placed
            && self
                .clock
                .take_ground_check(now, ctx.config.ground_check_interval)
        {
            report.ground_check = Some(check_ground(
                &mut self.body,
                self.profile.foot_offset,
                ctx.ground,
                ctx.config.ground_tolerance(),
            ));
        }

        if self.state != CreatureState::Dying && self.health.is_some_and(|h| h.is_depleted()) {
            self.begin_dying(ctx.config.death_sequence_duration);
        }
        if self.state == CreatureState::Dying {
            self.body.locomotion = Vec3::ZERO;
            return report;
        }

        let player_distance = ctx
            .player
            .map(|player| self.body.position.distance(player));
        let in_range = matches!(
            (player_distance, self.profile.aggro_range),
            (Some(distance), Some(range)) if distance <= range
        );
        self.track_aggro(now, in_range, ctx.config.aggro_cooldown);

        if self.clock.stunned(now) {
            self.state = CreatureState::Stunned;
            self.body.locomotion = Vec3::ZERO;
            return report;
        }
        if self.state == CreatureState::Stunned {
            self.state = if self.engaged {
                CreatureState::Aggro
            } else {
                CreatureState::Patrol
            };
        }

        if self.state == CreatureState::Attacking {
            if now < self.clock.attack_window_end {
                self.body.locomotion = Vec3::ZERO;
                if let Some(player) = ctx.player {
                    self.turn_towards(player);
                }
                self.body.orientation = facing(self.move_direction);
                return report;
            }
            self.state = CreatureState::Aggro;
        }

        if self.engaged {
            self.state = CreatureState::Aggro;
            let threat = ctx.player.or(self.last_hit_origin);
            let gait = self.drive(ctx, None, |behavior, bctx| behavior.pursue(bctx, threat));
            self.body.locomotion = self.move_direction * gait.speed();
            if let (Some(attack), Some(distance), Some(player)) =
                (self.profile.attack, player_distance, ctx.player)
            {
                if distance <= attack.range && self.clock.attack_ready(now) {
                    report.player_damage = self.open_attack(now, attack, player);
                }
            }
        } else {
            let homeward = self.homeward(ctx.config.max_roam_distance);
            if homeward.is_some() && !self.returning_home {
                self.returning_home = true;
                debug!(
                    "{} strayed past its roam bound at {}; heading home",
                    self.kind, self.body.position
                );
                self.drive(ctx, homeward, |behavior, bctx| {
                    behavior.on_bounds_exceeded(bctx);
                });
            }
            let gait = self.drive(ctx, homeward, |behavior, bctx| behavior.patrol(bctx));
            if let Some(home) = homeward {
                self.move_direction = home;
            }
            self.state = if gait == Gait::Still {
                CreatureState::Paused
            } else {
                CreatureState::Patrol
            };
            self.body.locomotion = self.move_direction * gait.speed();
        }

        self.body.orientation = facing(self.move_direction);
        report
    }

    /// Applies a hit. Returns the indicator data, or `None` when the
    /// creature is already dying or dead.
    pub fn apply_damage(
        &mut self,
        amount: i32,
        hit_origin: Vec3,
        now: SimTime,
        config: &SimConfig,
    ) -> Option<DamageReport> {
        if self.state.is_terminal() {
            trace!("{} ignored a hit while {:?}", self.kind, self.state);
            return None;
        }
        let dealt = amount.max(0);
        let lethal = self.health.as_mut().is_some_and(|health| {
            health.current = health.current.saturating_sub(dealt);
            health.is_depleted()
        });

        self.tasks.cancel_hops();
        self.body.locomotion = Vec3::ZERO;
        self.clock.stun_end = after(now, config.stun_duration);
        self.state = CreatureState::Stunned;
        self.last_hit_origin = Some(hit_origin);
        self.clock.aggro_lost_at = None;
        if !self.engaged {
            self.engage();
        }

        let away = direction_towards(hit_origin, self.body.position);
        self.body
            .apply_impulse(away * config.knockback_force + Vec3::Y * config.knockback_lift);

        let color = match (self.health, lethal) {
            (None, _) => UNHARMED_COLOR,
            (Some(_), true) => LETHAL_COLOR,
            (Some(_), false) => HIT_COLOR,
        };
        debug!(
            "{} took {dealt} damage (health {:?})",
            self.kind,
            self.health.map(|h| h.current)
        );
        if lethal {
            self.begin_dying(config.death_sequence_duration);
        }
        Some(DamageReport {
            amount: dealt,
            position: self.body.position,
            color,
            lethal,
        })
    }

    /// Runs `f` with the creature's behaviour and a view of its state.
    fn drive<R>(
        &mut self,
        ctx: &mut StepContext<'_>,
        homeward: Option<Vec3>,
        f: impl FnOnce(&mut dyn KindBehavior, &mut BehaviorCtx<'_>) -> R,
    ) -> R {
        let mut bctx = BehaviorCtx {
            now: ctx.now,
            profile: &self.profile,
            clock: &mut self.clock,
            body: &mut self.body,
            tasks: &mut self.tasks,
            heading: &mut self.move_direction,
            rng: &mut *ctx.rng,
            homeward,
        };
        f(self.behavior.as_mut(), &mut bctx)
    }

    /// Direction home while beyond the roam bound. Clears the returning
    /// flag once back inside.
    fn homeward(&mut self, max_roam: f32) -> Option<Vec3> {
        if horizontal_distance(self.body.position, self.spawn_origin) <= max_roam {
            self.returning_home = false;
            return None;
        }
        let home = direction_towards(self.body.position, self.spawn_origin);
        (home != Vec3::ZERO).then_some(home)
    }

    fn track_aggro(&mut self, now: SimTime, in_range: bool, cooldown: f32) {
        if in_range {
            self.clock.aggro_lost_at = None;
            if !self.engaged {
                self.engage();
            }
            return;
        }
        if !self.engaged {
            return;
        }
        self.clock.aggro_lost_at.get_or_insert(now);
        if self.clock.out_of_range_for(now) >= cooldown
            && self.state != CreatureState::Attacking
        {
            self.disengage(now);
        }
    }

    fn engage(&mut self) {
        self.engaged = true;
        self.behavior.on_aggro_enter();
        debug!("{} became aggro", self.kind);
    }

    fn disengage(&mut self, now: SimTime) {
        self.engaged = false;
        self.clock.aggro_lost_at = None;
        self.clock.next_decision = now;
        debug!("{} calmed down", self.kind);
    }

    fn open_attack(&mut self, now: SimTime, attack: AttackProfile, player: Vec3) -> Option<i32> {
        self.state = CreatureState::Attacking;
        self.clock.attack_window_end = after(now, attack.window);
        self.clock.attack_ready_at = after(now, attack.cooldown);
        self.body.locomotion = Vec3::ZERO;
        self.turn_towards(player);
        let damage = self.behavior.strike(&self.profile);
        if let Some(amount) = damage {
            debug!("{} strikes the player for {amount}", self.kind);
        }
        damage
    }

    fn turn_towards(&mut self, target: Vec3) {
        let towards = direction_towards(self.body.position, target);
        if towards != Vec3::ZERO {
            self.move_direction = towards;
        }
    }

    fn begin_dying(&mut self, duration: f32) {
        let style = self.teardown_style();
        self.state = CreatureState::Dying;
        self.body.locomotion = Vec3::ZERO;
        self.tasks.clear();
        self.tasks.spawn(StepTask::Death {
            style,
            elapsed: 0.0,
            duration,
        });
        info!("{} is dying ({style:?})", self.kind);
    }

    fn finish_dying(&mut self, report: &mut StepReport) {
        self.state = CreatureState::Dead;
        self.body.locomotion = Vec3::ZERO;
        self.body.velocity = Vec3::ZERO;
        self.body.physics_enabled = false;
        self.tasks.clear();
        report.died = true;
        info!("{} died at {}", self.kind, self.body.position);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KindProfiles;
    use crate::ground::FlatGround;
    use crate::kind::CreatureKind;
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rstest::{fixture, rstest};

    struct Arena {
        config: SimConfig,
        ground: FlatGround,
        rng: StdRng,
    }

    #[fixture]
    fn arena() -> Arena {
        Arena {
            config: SimConfig::default(),
            ground: FlatGround::new(0.0),
            rng: StdRng::seed_from_u64(3),
        }
    }

    fn spawn(kind: CreatureKind) -> Creature {
        let profile = *KindProfiles::default().get(kind);
        let standing = Vec3::new(0.0, profile.foot_offset, 0.0);
        Creature::placed_at(kind, &profile, standing, 0.0)
    }

    fn step(
        creature: &mut Creature,
        arena: &mut Arena,
        now: SimTime,
        player: Option<Vec3>,
    ) -> StepReport {
        let mut ctx = StepContext {
            now,
            dt: 0.1,
            player,
            ground: &arena.ground,
            config: &arena.config,
            rng: &mut arena.rng,
        };
        creature.tick(&mut ctx)
    }

    #[rstest]
    fn goblin_chases_then_calms_after_cooldown(mut arena: Arena) {
        let mut goblin = spawn(CreatureKind::Goblin);
        let near = Vec3::new(5.0, 0.5, 0.0);
        step(&mut goblin, &mut arena, 0.0, Some(near));
        assert_eq!(goblin.state(), CreatureState::Aggro);
        assert!(goblin.is_aggro());
        assert_relative_eq!(goblin.body().locomotion.x, 4.0, epsilon = 1e-5);

        let far = Some(Vec3::new(50.0, 0.5, 0.0));
        step(&mut goblin, &mut arena, 0.1, far);
        step(&mut goblin, &mut arena, 3.0, far);
        assert_eq!(goblin.state(), CreatureState::Aggro, "cooldown not yet elapsed");
        step(&mut goblin, &mut arena, 3.2, far);
        assert_eq!(goblin.state(), CreatureState::Patrol);
        assert!(!goblin.is_aggro());
    }

    #[rstest]
    fn returning_in_range_restarts_the_cooldown(mut arena: Arena) {
        let mut goblin = spawn(CreatureKind::Goblin);
        let near = Some(Vec3::new(5.0, 0.5, 0.0));
        let far = Some(Vec3::new(50.0, 0.5, 0.0));
        step(&mut goblin, &mut arena, 0.0, near);
        step(&mut goblin, &mut arena, 1.0, far);
        step(&mut goblin, &mut arena, 3.5, near);
        step(&mut goblin, &mut arena, 3.6, far);
        step(&mut goblin, &mut arena, 5.0, far);
        assert!(goblin.is_aggro());
    }

    #[rstest]
    fn missing_player_never_triggers_aggro(mut arena: Arena) {
        let mut skeleton = spawn(CreatureKind::Skeleton);
        for i in 0_u8..20 {
            let now = f64::from(i) * 0.1;
            let report = step(&mut skeleton, &mut arena, now, None);
            assert!(report.player_damage.is_none());
        }
        assert!(!skeleton.is_aggro());
    }

    #[rstest]
    fn hit_stuns_knocks_back_and_aggroes(mut arena: Arena) {
        let mut goblin = spawn(CreatureKind::Goblin);
        step(&mut goblin, &mut arena, 0.0, None);
        let report = goblin
            .apply_damage(2, Vec3::new(-1.0, 0.5, 0.0), 0.0, &arena.config)
            .expect("live goblin takes damage");
        assert_eq!(report.amount, 2);
        assert_eq!(report.color, HIT_COLOR);
        assert!(!report.lethal);
        assert_eq!(goblin.health().map(|h| h.current), Some(4));
        assert_eq!(goblin.state(), CreatureState::Stunned);
        assert!(goblin.is_aggro());
        assert!(goblin.body().velocity.x > 0.0, "knocked away from the hit");
        assert!(goblin.body().velocity.y > 0.0, "knockback lifts");

        step(&mut goblin, &mut arena, 0.2, None);
        assert_eq!(goblin.state(), CreatureState::Stunned);
        assert_eq!(goblin.body().locomotion, Vec3::ZERO);

        step(&mut goblin, &mut arena, 0.5, None);
        assert_eq!(goblin.state(), CreatureState::Aggro);
    }

    #[rstest]
    fn negative_damage_is_clamped(arena: Arena) {
        let mut slime = spawn(CreatureKind::Slime);
        let report = slime
            .apply_damage(-5, Vec3::ZERO, 0.0, &arena.config)
            .expect("hit registers");
        assert_eq!(report.amount, 0);
        assert_eq!(slime.health().map(|h| h.current), Some(4));
    }

    #[rstest]
    fn lethal_hit_dies_exactly_once(mut arena: Arena) {
        let mut goblin = spawn(CreatureKind::Goblin);
        let report = goblin
            .apply_damage(6, Vec3::ZERO, 0.0, &arena.config)
            .expect("live goblin takes damage");
        assert!(report.lethal);
        assert_eq!(report.color, LETHAL_COLOR);
        assert_eq!(goblin.state(), CreatureState::Dying);
        assert!(!goblin.is_aggro());
        assert!(goblin.apply_damage(3, Vec3::ZERO, 0.1, &arena.config).is_none());

        let mut deaths = 0;
        for i in 1_u8..=30 {
            let now = f64::from(i) * 0.1;
            if step(&mut goblin, &mut arena, now, None).died {
                deaths += 1;
            }
        }
        assert_eq!(deaths, 1);
        assert!(goblin.is_dead());
        assert_eq!(goblin.death_progress(), Some(1.0));
        assert!(goblin.apply_damage(3, Vec3::ZERO, 4.0, &arena.config).is_none());
    }

    #[rstest]
    fn dead_creatures_do_not_move(mut arena: Arena) {
        let mut goblin = spawn(CreatureKind::Goblin);
        goblin.apply_damage(100, Vec3::ZERO, 0.0, &arena.config);
        for i in 1_u8..=15 {
            step(&mut goblin, &mut arena, f64::from(i) * 0.1, None);
        }
        let resting = goblin.position();
        goblin.set_position(Vec3::splat(9.0));
        step(&mut goblin, &mut arena, 5.0, Some(Vec3::ZERO));
        assert_eq!(goblin.position(), resting);
        assert!(!goblin.body().physics_enabled);
    }

    #[rstest]
    fn skeleton_strikes_on_cooldown(mut arena: Arena) {
        let mut skeleton = spawn(CreatureKind::Skeleton);
        let player = Some(Vec3::new(1.0, 0.9, 0.0));
        let first = step(&mut skeleton, &mut arena, 0.0, player);
        assert_eq!(first.player_damage, Some(2));
        assert_eq!(skeleton.state(), CreatureState::Attacking);

        assert!(step(&mut skeleton, &mut arena, 0.1, player).player_damage.is_none());
        step(&mut skeleton, &mut arena, 0.6, player);
        assert_eq!(skeleton.state(), CreatureState::Aggro);
        assert!(step(&mut skeleton, &mut arena, 1.0, player).player_damage.is_none());
        assert_eq!(step(&mut skeleton, &mut arena, 1.5, player).player_damage, Some(2));
    }

    #[rstest]
    fn attack_window_finishes_even_when_player_walks_off(mut arena: Arena) {
        let mut skeleton = spawn(CreatureKind::Skeleton);
        step(&mut skeleton, &mut arena, 0.0, Some(Vec3::new(1.0, 0.9, 0.0)));
        assert_eq!(skeleton.state(), CreatureState::Attacking);

        let far = Some(Vec3::new(50.0, 0.9, 0.0));
        step(&mut skeleton, &mut arena, 0.1, far);
        assert_eq!(skeleton.state(), CreatureState::Attacking);
        assert_eq!(skeleton.body().locomotion, Vec3::ZERO);
        step(&mut skeleton, &mut arena, 0.4, far);
        assert_eq!(skeleton.state(), CreatureState::Attacking);

        step(&mut skeleton, &mut arena, 0.6, far);
        assert_eq!(skeleton.state(), CreatureState::Aggro);
        assert!(skeleton.is_aggro(), "cooldown has not elapsed");
    }

    #[rstest]
    fn hit_during_attack_window_stuns_without_a_second_strike(mut arena: Arena) {
        let mut skeleton = spawn(CreatureKind::Skeleton);
        let player = Some(Vec3::new(1.0, 0.9, 0.0));
        assert_eq!(step(&mut skeleton, &mut arena, 0.0, player).player_damage, Some(2));
        assert_eq!(skeleton.state(), CreatureState::Attacking);

        skeleton
            .apply_damage(1, Vec3::new(2.0, 0.9, 0.0), 0.1, &arena.config)
            .expect("attacking skeleton takes damage");
        assert_eq!(skeleton.state(), CreatureState::Stunned);

        let stunned = step(&mut skeleton, &mut arena, 0.2, player);
        assert_eq!(skeleton.state(), CreatureState::Stunned);
        assert!(stunned.player_damage.is_none());

        let recovered = step(&mut skeleton, &mut arena, 0.6, player);
        assert_eq!(skeleton.state(), CreatureState::Aggro);
        assert!(recovered.player_damage.is_none());
        for i in 7_u8..15 {
            let waiting = step(&mut skeleton, &mut arena, f64::from(i) * 0.1, player);
            assert!(waiting.player_damage.is_none(), "struck again at step {i}");
        }
        assert_eq!(step(&mut skeleton, &mut arena, 1.5, player).player_damage, Some(2));
    }

    #[rstest]
    fn goblin_attacks_without_damage(mut arena: Arena) {
        let mut goblin = spawn(CreatureKind::Goblin);
        let report = step(&mut goblin, &mut arena, 0.0, Some(Vec3::new(1.0, 0.5, 0.0)));
        assert_eq!(goblin.state(), CreatureState::Attacking);
        assert!(report.player_damage.is_none());
    }

    #[rstest]
    fn struck_animal_flees_from_hit(mut arena: Arena) {
        let mut deer = spawn(CreatureKind::Deer);
        let report = deer
            .apply_damage(3, Vec3::new(0.0, 0.8, -2.0), 0.0, &arena.config)
            .expect("deer reacts");
        assert_eq!(report.color, UNHARMED_COLOR);
        assert!(deer.health().is_none());
        step(&mut deer, &mut arena, 0.5, None);
        assert_eq!(deer.state(), CreatureState::Aggro);
        assert!(deer.move_direction().z > 0.9, "flees away from the hit");
        assert_relative_eq!(deer.body().locomotion.length(), 5.0, epsilon = 1e-4);
    }

    #[rstest]
    fn animals_ignore_player_proximity(mut arena: Arena) {
        let mut rabbit = spawn(CreatureKind::Rabbit);
        step(&mut rabbit, &mut arena, 0.0, Some(Vec3::new(0.5, 0.15, 0.0)));
        assert!(!rabbit.is_aggro());
    }

    #[rstest]
    fn straying_past_roam_bound_turns_home_once(mut arena: Arena) {
        let mut goblin = spawn(CreatureKind::Goblin);
        step(&mut goblin, &mut arena, 0.0, None);
        goblin.set_position(Vec3::new(20.0, 0.5, 0.0));

        step(&mut goblin, &mut arena, 5.0, None);
        assert_eq!(goblin.state(), CreatureState::Patrol);
        assert_relative_eq!(goblin.move_direction().x, -1.0, epsilon = 1e-5);
        let reset = goblin.clock().next_decision;
        assert!((6.0..=7.0).contains(&reset), "fresh interval, got {reset}");

        step(&mut goblin, &mut arena, 5.5, None);
        assert_eq!(goblin.clock().next_decision, reset, "reset fires once");
        assert!(goblin.body().locomotion.x < 0.0);
    }

    #[rstest]
    fn paused_skeleton_resumes_when_out_of_bounds(mut arena: Arena) {
        let mut skeleton = spawn(CreatureKind::Skeleton);
        step(&mut skeleton, &mut arena, 0.0, None);
        let rest_at = skeleton.clock().next_decision;
        step(&mut skeleton, &mut arena, rest_at, None);
        assert_eq!(skeleton.state(), CreatureState::Paused);

        skeleton.set_position(Vec3::new(0.0, 0.9, 30.0));
        step(&mut skeleton, &mut arena, rest_at + 0.1, None);
        assert_eq!(skeleton.state(), CreatureState::Patrol);
        assert!(skeleton.body().locomotion.z < 0.0);
    }

    #[rstest]
    fn sunken_creature_is_lifted_by_ground_check(mut arena: Arena) {
        let mut goblin = spawn(CreatureKind::Goblin);
        goblin.set_position(Vec3::new(0.0, -0.5, 0.0));
        let report = step(&mut goblin, &mut arena, 0.0, None);
        assert!(matches!(report.ground_check, Some(GroundCheck::Corrected { .. })));
        assert_relative_eq!(goblin.position().y, 0.5, epsilon = 1e-5);
    }
}
