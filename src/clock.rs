//! Per-creature timer bookkeeping.
//!
//! All fields are absolute simulation times in `f64` seconds, so deadlines
//! keep sub-millisecond resolution over long sessions. Durations added to
//! them stay `f32`. The clock holds no logic beyond simple comparisons; the
//! state machine decides when to move each deadline.

/// Absolute simulation time, in seconds since the simulation started.
pub type SimTime = f64;

/// The instant `seconds` after `now`.
///
/// # Examples
/// ```
/// use menagerie::clock::after;
/// assert_eq!(after(300_000.0, 0.5), 300_000.5);
/// ```
#[must_use]
pub fn after(now: SimTime, seconds: f32) -> SimTime {
    now + SimTime::from(seconds)
}

/// Deadlines a creature polls every logic step.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BehaviorClock {
    /// Next patrol decision (heading change, pause, resume, hop).
    pub next_decision: SimTime,
    /// Secondary kind-specific timer, such as a bird's swoop.
    pub next_flourish: SimTime,
    /// Locomotion stays frozen until this time.
    pub stun_end: SimTime,
    /// Earliest time the next attack may start.
    pub attack_ready_at: SimTime,
    /// End of the currently open attack window.
    pub attack_window_end: SimTime,
    /// When the player was last seen leaving aggro range; `None` while in range.
    pub aggro_lost_at: Option<SimTime>,
    /// Next anti-sink ground probe.
    pub next_ground_check: SimTime,
}

impl BehaviorClock {
    /// Clock for a creature created at `now`; the first decision is due
    /// immediately.
    #[must_use]
    pub const fn started_at(now: SimTime) -> Self {
        Self {
            next_decision: now,
            next_flourish: now,
            stun_end: now,
            attack_ready_at: now,
            attack_window_end: now,
            aggro_lost_at: None,
            next_ground_check: now,
        }
    }

    /// `true` once the next patrol decision is due.
    #[must_use]
    pub fn decision_due(&self, now: SimTime) -> bool {
        now >= self.next_decision
    }

    /// `true` until the stun expires.
    #[must_use]
    pub fn stunned(&self, now: SimTime) -> bool {
        now < self.stun_end
    }

    /// `true` once the attack cooldown has elapsed.
    #[must_use]
    pub fn attack_ready(&self, now: SimTime) -> bool {
        now >= self.attack_ready_at
    }

    /// Seconds the player has been continuously out of range, or zero.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "Out-of-range spans are seconds long, well inside f32 range."
    )]
    pub fn out_of_range_for(&self, now: SimTime) -> f32 {
        self.aggro_lost_at
            .map_or(0.0, |since| (now - since).max(0.0) as f32)
    }

    /// Returns `true` and schedules the next probe when a ground check is due.
    pub fn take_ground_check(&mut self, now: SimTime, interval: f32) -> bool {
        if now < self.next_ground_check {
            return false;
        }
        self.next_ground_check = after(now, interval);
        true
    }
}
