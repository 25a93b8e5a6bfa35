//! Utility helpers for tests.

pub mod logs;
pub mod terrain;

use menagerie::{SimEvent, Simulation};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Deterministic RNG for tests that drive behaviour helpers directly.
#[must_use]
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Steps `sim` in increments of `dt` until `seconds` have elapsed and
/// returns every event drained along the way.
pub fn run_for(sim: &mut Simulation, seconds: f32, dt: f32) -> Vec<SimEvent> {
    let mut events = Vec::new();
    let mut elapsed = 0.0;
    while elapsed < seconds {
        sim.step(dt);
        events.extend(sim.drain_events());
        elapsed += dt;
    }
    events
}
