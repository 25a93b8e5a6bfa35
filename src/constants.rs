//! Default tuning values shared across systems.
//!
//! Every value here seeds the matching field of [`crate::config::SimConfig`];
//! loaded configuration files override them per field.

/// Seconds the player must stay out of range before a creature calms down.
pub const AGGRO_COOLDOWN: f32 = 3.0;
/// Seconds of frozen locomotion after every hit.
pub const STUN_DURATION: f32 = 0.4;
/// Horizontal distance from the spawn origin a creature may wander.
pub const MAX_ROAM_DISTANCE: f32 = 15.0;
/// Horizontal knockback impulse applied on hit.
pub const KNOCKBACK_FORCE: f32 = 4.0;
/// Upward component added to every knockback impulse.
pub const KNOCKBACK_LIFT: f32 = 1.5;

/// Seconds between anti-sink ground probes for a single creature.
pub const GROUND_CHECK_INTERVAL: f32 = 0.15;
/// How far the lowest extent may dip below ground before it is corrected.
pub const SINK_TOLERANCE: f32 = 0.05;
/// Height above ground at which a creature is reported as floating.
pub const FLOAT_TOLERANCE: f32 = 0.5;

/// Fixed physics timestep in seconds.
pub const PHYSICS_TIMESTEP: f32 = 1.0 / 50.0;
/// Vertical acceleration in units per second squared.
pub const GRAVITY: f32 = -9.81;
/// Exponential decay rate of external velocity while grounded.
pub const GROUND_DRAG: f32 = 6.0;
/// Exponential decay rate of external velocity while airborne.
pub const AIR_DRAG: f32 = 0.5;
/// Largest upward ground change resolved by a single physics contact.
pub const STEP_HEIGHT: f32 = 0.3;
/// Gap below which a body counts as standing on the ground.
pub const GROUNDED_EPSILON: f32 = 0.02;
/// Maximum number of physics substeps per frame before time is dropped.
pub const MAX_PHYSICS_SUBSTEPS: u32 = 8;

/// Seconds between spawns from a single spawner.
pub const SPAWN_INTERVAL: f32 = 2.0;
/// Outer radius of the spawn annulus.
pub const SPAWN_RADIUS: f32 = 12.0;
/// Inner radius of the spawn annulus; keeps creatures off the structure.
pub const MIN_SPAWN_DISTANCE: f32 = 3.0;
/// Population target per kind for each spawner.
pub const MAX_PER_KIND: usize = 5;
/// Height above the structure from which placement probes start.
pub const PROBE_HEIGHT: f32 = 100.0;
/// Gap left between a freshly placed creature and the ground.
pub const SPAWN_CLEARANCE: f32 = 0.05;

/// Seconds a slime crouches before its hop impulse fires.
pub const HOP_WINDUP: f32 = 0.12;
/// Seconds a death teardown sequence takes.
pub const DEATH_SEQUENCE_DURATION: f32 = 1.0;
/// Seconds an attack window stays open once triggered.
pub const ATTACK_WINDOW: f32 = 0.5;
