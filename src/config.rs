//! Simulation configuration.
//!
//! Every tunable lives in [`SimConfig`]. Missing fields fall back to the
//! defaults in [`crate::constants`], so configuration files only need to name
//! the values they change.

use std::fs;
use std::path::Path;

use glam::Vec3;
use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    AGGRO_COOLDOWN, AIR_DRAG, ATTACK_WINDOW, DEATH_SEQUENCE_DURATION, FLOAT_TOLERANCE, GRAVITY,
    GROUNDED_EPSILON, GROUND_CHECK_INTERVAL, GROUND_DRAG, KNOCKBACK_FORCE, KNOCKBACK_LIFT,
    MAX_PER_KIND, MAX_PHYSICS_SUBSTEPS, MAX_ROAM_DISTANCE, MIN_SPAWN_DISTANCE, PHYSICS_TIMESTEP,
    PROBE_HEIGHT, SINK_TOLERANCE, SPAWN_CLEARANCE, SPAWN_INTERVAL, SPAWN_RADIUS, STEP_HEIGHT,
    STUN_DURATION,
};
use crate::ground::GroundTolerance;
use crate::kind::CreatureKind;
use crate::physics::PhysicsSettings;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not valid JSON for this schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    /// A value is out of range; the message names it.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Melee attack timings. `damage` is only dealt by kinds that strike.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttackProfile {
    /// Reach measured from the creature's origin to the player.
    pub range: f32,
    /// Damage per strike.
    pub damage: i32,
    /// Seconds from one attack start to the next.
    pub cooldown: f32,
    /// Seconds the creature stays frozen facing the player.
    #[serde(default = "default_attack_window")]
    pub window: f32,
}

const fn default_attack_window() -> f32 {
    ATTACK_WINDOW
}

/// Discrete hop impulses for kinds that move by hopping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HopProfile {
    /// Impulse along the hop heading.
    pub horizontal: f32,
    /// Upward impulse.
    pub vertical: f32,
}

/// Per-kind tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KindProfile {
    /// Speed of ordinary patrol movement.
    pub patrol_speed: f32,
    /// Speed of kind-specific bursts (dash, swoop, dart).
    pub burst_speed: f32,
    /// Speed while aggro: chasing for monsters, fleeing for animals.
    pub chase_speed: f32,
    /// Monsters only; animals ignore this.
    pub max_health: Option<i32>,
    /// Proximity trigger for aggro; `None` never triggers by proximity.
    pub aggro_range: Option<f32>,
    /// Melee timings; `None` for kinds that never attack.
    pub attack: Option<AttackProfile>,
    /// Hop impulses for kinds that move by hopping.
    pub hop: Option<HopProfile>,
    /// Distance from the body origin down to its lowest extent.
    pub foot_offset: f32,
}

impl Default for KindProfile {
    fn default() -> Self {
        Self {
            patrol_speed: 1.0,
            burst_speed: 1.0,
            chase_speed: 2.0,
            max_health: None,
            aggro_range: None,
            attack: None,
            hop: None,
            foot_offset: 0.5,
        }
    }
}

/// One [`KindProfile`] per creature kind.
///
/// A kind entry present in a config file replaces that kind's profile as a
/// whole; its omitted fields take [`KindProfile::default`], not the kind's
/// built-in tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KindProfiles {
    /// Goblin tuning.
    pub goblin: KindProfile,
    /// Skeleton tuning.
    pub skeleton: KindProfile,
    /// Slime tuning.
    pub slime: KindProfile,
    /// Rabbit tuning.
    pub rabbit: KindProfile,
    /// Squirrel tuning.
    pub squirrel: KindProfile,
    /// Bird tuning.
    pub bird: KindProfile,
    /// Deer tuning.
    pub deer: KindProfile,
    /// Fox tuning.
    pub fox: KindProfile,
}

impl KindProfiles {
    /// Profile for `kind`.
    #[must_use]
    pub const fn get(&self, kind: CreatureKind) -> &KindProfile {
        match kind {
            CreatureKind::Goblin => &self.goblin,
            CreatureKind::Skeleton => &self.skeleton,
            CreatureKind::Slime => &self.slime,
            CreatureKind::Rabbit => &self.rabbit,
            CreatureKind::Squirrel => &self.squirrel,
            CreatureKind::Bird => &self.bird,
            CreatureKind::Deer => &self.deer,
            CreatureKind::Fox => &self.fox,
        }
    }
}

impl Default for KindProfiles {
    fn default() -> Self {
        let animal = |patrol_speed, burst_speed, chase_speed, foot_offset| KindProfile {
            patrol_speed,
            burst_speed,
            chase_speed,
            foot_offset,
            ..KindProfile::default()
        };
        Self {
            goblin: KindProfile {
                patrol_speed: 3.0,
                burst_speed: 3.0,
                chase_speed: 4.0,
                max_health: Some(6),
                aggro_range: Some(8.0),
                attack: Some(AttackProfile {
                    range: 1.2,
                    damage: 0,
                    cooldown: 1.0,
                    window: 0.4,
                }),
                hop: None,
                foot_offset: 0.5,
            },
            skeleton: KindProfile {
                patrol_speed: 1.5,
                burst_speed: 1.5,
                chase_speed: 2.2,
                max_health: Some(10),
                aggro_range: Some(10.0),
                attack: Some(AttackProfile {
                    range: 1.8,
                    damage: 2,
                    cooldown: 1.5,
                    window: ATTACK_WINDOW,
                }),
                hop: None,
                foot_offset: 0.9,
            },
            slime: KindProfile {
                patrol_speed: 0.0,
                burst_speed: 0.0,
                chase_speed: 0.0,
                max_health: Some(4),
                aggro_range: Some(6.0),
                attack: Some(AttackProfile {
                    range: 1.0,
                    damage: 0,
                    cooldown: 1.2,
                    window: 0.3,
                }),
                hop: Some(HopProfile {
                    horizontal: 2.0,
                    vertical: 4.0,
                }),
                foot_offset: 0.3,
            },
            rabbit: animal(2.5, 4.0, 5.0, 0.15),
            squirrel: animal(3.0, 4.0, 4.5, 0.1),
            bird: animal(0.8, 4.0, 6.0, 0.1),
            deer: animal(1.5, 3.0, 5.0, 0.8),
            fox: animal(1.0, 3.5, 5.0, 0.3),
        }
    }
}

/// Fixed-step physics tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Seconds per physics substep.
    pub timestep: f32,
    /// Downward acceleration, positive.
    pub gravity: f32,
    /// Horizontal velocity decay rate while grounded.
    pub ground_drag: f32,
    /// Horizontal velocity decay rate while airborne.
    pub air_drag: f32,
    /// Ledges up to this height are climbed without stopping.
    pub step_height: f32,
    /// Feet within this distance of the ground count as grounded.
    pub grounded_epsilon: f32,
    /// Substeps per frame before the backlog is dropped.
    pub max_substeps: u32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            timestep: PHYSICS_TIMESTEP,
            gravity: GRAVITY,
            ground_drag: GROUND_DRAG,
            air_drag: AIR_DRAG,
            step_height: STEP_HEIGHT,
            grounded_epsilon: GROUNDED_EPSILON,
            max_substeps: MAX_PHYSICS_SUBSTEPS,
        }
    }
}

impl PhysicsConfig {
    /// Integrator view of this tuning.
    #[must_use]
    pub const fn settings(&self) -> PhysicsSettings {
        PhysicsSettings {
            timestep: self.timestep,
            gravity: self.gravity,
            ground_drag: self.ground_drag,
            air_drag: self.air_drag,
            step_height: self.step_height,
            grounded_epsilon: self.grounded_epsilon,
        }
    }
}

/// One spawner anchored to a structure in the world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnerConfig {
    /// Name used in logs and lookups.
    pub name: String,
    /// Structure position; its height is the placement fallback.
    pub center: [f32; 3],
    /// Kinds seeded into the queue.
    pub kinds: Vec<CreatureKind>,
    /// Seconds between spawns while the queue is non-empty.
    pub spawn_interval: f32,
    /// Outer radius of the placement annulus.
    pub spawn_radius: f32,
    /// Inner radius of the placement annulus.
    pub min_spawn_distance: f32,
    /// Queue entries seeded per kind.
    pub max_per_kind: usize,
    /// Placement probes start this far above the structure.
    pub probe_height: f32,
    /// Extra height above the ground a creature is placed at.
    pub clearance: f32,
}

impl Default for SpawnerConfig {
    fn default() -> Self {
        Self {
            name: "spawner".to_owned(),
            center: [0.0; 3],
            kinds: CreatureKind::MONSTERS.to_vec(),
            spawn_interval: SPAWN_INTERVAL,
            spawn_radius: SPAWN_RADIUS,
            min_spawn_distance: MIN_SPAWN_DISTANCE,
            max_per_kind: MAX_PER_KIND,
            probe_height: PROBE_HEIGHT,
            clearance: SPAWN_CLEARANCE,
        }
    }
}

impl SpawnerConfig {
    /// Structure position as a vector.
    #[must_use]
    pub fn center(&self) -> Vec3 {
        Vec3::from_array(self.center)
    }

    /// Monster lair at the world origin.
    #[must_use]
    pub fn lair() -> Self {
        Self {
            name: "lair".to_owned(),
            ..Self::default()
        }
    }

    /// Animal meadow east of the lair.
    #[must_use]
    pub fn meadow() -> Self {
        Self {
            name: "meadow".to_owned(),
            center: [40.0, 0.0, 0.0],
            kinds: CreatureKind::ANIMALS.to_vec(),
            max_per_kind: 3,
            ..Self::default()
        }
    }
}

/// Complete simulation tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Seconds out of range before an aggro creature calms down.
    pub aggro_cooldown: f32,
    /// Seconds locomotion stays frozen after a hit.
    pub stun_duration: f32,
    /// Horizontal leash from the spawn origin.
    pub max_roam_distance: f32,
    /// Horizontal impulse away from a hit.
    pub knockback_force: f32,
    /// Upward impulse on a hit.
    pub knockback_lift: f32,
    /// Seconds between anti-sink ground probes.
    pub ground_check_interval: f32,
    /// Depth below the ground tolerated before lifting.
    pub sink_tolerance: f32,
    /// Height above the ground tolerated before logging.
    pub float_tolerance: f32,
    /// Seconds the teardown animation runs.
    pub death_sequence_duration: f32,
    /// Physics tuning.
    pub physics: PhysicsConfig,
    /// Per-kind tuning.
    pub kinds: KindProfiles,
    /// Spawners, stepped in this order.
    pub spawners: Vec<SpawnerConfig>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            aggro_cooldown: AGGRO_COOLDOWN,
            stun_duration: STUN_DURATION,
            max_roam_distance: MAX_ROAM_DISTANCE,
            knockback_force: KNOCKBACK_FORCE,
            knockback_lift: KNOCKBACK_LIFT,
            ground_check_interval: GROUND_CHECK_INTERVAL,
            sink_tolerance: SINK_TOLERANCE,
            float_tolerance: FLOAT_TOLERANCE,
            death_sequence_duration: DEATH_SEQUENCE_DURATION,
            physics: PhysicsConfig::default(),
            kinds: KindProfiles::default(),
            spawners: vec![SpawnerConfig::lair(), SpawnerConfig::meadow()],
        }
    }
}

impl SimConfig {
    /// Parses and validates a JSON document.
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::Invalid`] when a value is out of range.
    ///
    /// # Examples
    /// ```
    /// use menagerie::config::SimConfig;
    /// let config = SimConfig::from_json_str(r#"{ "aggro_cooldown": 5.0 }"#).unwrap();
    /// assert_eq!(config.aggro_cooldown, 5.0);
    /// assert_eq!(config.spawners.len(), 2);
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON file.
    ///
    /// # Errors
    /// Returns [`ConfigError::Io`] when the file cannot be read, otherwise as
    /// [`SimConfig::from_json_str`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        let config = Self::from_json_str(&text)?;
        info!(
            "loaded simulation config from {} ({} spawners)",
            path.display(),
            config.spawners.len()
        );
        Ok(config)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] describing the first offending value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("aggro_cooldown", self.aggro_cooldown),
            ("ground_check_interval", self.ground_check_interval),
            ("death_sequence_duration", self.death_sequence_duration),
            ("physics.timestep", self.physics.timestep),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(format!("{name} must be positive, got {value}")));
            }
        }
        let non_negative = [
            ("stun_duration", self.stun_duration),
            ("max_roam_distance", self.max_roam_distance),
            ("sink_tolerance", self.sink_tolerance),
            ("float_tolerance", self.float_tolerance),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(invalid(format!("{name} must not be negative, got {value}")));
            }
        }
        for kind in CreatureKind::ALL {
            validate_profile(kind, self.kinds.get(kind))?;
        }
        for spawner in &self.spawners {
            validate_spawner(spawner)?;
        }
        Ok(())
    }

    /// Profile for `kind`.
    #[must_use]
    pub const fn profile(&self, kind: CreatureKind) -> &KindProfile {
        self.kinds.get(kind)
    }

    /// Sink and float tolerances for ground checks.
    #[must_use]
    pub const fn ground_tolerance(&self) -> GroundTolerance {
        GroundTolerance {
            sink: self.sink_tolerance,
            float: self.float_tolerance,
        }
    }
}

fn invalid(message: String) -> ConfigError {
    ConfigError::Invalid(message)
}

fn validate_profile(kind: CreatureKind, profile: &KindProfile) -> Result<(), ConfigError> {
    if kind.is_monster() && !matches!(profile.max_health, Some(health) if health > 0) {
        return Err(invalid(format!("{kind} needs positive max_health")));
    }
    if let Some(range) = profile.aggro_range {
        if !(range.is_finite() && range >= 0.0) {
            return Err(invalid(format!("{kind} aggro_range must not be negative")));
        }
    }
    if let Some(attack) = profile.attack {
        if attack.range < 0.0 || attack.cooldown < 0.0 || attack.window < 0.0 || attack.damage < 0
        {
            return Err(invalid(format!("{kind} attack values must not be negative")));
        }
    }
    if profile.foot_offset < 0.0 {
        return Err(invalid(format!("{kind} foot_offset must not be negative")));
    }
    Ok(())
}

fn validate_spawner(spawner: &SpawnerConfig) -> Result<(), ConfigError> {
    let name = &spawner.name;
    if !(spawner.spawn_interval.is_finite() && spawner.spawn_interval > 0.0) {
        return Err(invalid(format!("spawner {name} needs a positive spawn_interval")));
    }
    if spawner.min_spawn_distance < 0.0 || spawner.spawn_radius < spawner.min_spawn_distance {
        return Err(invalid(format!(
            "spawner {name} annulus [{}, {}] is inverted",
            spawner.min_spawn_distance, spawner.spawn_radius
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn defaults_validate() {
        SimConfig::default().validate().expect("defaults are valid");
    }

    #[rstest]
    fn partial_kind_overrides_keep_other_defaults() {
        let config = SimConfig::from_json_str(
            r#"{ "kinds": { "goblin": { "patrol_speed": 9.0, "max_health": 3 } } }"#,
        )
        .expect("parse config");
        assert_eq!(config.kinds.goblin.patrol_speed, 9.0);
        assert_eq!(config.kinds.goblin.max_health, Some(3));
        assert_eq!(config.kinds.skeleton, KindProfiles::default().skeleton);
    }

    #[rstest]
    #[case(r#"{ "aggro_cooldown": 0.0 }"#)]
    #[case(r#"{ "stun_duration": -1.0 }"#)]
    #[case(r#"{ "kinds": { "slime": { "max_health": 0 } } }"#)]
    #[case(r#"{ "spawners": [ { "spawn_radius": 1.0, "min_spawn_distance": 2.0 } ] }"#)]
    #[case(r#"{ "spawners": [ { "spawn_interval": 0.0 } ] }"#)]
    fn out_of_range_values_are_rejected(#[case] json: &str) {
        let err = SimConfig::from_json_str(json).expect_err("config should be rejected");
        assert!(matches!(err, ConfigError::Invalid(_)), "unexpected error {err}");
    }

    #[rstest]
    fn malformed_json_is_a_parse_error() {
        let err = SimConfig::from_json_str("{ not json").expect_err("parse should fail");
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[rstest]
    fn missing_file_is_an_io_error() {
        let err = SimConfig::load(Path::new("/definitely/not/here.json"))
            .expect_err("load should fail");
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[rstest]
    fn spawner_kinds_parse_by_name() {
        let config = SimConfig::from_json_str(
            r#"{ "spawners": [ { "name": "den", "kinds": ["fox", "deer"], "max_per_kind": 2 } ] }"#,
        )
        .expect("parse config");
        let den = config.spawners.first().expect("one spawner");
        assert_eq!(den.kinds, vec![CreatureKind::Fox, CreatureKind::Deer]);
        assert_eq!(den.spawn_interval, SPAWN_INTERVAL);
    }
}
