//! Configuration defaults and the typed settings read by the stepper each tick.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Default world extent in simulation units.
pub const DEFAULT_WORLD_WIDTH: f64 = 640.0;
pub const DEFAULT_WORLD_HEIGHT: f64 = 480.0;

/// Base of the simulation speed scale; effective speed is `BASE^exponent`.
pub const SIMULATION_SPEED_BASE: f64 = 10.0;

/// Largest magnitude the speed exponent may take; keeps the scaled step finite.
pub const MAX_SIMULATION_SPEED_EXPONENT: i32 = 6;

/// Fixed step used when variable timestep is disabled.
pub const DEFAULT_TIME_STEP: f64 = 1.0;

pub const DEFAULT_GRAVITY_VERTICAL_FORCE: f64 = 0.1;
pub const DEFAULT_GRAVITY_RADIAL_FORCE: f64 = 0.1;
pub const DEFAULT_SPRING_FORCE: f64 = 10.0;
pub const DEFAULT_SPRING_DAMPING: f64 = 0.5;
pub const DEFAULT_SPRING_DISTANCE: f64 = 100.0;
pub const DEFAULT_SPRING_MAX_DISTANCE: f64 = 150.0;
pub const DEFAULT_SPRING_MAX_CONNECTIONS: usize = 600_000;
pub const DEFAULT_BACKGROUND_FRICTION_FORCE: f64 = 1.0;

/// Density used for every shape-derived mass.
pub const DEFAULT_DENSITY: f64 = 1.0;

/// Fraction of speed kept when a body is reflected at the world edge.
pub const DEFAULT_BOUNDARY_DAMPING: f64 = 0.5;
pub const DEFAULT_RESTITUTION: f64 = 1.0;
pub const DEFAULT_FRICTION: f64 = 0.5;

/// Frame budget used for the slow-frame warning, in milliseconds.
pub const DEFAULT_FRAME_BUDGET_MS: f64 = 1000.0 / 30.0;

/// Collision response applied to every colliding disc pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CollisionType {
    #[default]
    Bounce,
    Merge,
}

impl CollisionType {
    pub fn cycle(self) -> Self {
        match self {
            CollisionType::Bounce => CollisionType::Merge,
            CollisionType::Merge => CollisionType::Bounce,
        }
    }
}

/// Axis-aligned world rectangle with its origin at the top-left corner, y pointing down.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldBounds {
    pub width: f64,
    pub height: f64,
}

impl Default for WorldBounds {
    fn default() -> Self {
        Self {
            width: DEFAULT_WORLD_WIDTH,
            height: DEFAULT_WORLD_HEIGHT,
        }
    }
}

/// Every tunable the stepper reads. Keys missing from a loaded document keep their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub collisions_enabled: bool,
    pub gravity_radial_enabled: bool,
    pub gravity_vertical_enabled: bool,
    pub background_friction_enabled: bool,
    pub springs_enabled: bool,
    pub paused: bool,
    pub variable_timestep: bool,

    pub gravity_vertical_force: f64,
    pub gravity_radial_force: f64,
    pub spring_force: f64,
    pub spring_damping: f64,
    /// Rest length of every spring.
    pub spring_distance: f64,
    /// Springs longer than this are severed. Zero disables severing.
    pub spring_max_distance: f64,
    /// Pairs closer than this get connected by the graph maintainer.
    pub spring_formation_distance: f64,
    /// Cap on both outgoing and incoming connections per body.
    pub spring_max_connections: usize,
    pub background_friction_force: f64,
    pub simulation_speed_exponent: i32,
    pub collision_type: CollisionType,
    pub frame_budget_ms: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            collisions_enabled: false,
            gravity_radial_enabled: false,
            gravity_vertical_enabled: false,
            background_friction_enabled: false,
            springs_enabled: true,
            paused: true,
            variable_timestep: true,
            gravity_vertical_force: DEFAULT_GRAVITY_VERTICAL_FORCE,
            gravity_radial_force: DEFAULT_GRAVITY_RADIAL_FORCE,
            spring_force: DEFAULT_SPRING_FORCE,
            spring_damping: DEFAULT_SPRING_DAMPING,
            spring_distance: DEFAULT_SPRING_DISTANCE,
            spring_max_distance: DEFAULT_SPRING_MAX_DISTANCE,
            spring_formation_distance: DEFAULT_SPRING_MAX_DISTANCE,
            spring_max_connections: DEFAULT_SPRING_MAX_CONNECTIONS,
            background_friction_force: DEFAULT_BACKGROUND_FRICTION_FORCE,
            simulation_speed_exponent: 0,
            collision_type: CollisionType::Bounce,
            frame_budget_ms: DEFAULT_FRAME_BUDGET_MS,
        }
    }
}

impl SimulationConfig {
    /// Parses a (possibly partial) JSON document of settings.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Wall-clock to simulation time ratio. Out-of-range exponents are clamped.
    pub fn time_scale(&self) -> f64 {
        SIMULATION_SPEED_BASE.powi(self.clamped_speed_exponent())
    }

    pub fn clamped_speed_exponent(&self) -> i32 {
        self.simulation_speed_exponent.clamp(
            -MAX_SIMULATION_SPEED_EXPONENT,
            MAX_SIMULATION_SPEED_EXPONENT,
        )
    }

    /// All force passes off; useful as a starting point for focused setups.
    pub fn quiescent() -> Self {
        Self {
            springs_enabled: false,
            paused: false,
            ..Self::default()
        }
    }
}

/// Settings consumed once at startup to populate the world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StartupConfig {
    pub number_of_objects: usize,
    pub radius: f64,
    pub seed: u64,
    pub bounds: WorldBounds,
    pub simulation: SimulationConfig,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            number_of_objects: 50,
            radius: 5.0,
            seed: 0,
            bounds: WorldBounds::default(),
            simulation: SimulationConfig::default(),
        }
    }
}

impl StartupConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SandboxError;

    #[test]
    fn partial_document_keeps_defaults() {
        let config = SimulationConfig::from_json_str(
            r#"{ "collisions_enabled": true, "spring_force": 2.5, "collision_type": "Merge" }"#,
        )
        .expect("valid json");

        assert!(config.collisions_enabled);
        assert_eq!(config.spring_force, 2.5);
        assert_eq!(config.collision_type, CollisionType::Merge);
        assert_eq!(config.spring_distance, DEFAULT_SPRING_DISTANCE);
        assert!(config.paused);
    }

    #[test]
    fn malformed_document_is_a_config_error() {
        let err = SimulationConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, SandboxError::Config(_)));
    }

    #[test]
    fn time_scale_follows_exponent() {
        let mut config = SimulationConfig::default();
        assert_eq!(config.time_scale(), 1.0);
        config.simulation_speed_exponent = 2;
        assert_eq!(config.time_scale(), 100.0);
        config.simulation_speed_exponent = -1;
        assert!((config.time_scale() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn time_scale_is_bounded() {
        let mut config = SimulationConfig::default();
        config.simulation_speed_exponent = 400;
        assert_eq!(config.time_scale(), 1e6);
        config.simulation_speed_exponent = -400;
        assert!(config.time_scale() > 0.0);
        assert!(config.time_scale().is_finite());
    }

    #[test]
    fn collision_type_cycles() {
        assert_eq!(CollisionType::Bounce.cycle(), CollisionType::Merge);
        assert_eq!(CollisionType::Merge.cycle(), CollisionType::Bounce);
    }

    #[test]
    fn startup_config_nests_simulation_settings() {
        let startup = StartupConfig::from_json_str(
            r#"{ "number_of_objects": 3, "simulation": { "gravity_vertical_enabled": true } }"#,
        )
        .expect("valid json");
        assert_eq!(startup.number_of_objects, 3);
        assert!(startup.simulation.gravity_vertical_enabled);
        assert_eq!(startup.bounds, WorldBounds::default());
    }
}
