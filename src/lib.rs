//! Particle Sandbox – interactive 2D particle physics for Rust.
//!
//! The crate simulates discs, convex polygons, static planes, procedural
//! tracks and simple vehicles under pairwise gravity, uniform gravity,
//! background drag and a self-growing graph of damped springs. Collisions
//! either bounce with restitution or merge discs together.
//!
//! [`SandboxWorld`] owns the bodies and runs one step at a time;
//! [`Simulation`] wraps it with the frame loop contract: a command queue
//! drained at tick boundaries, pause state, time scaling and frame stats.

pub mod collision;
pub mod config;
pub mod core;
pub mod dynamics;
pub mod error;
pub mod utils;
pub mod world;

use std::{collections::VecDeque, time::Duration};

use log::{info, warn};

pub use glam::DVec2;

pub use collision::{BroadPhase, CCDDetector, Contact, NarrowPhase};
pub use config::{CollisionType, SimulationConfig, StartupConfig, WorldBounds};
pub use crate::core::{Body, BodyKind, BodyShape, Color, Material, PlaneSide, TrackDesc, VehicleDesc};
pub use dynamics::{DampedSpring, ForceGenerator, Integrator, RadialGravity, SpringGraph};
pub use error::{Result, SandboxError};
pub use utils::{Arena, BodyId, FpsCounter, StepProfile};
pub use world::SandboxWorld;

use config::{DEFAULT_TIME_STEP, MAX_SIMULATION_SPEED_EXPONENT};
use utils::logging::warn_if_frame_budget_exceeded;

/// Requests applied to the world at the next tick boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SpawnBall {
        position: DVec2,
        radius: f64,
        velocity: DVec2,
        color: Color,
        is_active: bool,
    },
    SpawnPolygon {
        position: DVec2,
        velocity: DVec2,
        vertices: Vec<DVec2>,
        color: Color,
        is_active: bool,
    },
    SpawnPlane(PlaneSide),
    SpawnTrack(TrackDesc),
    SpawnVehicle {
        position: DVec2,
        velocity: DVec2,
        desc: VehicleDesc,
        color: Color,
    },
    DeleteAll,
    Reset,
    Exit,
}

/// What the frame loop should do after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Continue,
    RequestReset,
    RequestExit,
}

/// Scalar readout for overlays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationStats {
    pub body_count: usize,
    pub spring_edge_count: usize,
    pub elapsed_time: f64,
    pub fps: u32,
    pub paused: bool,
    /// Steps integrated since the world was created.
    pub steps_taken: u64,
}

/// High-level wrapper that owns a [`SandboxWorld`] and drives it frame by frame.
pub struct Simulation {
    world: SandboxWorld,
    startup: StartupConfig,
    commands: VecDeque<Command>,
    fps: FpsCounter,
}

impl Simulation {
    /// Creates an empty simulation with default bounds.
    pub fn new(config: SimulationConfig) -> Self {
        let startup = StartupConfig {
            number_of_objects: 0,
            simulation: config,
            ..StartupConfig::default()
        };
        Self::with_world(startup)
    }

    /// Creates a simulation and populates it from the startup settings.
    pub fn from_startup(startup: StartupConfig) -> Result<Self> {
        let mut simulation = Self::with_world(startup);
        simulation.populate()?;
        Ok(simulation)
    }

    fn with_world(startup: StartupConfig) -> Self {
        let world = SandboxWorld::new(startup.bounds, startup.simulation.clone(), startup.seed);
        Self {
            world,
            startup,
            commands: VecDeque::new(),
            fps: FpsCounter::new(),
        }
    }

    fn populate(&mut self) -> Result<()> {
        if self.startup.number_of_objects == 0 {
            return Ok(());
        }
        self.world
            .populate(self.startup.number_of_objects, self.startup.radius)
    }

    /// Borrows the simulated world.
    pub fn world(&self) -> &SandboxWorld {
        &self.world
    }

    /// Mutably borrows the simulated world.
    pub fn world_mut(&mut self) -> &mut SandboxWorld {
        &mut self.world
    }

    /// Current runtime configuration.
    pub fn config(&self) -> &SimulationConfig {
        self.world.config()
    }

    /// Runtime configuration, read again at the next tick.
    pub fn config_mut(&mut self) -> &mut SimulationConfig {
        self.world.config_mut()
    }

    /// Queues a command for the next tick.
    pub fn enqueue(&mut self, command: Command) {
        self.commands.push_back(command);
    }

    /// Queues a reset for the next tick.
    pub fn request_reset(&mut self) {
        self.enqueue(Command::Reset);
    }

    /// Queues an exit for the next tick.
    pub fn request_exit(&mut self) {
        self.enqueue(Command::Exit);
    }

    /// Number of commands waiting for the next tick.
    pub fn pending_commands(&self) -> usize {
        self.commands.len()
    }

    /// Runs one frame: drains queued commands, then steps the world unless
    /// paused. `frame` is the wall-clock duration of the previous frame.
    pub fn tick(&mut self, frame: Duration) -> StepOutcome {
        let time_scale = self.world.config().time_scale();
        let outcome = self.apply_commands();
        if outcome == StepOutcome::RequestExit {
            return outcome;
        }

        if !self.world.config().paused {
            let base = if self.world.config().variable_timestep {
                frame.as_secs_f64()
            } else {
                DEFAULT_TIME_STEP
            };
            let dt = base * time_scale;
            if dt.is_finite() {
                self.world.step(dt);
            } else {
                warn!("skipped step with non-finite dt {dt}");
            }
        }

        self.fps.record_frame(frame);
        warn_if_frame_budget_exceeded(frame, self.world.config().frame_budget_ms);
        outcome
    }

    fn apply_commands(&mut self) -> StepOutcome {
        let mut outcome = StepOutcome::Continue;
        while let Some(command) = self.commands.pop_front() {
            let spawned = match command {
                Command::SpawnBall {
                    position,
                    radius,
                    velocity,
                    color,
                    is_active,
                } => self
                    .world
                    .add_ball(position.x, position.y, radius, velocity.x, velocity.y, color, is_active)
                    .map(drop),
                Command::SpawnPolygon {
                    position,
                    velocity,
                    vertices,
                    color,
                    is_active,
                } => self
                    .world
                    .add_polygon(position.x, position.y, velocity.x, velocity.y, vertices, color, is_active)
                    .map(drop),
                Command::SpawnPlane(side) => {
                    self.world.add_plane(side);
                    Ok(())
                }
                Command::SpawnTrack(desc) => self
                    .world
                    .add_track(desc.point_count, desc.spacing, desc.thickness, desc.y_min, desc.y_max)
                    .map(drop),
                Command::SpawnVehicle {
                    position,
                    velocity,
                    desc,
                    color,
                } => self
                    .world
                    .add_vehicle(position.x, position.y, velocity.x, velocity.y, desc, color)
                    .map(drop),
                Command::DeleteAll => {
                    self.world.delete_all();
                    Ok(())
                }
                Command::Reset => {
                    info!("resetting simulation");
                    self.world.reset();
                    outcome = StepOutcome::RequestReset;
                    self.populate()
                }
                Command::Exit => {
                    info!("exit requested");
                    return StepOutcome::RequestExit;
                }
            };

            if let Err(err) = spawned {
                warn!("dropped queued command: {err}");
            }
        }
        outcome
    }

    /// Flips collision handling; returns the new state.
    pub fn toggle_collisions(&mut self) -> bool {
        let config = self.world.config_mut();
        config.collisions_enabled = !config.collisions_enabled;
        config.collisions_enabled
    }

    /// Flips pairwise gravity; returns the new state.
    pub fn toggle_radial_gravity(&mut self) -> bool {
        let config = self.world.config_mut();
        config.gravity_radial_enabled = !config.gravity_radial_enabled;
        config.gravity_radial_enabled
    }

    /// Flips uniform downward gravity; returns the new state.
    pub fn toggle_vertical_gravity(&mut self) -> bool {
        let config = self.world.config_mut();
        config.gravity_vertical_enabled = !config.gravity_vertical_enabled;
        config.gravity_vertical_enabled
    }

    /// Flips background drag; returns the new state.
    pub fn toggle_background_friction(&mut self) -> bool {
        let config = self.world.config_mut();
        config.background_friction_enabled = !config.background_friction_enabled;
        config.background_friction_enabled
    }

    /// Flips the spring graph; returns the new state.
    pub fn toggle_springs(&mut self) -> bool {
        let config = self.world.config_mut();
        config.springs_enabled = !config.springs_enabled;
        config.springs_enabled
    }

    /// Pauses or resumes stepping; returns whether the simulation is now paused.
    pub fn toggle_pause(&mut self) -> bool {
        let config = self.world.config_mut();
        config.paused = !config.paused;
        config.paused
    }

    /// Shifts the speed exponent by `delta`; effective speed is `10^exponent`.
    /// The exponent stays within `±MAX_SIMULATION_SPEED_EXPONENT`.
    pub fn change_simulation_speed(&mut self, delta: i32) -> f64 {
        let config = self.world.config_mut();
        config.simulation_speed_exponent = config
            .clamped_speed_exponent()
            .saturating_add(delta)
            .clamp(-MAX_SIMULATION_SPEED_EXPONENT, MAX_SIMULATION_SPEED_EXPONENT);
        let scale = config.time_scale();
        info!(
            "simulation speed exponent {} (x{scale})",
            config.simulation_speed_exponent
        );
        scale
    }

    /// Switches between bouncing and merging; returns the new mode.
    pub fn cycle_collision_type(&mut self) -> CollisionType {
        let config = self.world.config_mut();
        config.collision_type = config.collision_type.cycle();
        info!("collision type {:?}", config.collision_type);
        config.collision_type
    }

    /// Scalar readout of the current frame.
    pub fn stats(&self) -> SimulationStats {
        SimulationStats {
            body_count: self.world.body_count(),
            spring_edge_count: self.world.spring_edge_count(),
            elapsed_time: self.world.elapsed_time(),
            fps: self.fps.fps(),
            paused: self.world.config().paused,
            steps_taken: self.world.steps_taken(),
        }
    }
}
