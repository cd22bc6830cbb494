use glam::DVec2;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::{
    config::SimulationConfig,
    core::body::Body,
    dynamics::{
        forces::{BackgroundDrag, DampedSpring, ForceGenerator, RadialGravity, VerticalGravity},
        springs::SpringGraph,
    },
    utils::allocator::{Arena, BodyId},
};

/// Owns the force passes that run after collisions: gravity, springs and drag.
#[derive(Debug, Default)]
pub struct DynamicsManager {
    pub springs: SpringGraph,
    snapshot: Vec<(BodyId, DVec2, f64)>,
}

impl DynamicsManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply_gravity(
        &mut self,
        bodies: &mut Arena<Body>,
        config: &SimulationConfig,
        dt: f64,
        parallel: bool,
    ) {
        if config.gravity_vertical_enabled {
            let gravity = VerticalGravity::new(config.gravity_vertical_force);
            for body in bodies.values_mut().filter(|body| body.is_simulated()) {
                gravity.apply(body, dt);
            }
        }
        if config.gravity_radial_enabled {
            self.apply_radial_gravity(bodies, RadialGravity::new(config.gravity_radial_force), dt, parallel);
        }
    }

    /// Every ordered pair of dynamic bodies, each side accumulating its own pull.
    /// Deltas are computed from positions at the start of the pass.
    fn apply_radial_gravity(
        &mut self,
        bodies: &mut Arena<Body>,
        gravity: RadialGravity,
        dt: f64,
        parallel: bool,
    ) {
        self.snapshot.clear();
        self.snapshot.extend(
            bodies
                .iter()
                .filter(|(_, body)| body.is_simulated() && !body.is_static())
                .map(|(id, body)| (id, body.position(), body.mass())),
        );

        let deltas = radial_deltas(&self.snapshot, gravity, dt, parallel);
        for (&(id, _, _), delta) in self.snapshot.iter().zip(deltas) {
            if let Some(body) = bodies.get_mut(id) {
                body.apply_impulse(delta);
            }
        }
    }

    /// Grows the graph, then applies spring forces. Returns the number of severed edges.
    pub fn apply_springs(&mut self, bodies: &mut Arena<Body>, config: &SimulationConfig, dt: f64) -> usize {
        self.springs.grow(bodies, config);
        let spring = DampedSpring {
            stiffness: config.spring_force,
            damping: config.spring_damping,
            rest_length: config.spring_distance,
            max_length: config.spring_max_distance,
        };
        self.springs.apply_forces(bodies, &spring, dt)
    }

    pub fn apply_drag(&self, bodies: &mut Arena<Body>, config: &SimulationConfig, dt: f64) {
        let drag = BackgroundDrag::new(config.background_friction_force);
        for body in bodies.values_mut().filter(|body| body.is_simulated()) {
            drag.apply(body, dt);
        }
    }
}

fn radial_deltas(
    snapshot: &[(BodyId, DVec2, f64)],
    gravity: RadialGravity,
    dt: f64,
    parallel: bool,
) -> Vec<DVec2> {
    let delta_for = |i: usize| {
        let (_, position, mass) = snapshot[i];
        snapshot
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != i)
            .fold(DVec2::ZERO, |acc, (_, &(_, other_position, other_mass))| {
                acc + gravity.velocity_delta(position, mass, other_position, other_mass, dt)
            })
    };

    #[cfg(feature = "parallel")]
    {
        if parallel {
            return (0..snapshot.len()).into_par_iter().map(delta_for).collect();
        }
    }
    #[cfg(not(feature = "parallel"))]
    let _ = parallel;

    (0..snapshot.len()).map(delta_for).collect()
}
