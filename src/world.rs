pub mod collision_manager;
pub mod dynamics_manager;

use glam::DVec2;
use log::{debug, info};
use rand::{rngs::StdRng, SeedableRng};

use crate::{
    config::{SimulationConfig, WorldBounds},
    core::{
        body::{Body, BodyKind},
        track::TrackDesc,
        types::{Color, PlaneSide, VehicleDesc},
    },
    dynamics::{integrator::Integrator, springs::SpringGraph},
    error::{Result, SandboxError},
    utils::{
        allocator::{Arena, BodyId},
        logging::ScopedTimer,
        profiling::StepProfile,
        random::{random_between, random_hsv_color},
    },
};

use collision_manager::CollisionManager;
use dynamics_manager::DynamicsManager;

/// Owns every body and runs the fixed pass order of one simulation step.
pub struct SandboxWorld {
    bodies: Arena<Body>,
    config: SimulationConfig,
    bounds: WorldBounds,
    collisions: CollisionManager,
    dynamics: DynamicsManager,
    integrator: Integrator,
    rng: StdRng,
    elapsed: f64,
    profile: StepProfile,
    parallel_enabled: bool,
}

impl Default for SandboxWorld {
    fn default() -> Self {
        Self::new(WorldBounds::default(), SimulationConfig::default(), 0)
    }
}

impl SandboxWorld {
    /// Creates an empty world. `seed` drives every random spawn.
    pub fn new(bounds: WorldBounds, config: SimulationConfig, seed: u64) -> Self {
        Self {
            bodies: Arena::new(),
            config,
            bounds,
            collisions: CollisionManager::new(),
            dynamics: DynamicsManager::new(),
            integrator: Integrator::new(),
            rng: StdRng::seed_from_u64(seed),
            elapsed: 0.0,
            profile: StepProfile::default(),
            parallel_enabled: cfg!(feature = "parallel"),
        }
    }

    /// World rectangle used for planes and boundary reflection.
    pub fn bounds(&self) -> WorldBounds {
        self.bounds
    }

    /// Settings read by the next step.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Mutable settings, read by the next step.
    pub fn config_mut(&mut self) -> &mut SimulationConfig {
        &mut self.config
    }

    /// Turns swept collision tests on or off. Bodies already touching are
    /// still reported either way.
    pub fn set_ccd_enabled(&mut self, enabled: bool) {
        self.collisions.ccd.set_enabled(enabled);
    }

    pub fn ccd_enabled(&self) -> bool {
        self.collisions.ccd.enabled
    }

    /// Steps integrated since the world was created.
    pub fn steps_taken(&self) -> u64 {
        self.integrator.steps_taken
    }

    /// Only has an effect when the crate is built with the `parallel` feature.
    pub fn set_parallel_enabled(&mut self, enabled: bool) {
        self.parallel_enabled = enabled;
    }

    /// Whether radial gravity runs on the rayon pool.
    pub fn parallel_enabled(&self) -> bool {
        self.parallel_enabled
    }

    /// Inserts an already built body and stamps its id.
    pub fn add_body(&mut self, body: Body) -> BodyId {
        let kind = body.kind();
        let id = self.bodies.insert(body);
        if let Some(stored) = self.bodies.get_mut(id) {
            stored.id = id;
        }
        debug!("spawned {kind:?} {id}");
        id
    }

    /// Spawns a disc. Fails on a non-positive or non-finite radius.
    #[allow(clippy::too_many_arguments)]
    pub fn add_ball(
        &mut self,
        x: f64,
        y: f64,
        radius: f64,
        vx: f64,
        vy: f64,
        color: Color,
        is_active: bool,
    ) -> Result<BodyId> {
        let body = Body::disc(DVec2::new(x, y), radius, DVec2::new(vx, vy), color, is_active)?;
        Ok(self.add_body(body))
    }

    /// Spawns a convex polygon from vertices relative to `(x, y)`.
    #[allow(clippy::too_many_arguments)]
    pub fn add_polygon(
        &mut self,
        x: f64,
        y: f64,
        vx: f64,
        vy: f64,
        vertices: Vec<DVec2>,
        color: Color,
        is_active: bool,
    ) -> Result<BodyId> {
        let body = Body::polygon(DVec2::new(x, y), DVec2::new(vx, vy), vertices, color, is_active)?;
        Ok(self.add_body(body))
    }

    /// Spawns a static plane along one world edge.
    pub fn add_plane(&mut self, side: PlaneSide) -> BodyId {
        let body = Body::plane(side, &self.bounds);
        self.add_body(body)
    }

    /// Generates a random height profile from the world's seeded generator.
    pub fn add_track(
        &mut self,
        point_count: usize,
        spacing: f64,
        thickness: f64,
        y_min: f64,
        y_max: f64,
    ) -> Result<BodyId> {
        let desc = TrackDesc {
            point_count,
            spacing,
            thickness,
            y_min,
            y_max,
        };
        let points = desc.generate_points(&mut self.rng)?;
        let body = Body::track(points, thickness, Color::WHITE)?;
        Ok(self.add_body(body))
    }

    /// Spawns a chassis with two wheels as a single body.
    pub fn add_vehicle(
        &mut self,
        x: f64,
        y: f64,
        vx: f64,
        vy: f64,
        desc: VehicleDesc,
        color: Color,
    ) -> Result<BodyId> {
        let body = Body::vehicle(DVec2::new(x, y), DVec2::new(vx, vy), desc, color)?;
        Ok(self.add_body(body))
    }

    /// Scatters `count` resting discs over the world and closes it with four planes.
    pub fn populate(&mut self, count: usize, radius: f64) -> Result<()> {
        for _ in 0..count {
            let x = random_between(&mut self.rng, 0.0, self.bounds.width);
            let y = random_between(&mut self.rng, 0.0, self.bounds.height);
            let color = random_hsv_color(&mut self.rng, 100.0, 100.0);
            self.add_ball(x, y, radius, 0.0, 0.0, color, true)?;
        }
        for side in PlaneSide::ALL {
            self.add_plane(side);
        }
        Ok(())
    }

    /// Looks up a live body.
    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(id)
    }

    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.get_mut(id)
    }

    /// Live bodies in arena order.
    pub fn bodies(&self) -> impl Iterator<Item = &Body> + '_ {
        self.bodies.values()
    }

    /// Directed spring edges as (source, target) pairs.
    pub fn spring_edges(&self) -> impl Iterator<Item = (BodyId, BodyId)> + '_ {
        SpringGraph::edges(&self.bodies)
    }

    /// Number of directed spring edges.
    pub fn spring_edge_count(&self) -> usize {
        SpringGraph::edge_count(&self.bodies)
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Simulation time accumulated since the last reset.
    pub fn elapsed_time(&self) -> f64 {
        self.elapsed
    }

    /// Timings and counts of the last step.
    pub fn profile(&self) -> &StepProfile {
        &self.profile
    }

    /// Flags a body for removal at the next sweep.
    pub fn mark_for_deletion(&mut self, id: BodyId) -> Result<()> {
        let body = self
            .bodies
            .get_mut(id)
            .ok_or(SandboxError::UnknownBody(id))?;
        body.mark_for_deletion();
        Ok(())
    }

    /// Removes every body immediately.
    pub fn delete_all(&mut self) {
        let count = self.bodies.len();
        self.bodies.clear();
        info!("deleted all {count} bodies");
    }

    /// Clears the world and rewinds the simulation clock.
    pub fn reset(&mut self) {
        self.delete_all();
        self.elapsed = 0.0;
        self.profile.reset();
    }

    /// Removes every body flagged for deletion along with all edges touching it.
    pub fn sweep_deleted(&mut self) -> usize {
        Self::sweep(&mut self.bodies)
    }

    fn sweep(bodies: &mut Arena<Body>) -> usize {
        let doomed: Vec<BodyId> = bodies
            .iter()
            .filter(|(_, body)| body.is_marked_for_deletion())
            .map(|(id, _)| id)
            .collect();

        for &id in &doomed {
            SpringGraph::detach(bodies, id);
        }
        for &id in &doomed {
            bodies.remove(id);
        }
        doomed.len()
    }

    fn has_boundary_planes(&self) -> bool {
        self.bodies.values().any(|body| body.kind() == BodyKind::Plane)
    }

    /// Advances the world by `dt` simulation seconds. The caller applies the time scale.
    pub fn step(&mut self, dt: f64) {
        self.profile.reset();

        if self.config.collisions_enabled {
            let _timer = ScopedTimer::new("collisions", &mut self.profile.collision_time);
            let summary = self
                .collisions
                .resolve(&mut self.bodies, self.config.collision_type, dt);
            self.profile.collisions = summary.bounces;
            self.profile.merges = summary.merges;
        }

        {
            let _timer = ScopedTimer::new("sweep", &mut self.profile.sweep_time);
            self.profile.deleted = Self::sweep(&mut self.bodies);
        }

        if self.config.gravity_vertical_enabled || self.config.gravity_radial_enabled {
            let _timer = ScopedTimer::new("gravity", &mut self.profile.gravity_time);
            self.dynamics
                .apply_gravity(&mut self.bodies, &self.config, dt, self.parallel_enabled);
        }

        if self.config.springs_enabled {
            let _timer = ScopedTimer::new("springs", &mut self.profile.spring_time);
            self.dynamics.apply_springs(&mut self.bodies, &self.config, dt);
        }

        if self.config.background_friction_enabled {
            let _timer = ScopedTimer::new("drag", &mut self.profile.drag_time);
            self.dynamics.apply_drag(&mut self.bodies, &self.config, dt);
        }

        let reflect = !self.has_boundary_planes();
        {
            let _timer = ScopedTimer::new("integrate", &mut self.profile.integrator_time);
            self.integrator.integrate(&mut self.bodies, dt);
            if reflect {
                for body in self.bodies.values_mut() {
                    Integrator::reflect_at_bounds(body, &self.bounds);
                }
            }
        }

        self.elapsed += dt;
        self.profile.body_count = self.bodies.len();
        self.profile.spring_edge_count = SpringGraph::edge_count(&self.bodies);
        self.profile.report();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet_world() -> SandboxWorld {
        SandboxWorld::new(WorldBounds::default(), SimulationConfig::quiescent(), 7)
    }

    #[test]
    fn invalid_spawn_is_not_inserted() {
        let mut world = quiet_world();
        assert!(world.add_ball(0.0, 0.0, -1.0, 0.0, 0.0, Color::WHITE, true).is_err());
        assert!(world
            .add_polygon(0.0, 0.0, 0.0, 0.0, Vec::new(), Color::WHITE, true)
            .is_err());
        assert_eq!(world.body_count(), 0);
    }

    #[test]
    fn populate_adds_discs_and_planes() {
        let mut world = quiet_world();
        world.populate(10, 5.0).unwrap();
        assert_eq!(world.body_count(), 14);
        let planes = world.bodies().filter(|b| b.kind() == BodyKind::Plane).count();
        assert_eq!(planes, 4);
        for body in world.bodies().filter(|b| b.kind() == BodyKind::Disc) {
            let p = body.position();
            assert!((0.0..=640.0).contains(&p.x));
            assert!((0.0..=480.0).contains(&p.y));
        }
    }

    #[test]
    fn same_seed_same_track() {
        let mut a = quiet_world();
        let mut b = quiet_world();
        let ta = a.add_track(10, 20.0, 4.0, 300.0, 400.0).unwrap();
        let tb = b.add_track(10, 20.0, 4.0, 300.0, 400.0).unwrap();
        assert_eq!(a.body(ta).unwrap().outline(), b.body(tb).unwrap().outline());
        assert!(a.body(ta).unwrap().is_static());
    }

    #[test]
    fn marking_an_unknown_body_fails() {
        let mut world = quiet_world();
        let id = world.add_ball(10.0, 10.0, 1.0, 0.0, 0.0, Color::WHITE, true).unwrap();
        world.mark_for_deletion(id).unwrap();
        world.step(1.0);
        assert_eq!(world.body_count(), 0);
        assert_eq!(
            world.mark_for_deletion(id),
            Err(SandboxError::UnknownBody(id))
        );
    }

    #[test]
    fn step_advances_clock_and_profile() {
        let mut world = quiet_world();
        world.add_ball(100.0, 100.0, 5.0, 1.0, 0.0, Color::WHITE, true).unwrap();
        world.step(0.5);
        world.step(0.5);
        assert!((world.elapsed_time() - 1.0).abs() < 1e-12);
        assert_eq!(world.profile().body_count, 1);
        assert_eq!(world.steps_taken(), 2);
    }

    #[test]
    fn disabling_ccd_lets_fast_discs_pass() {
        let config = SimulationConfig {
            collisions_enabled: true,
            ..SimulationConfig::quiescent()
        };
        let spawn_pair = |world: &mut SandboxWorld| {
            world.add_ball(100.0, 100.0, 5.0, 200.0, 0.0, Color::WHITE, true).unwrap();
            world.add_ball(200.0, 100.0, 5.0, 0.0, 0.0, Color::WHITE, true).unwrap();
        };

        let mut swept = SandboxWorld::new(WorldBounds::default(), config.clone(), 0);
        spawn_pair(&mut swept);
        assert!(swept.ccd_enabled());
        swept.step(1.0);
        assert_eq!(swept.profile().collisions, 1);

        let mut discrete = SandboxWorld::new(WorldBounds::default(), config, 0);
        discrete.set_ccd_enabled(false);
        spawn_pair(&mut discrete);
        discrete.step(1.0);
        assert_eq!(discrete.profile().collisions, 0);
    }
}
