//! Force accumulators. Each one turns a force law into a velocity change over `dt`.

use glam::DVec2;

use crate::core::body::Body;

/// Force applied to a single body independently of the rest of the population.
pub trait ForceGenerator: Send + Sync {
    fn apply(&self, body: &mut Body, dt: f64);
}

/// Uniform downward (+y) acceleration.
#[derive(Debug, Clone, Copy)]
pub struct VerticalGravity {
    pub acceleration: f64,
}

impl VerticalGravity {
    pub fn new(acceleration: f64) -> Self {
        Self { acceleration }
    }

    pub fn velocity_delta(&self, dt: f64) -> DVec2 {
        DVec2::new(0.0, self.acceleration * dt)
    }
}

impl ForceGenerator for VerticalGravity {
    fn apply(&self, body: &mut Body, dt: f64) {
        body.apply_impulse(self.velocity_delta(dt));
    }
}

/// Constant-magnitude drag opposing the direction of motion.
#[derive(Debug, Clone, Copy)]
pub struct BackgroundDrag {
    pub force: f64,
}

impl BackgroundDrag {
    pub fn new(force: f64) -> Self {
        Self { force }
    }

    /// Velocity after one step of drag. A component that would change sign is
    /// clamped to zero instead.
    pub fn apply_to_velocity(&self, velocity: DVec2, mass: f64, dt: f64) -> DVec2 {
        let speed = velocity.length();
        if speed == 0.0 || !(mass.is_finite() && mass > 0.0) {
            return velocity;
        }

        let deceleration = self.force / mass;
        let slowed = velocity - velocity / speed * deceleration * dt;

        let clamp = |before: f64, after: f64| if before * after < 0.0 { 0.0 } else { after };
        DVec2::new(clamp(velocity.x, slowed.x), clamp(velocity.y, slowed.y))
    }
}

impl ForceGenerator for BackgroundDrag {
    fn apply(&self, body: &mut Body, dt: f64) {
        if body.is_static() {
            return;
        }
        let velocity = self.apply_to_velocity(body.velocity(), body.mass(), dt);
        body.set_velocity(velocity);
    }
}

/// Inverse-square attraction between two bodies.
#[derive(Debug, Clone, Copy)]
pub struct RadialGravity {
    pub constant: f64,
}

impl RadialGravity {
    pub fn new(constant: f64) -> Self {
        Self { constant }
    }

    /// Velocity change of body `i` due to body `j`. Only `i` is affected; the
    /// reaction on `j` comes from evaluating the pair the other way round.
    pub fn velocity_delta(
        &self,
        position_i: DVec2,
        mass_i: f64,
        position_j: DVec2,
        mass_j: f64,
        dt: f64,
    ) -> DVec2 {
        let offset = position_j - position_i;
        let distance = offset.length();
        if distance == 0.0 || mass_i <= 0.0 {
            return DVec2::ZERO;
        }
        let force = self.constant * mass_i * mass_j / (distance * distance);
        offset / distance * (force / mass_i * dt)
    }
}

/// Result of evaluating one spring edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpringOutcome {
    /// Velocity change for the source body.
    Impulse(DVec2),
    /// The edge is stretched past its limit and must be removed.
    Sever,
    /// Coincident endpoints; nothing to do.
    Degenerate,
}

/// Damped Hookean spring acting on the source of a directed edge.
#[derive(Debug, Clone, Copy)]
pub struct DampedSpring {
    pub stiffness: f64,
    pub damping: f64,
    pub rest_length: f64,
    /// Edges longer than this are severed. Zero or negative disables severing.
    pub max_length: f64,
}

impl DampedSpring {
    /// Force on the source `i` of the edge `i -> j`, as a velocity change over `dt`.
    ///
    /// The force is `axis * (k * (d - rest) + c * (v_rel . axis))` with
    /// `v_rel = v_j - v_i`. Damping only resists motion along the spring axis;
    /// the tangential part of the relative velocity exerts nothing. The target
    /// body is not touched here. Its own outgoing edges pull it back.
    pub fn evaluate(
        &self,
        position_i: DVec2,
        velocity_i: DVec2,
        mass_i: f64,
        position_j: DVec2,
        velocity_j: DVec2,
        dt: f64,
    ) -> SpringOutcome {
        let offset = position_j - position_i;
        let distance = offset.length();
        if distance == 0.0 {
            return SpringOutcome::Degenerate;
        }
        if self.max_length > 0.0 && distance > self.max_length {
            return SpringOutcome::Sever;
        }
        if !(mass_i.is_finite() && mass_i > 0.0) {
            return SpringOutcome::Degenerate;
        }

        let axis = offset / distance;
        let hooke = self.stiffness * (distance - self.rest_length);

        let damping = self.damping * (velocity_j - velocity_i).dot(axis);

        let force = axis * (hooke + damping);
        SpringOutcome::Impulse(force / mass_i * dt)
    }
}
