use crate::{
    config::WorldBounds,
    core::body::Body,
    utils::allocator::Arena,
};

/// Explicit Euler position update. Velocities are already final when this runs;
/// every force pass writes velocity deltas directly.
#[derive(Debug, Clone, Default)]
pub struct Integrator {
    pub steps_taken: u64,
}

impl Integrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn integrate_body(body: &mut Body, dt: f64) {
        if body.is_static() || !body.is_simulated() {
            return;
        }
        body.set_position(body.position() + body.velocity() * dt);
        body.angle += body.angular_velocity * dt;
    }

    pub fn integrate(&mut self, bodies: &mut Arena<Body>, dt: f64) {
        for body in bodies.values_mut() {
            Self::integrate_body(body, dt);
        }
        self.steps_taken += 1;
    }

    /// Keeps a dynamic body inside `bounds`: a body whose bounding circle crossed
    /// an edge is clamped back onto it and the matching velocity component is
    /// negated and scaled by the body's damping. Returns whether it was reflected.
    pub fn reflect_at_bounds(body: &mut Body, bounds: &WorldBounds) -> bool {
        if body.is_static() {
            return false;
        }
        let radius = body.bounding_radius();
        if !radius.is_finite() {
            return false;
        }

        let damping = body.material.damping;
        let mut position = body.position();
        let mut velocity = body.velocity();
        let mut reflected = false;

        if position.x - radius < 0.0 {
            position.x = radius;
            velocity.x = -velocity.x * damping;
            reflected = true;
        } else if position.x + radius > bounds.width {
            position.x = bounds.width - radius;
            velocity.x = -velocity.x * damping;
            reflected = true;
        }

        if position.y - radius < 0.0 {
            position.y = radius;
            velocity.y = -velocity.y * damping;
            reflected = true;
        } else if position.y + radius > bounds.height {
            position.y = bounds.height - radius;
            velocity.y = -velocity.y * damping;
            reflected = true;
        }

        if reflected {
            body.set_position(position);
            body.set_velocity(velocity);
        }
        reflected
    }
}
