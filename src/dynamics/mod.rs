//! Simulation dynamics: force laws, the spring graph and position integration.

pub mod forces;
pub mod integrator;
pub mod springs;

pub use forces::{
    BackgroundDrag, DampedSpring, ForceGenerator, RadialGravity, SpringOutcome, VerticalGravity,
};
pub use integrator::Integrator;
pub use springs::SpringGraph;
