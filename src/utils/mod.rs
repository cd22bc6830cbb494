//! Utility helpers: the body arena, 2D math, logging and profiling.

pub mod allocator;
pub mod logging;
pub mod math;
pub mod profiling;
pub mod random;

pub use allocator::{Arena, BodyId};
pub use profiling::{FpsCounter, StepProfile};
