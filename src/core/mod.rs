//! Core types describing simulated bodies and their shared data.

pub mod body;
pub mod track;
pub mod types;

pub use body::{Body, BodyKind, BodyShape};
pub use track::TrackDesc;
pub use types::{Color, Material, PlaneSide, VehicleDesc};
