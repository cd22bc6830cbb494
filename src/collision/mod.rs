//! Collision detection and response: broad phase, swept time of impact, contacts, response.

pub mod broadphase;
pub mod ccd;
pub mod narrowphase;
pub mod response;

pub use broadphase::BroadPhase;
pub use ccd::{swept_circle_time_of_impact, CCDDetector};
pub use narrowphase::{Contact, NarrowPhase};
pub use response::MergeSurvivor;
