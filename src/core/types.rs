use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::config::{
    DEFAULT_BOUNDARY_DAMPING, DEFAULT_DENSITY, DEFAULT_FRICTION, DEFAULT_RESTITUTION, WorldBounds,
};

/// 8-bit RGB color carried by every body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Mass-weighted average of two colors, truncated per channel.
    pub fn mass_weighted(self, mass: f64, other: Color, other_mass: f64) -> Color {
        let total = mass + other_mass;
        if total <= 0.0 || !total.is_finite() {
            return self;
        }
        let mix = |a: u8, b: u8| ((mass * a as f64 + other_mass * b as f64) / total) as u8;
        Color::new(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
        )
    }
}

/// Material coefficients that affect interactions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Material {
    pub density: f64,
    /// Fraction of normal relative speed kept in a bounce; pairs multiply theirs.
    pub restitution: f64,
    pub friction: f64,
    /// Fraction of speed kept when reflected at the world edge.
    pub damping: f64,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            density: DEFAULT_DENSITY,
            restitution: DEFAULT_RESTITUTION,
            friction: DEFAULT_FRICTION,
            damping: DEFAULT_BOUNDARY_DAMPING,
        }
    }
}

impl Material {
    pub fn combined_restitution(&self, other: &Material) -> f64 {
        self.restitution * other.restitution
    }
}

/// Which world edge a static plane guards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlaneSide {
    Left,
    Right,
    Top,
    Bottom,
}

impl PlaneSide {
    pub const ALL: [PlaneSide; 4] = [
        PlaneSide::Left,
        PlaneSide::Right,
        PlaneSide::Top,
        PlaneSide::Bottom,
    ];

    /// Inward normal and offset such that `normal · p - offset` is the signed
    /// distance of `p` from the plane, positive inside the world.
    pub fn plane_equation(self, bounds: &WorldBounds) -> (DVec2, f64) {
        match self {
            PlaneSide::Left => (DVec2::X, 0.0),
            PlaneSide::Right => (DVec2::NEG_X, -bounds.width),
            PlaneSide::Top => (DVec2::Y, 0.0),
            PlaneSide::Bottom => (DVec2::NEG_Y, -bounds.height),
        }
    }
}

/// Chassis and wheel dimensions of a compound vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VehicleDesc {
    pub chassis_width: f64,
    pub chassis_height: f64,
    pub wheel_radius: f64,
}

impl Default for VehicleDesc {
    fn default() -> Self {
        Self {
            chassis_width: 60.0,
            chassis_height: 15.0,
            wheel_radius: 8.0,
        }
    }
}
