//! Procedural terrain track generation.

use glam::DVec2;
use rand::Rng;

use crate::{
    error::{Result, SandboxError},
    utils::random::random_between,
};

/// Parameters of a generated track strip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackDesc {
    pub point_count: usize,
    pub spacing: f64,
    pub thickness: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl TrackDesc {
    pub fn validate(&self) -> Result<()> {
        if self.point_count < 2 {
            return Err(SandboxError::InvalidShape {
                reason: "track needs at least two points",
            });
        }
        if !(self.spacing.is_finite() && self.spacing > 0.0) {
            return Err(SandboxError::InvalidShape {
                reason: "track spacing must be positive",
            });
        }
        if !(self.thickness.is_finite() && self.thickness > 0.0) {
            return Err(SandboxError::InvalidShape {
                reason: "track thickness must be positive",
            });
        }
        if !(self.y_min.is_finite() && self.y_max.is_finite() && self.y_min <= self.y_max) {
            return Err(SandboxError::InvalidShape {
                reason: "track height range is empty",
            });
        }
        Ok(())
    }

    /// Points at fixed x spacing from the origin with heights drawn uniformly from `[y_min, y_max)`.
    pub fn generate_points<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec<DVec2>> {
        self.validate()?;
        Ok((0..self.point_count)
            .map(|i| {
                DVec2::new(
                    i as f64 * self.spacing,
                    random_between(rng, self.y_min, self.y_max),
                )
            })
            .collect())
    }
}
