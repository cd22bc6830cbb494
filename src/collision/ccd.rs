use glam::DVec2;

/// Continuous collision detector for circle-like shapes.
///
/// Pairs that already touch at the start of the step report a time of impact
/// of 0. With CCD disabled nothing else is reported.
#[derive(Debug, Clone)]
pub struct CCDDetector {
    pub enabled: bool,
}

impl Default for CCDDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl CCDDetector {
    pub fn new() -> Self {
        Self { enabled: true }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Time of impact of two moving circles within the step.
    ///
    /// `relative_position` is `p_b - p_a`, `relative_velocity` is `v_b - v_a`.
    pub fn circle_circle(
        &self,
        relative_position: DVec2,
        relative_velocity: DVec2,
        radius_sum: f64,
        dt: f64,
    ) -> Option<f64> {
        if relative_position.length_squared() <= radius_sum * radius_sum {
            return Some(0.0);
        }
        if !self.enabled {
            return None;
        }
        swept_circle_time_of_impact(relative_position, relative_velocity, radius_sum, dt)
    }

    /// Time of impact of a circle against a half-plane.
    ///
    /// `signed_distance` is the centre's distance from the plane (positive on the
    /// free side) and `normal_velocity` the velocity component along the plane normal.
    pub fn circle_plane(
        &self,
        signed_distance: f64,
        normal_velocity: f64,
        radius: f64,
        dt: f64,
    ) -> Option<f64> {
        if signed_distance <= radius {
            return (normal_velocity < 0.0 || signed_distance < radius).then_some(0.0);
        }
        if !self.enabled {
            return None;
        }
        let approach = normal_velocity * dt;
        if approach >= 0.0 {
            return None;
        }
        let t = (radius - signed_distance) / approach;
        (0.0..=1.0).contains(&t).then_some(t)
    }
}

/// Smallest `t` in `[0, 1]` with `|p + v·dt·t| = radius_sum`, if any.
pub fn swept_circle_time_of_impact(
    relative_position: DVec2,
    relative_velocity: DVec2,
    radius_sum: f64,
    dt: f64,
) -> Option<f64> {
    let sweep = relative_velocity * dt;
    let a = sweep.length_squared();
    if a < f64::EPSILON {
        return None;
    }
    let b = 2.0 * relative_position.dot(sweep);
    let c = relative_position.length_squared() - radius_sum * radius_sum;

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }
    let root = discriminant.sqrt();
    let t_first = (-b - root) / (2.0 * a);
    let t_second = (-b + root) / (2.0 * a);

    [t_first, t_second]
        .into_iter()
        .find(|t| (0.0..=1.0).contains(t))
}
