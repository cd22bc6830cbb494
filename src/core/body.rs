use std::f64::consts::PI;

use glam::DVec2;

use super::types::{Color, Material, PlaneSide, VehicleDesc};
use crate::{
    config::WorldBounds,
    error::{Result, SandboxError},
    utils::{allocator::BodyId, math},
};

/// Closed set of body geometries. Local coordinates are relative to the body position.
#[derive(Debug, Clone, PartialEq)]
pub enum BodyShape {
    Disc {
        radius: f64,
    },
    Polygon {
        vertices: Vec<DVec2>,
    },
    /// Half-plane `normal · p >= offset`, fixed in world space.
    Plane {
        side: PlaneSide,
        normal: DVec2,
        offset: f64,
    },
    /// Polyline of static segments in world space.
    Track {
        points: Vec<DVec2>,
        thickness: f64,
    },
    Vehicle {
        half_extents: DVec2,
        wheel_radius: f64,
        wheel_offsets: [DVec2; 2],
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyKind {
    Disc,
    Polygon,
    Plane,
    Track,
    Vehicle,
}

impl BodyShape {
    pub fn kind(&self) -> BodyKind {
        match self {
            BodyShape::Disc { .. } => BodyKind::Disc,
            BodyShape::Polygon { .. } => BodyKind::Polygon,
            BodyShape::Plane { .. } => BodyKind::Plane,
            BodyShape::Track { .. } => BodyKind::Track,
            BodyShape::Vehicle { .. } => BodyKind::Vehicle,
        }
    }

    pub fn area(&self) -> f64 {
        match self {
            BodyShape::Disc { radius } => PI * radius * radius,
            BodyShape::Polygon { vertices } => math::polygon_signed_area(vertices).abs(),
            BodyShape::Vehicle {
                half_extents,
                wheel_radius,
                ..
            } => 4.0 * half_extents.x * half_extents.y + 2.0 * PI * wheel_radius * wheel_radius,
            BodyShape::Plane { .. } | BodyShape::Track { .. } => 0.0,
        }
    }

    /// Radius of the smallest origin-centred circle containing the shape.
    pub fn bounding_radius(&self) -> f64 {
        match self {
            BodyShape::Disc { radius } => *radius,
            BodyShape::Polygon { vertices } => {
                vertices.iter().map(|v| v.length()).fold(0.0, f64::max)
            }
            BodyShape::Vehicle {
                half_extents,
                wheel_radius,
                wheel_offsets,
            } => wheel_offsets
                .iter()
                .map(|offset| offset.length() + wheel_radius)
                .fold(half_extents.length(), f64::max),
            BodyShape::Plane { .. } | BodyShape::Track { .. } => f64::INFINITY,
        }
    }

    fn is_fixed(&self) -> bool {
        matches!(self, BodyShape::Plane { .. } | BodyShape::Track { .. })
    }
}

/// A simulated entity: kinematic state, shape, material and spring bookkeeping.
#[derive(Debug, Clone)]
pub struct Body {
    pub id: BodyId,
    position: DVec2,
    velocity: DVec2,
    /// Orientation in radians; only drawn for polygons and vehicles.
    pub angle: f64,
    pub angular_velocity: f64,
    shape: BodyShape,
    mass: f64,
    pub material: Material,
    pub color: Color,
    is_active: bool,
    marked_for_deletion: bool,
    spring_connections: Vec<BodyId>,
    incoming_spring_connections: usize,
}

impl Body {
    fn from_shape(
        shape: BodyShape,
        position: DVec2,
        velocity: DVec2,
        color: Color,
        is_active: bool,
    ) -> Self {
        let material = Material::default();
        let mass = shape.area() * material.density;
        Self {
            id: BodyId::default(),
            position,
            velocity,
            angle: 0.0,
            angular_velocity: 0.0,
            is_active: is_active && !shape.is_fixed(),
            shape,
            mass,
            material,
            color,
            marked_for_deletion: false,
            spring_connections: Vec::new(),
            incoming_spring_connections: 0,
        }
    }

    pub fn disc(
        position: DVec2,
        radius: f64,
        velocity: DVec2,
        color: Color,
        is_active: bool,
    ) -> Result<Self> {
        if !math::all_finite(&[position.x, position.y, velocity.x, velocity.y, radius]) {
            return Err(SandboxError::InvalidShape {
                reason: "disc arguments must be finite",
            });
        }
        if radius <= 0.0 {
            return Err(SandboxError::InvalidShape {
                reason: "disc radius must be positive",
            });
        }
        Ok(Self::from_shape(
            BodyShape::Disc { radius },
            position,
            velocity,
            color,
            is_active,
        ))
    }

    /// Convex polygon with vertices given relative to `position`, in either winding.
    pub fn polygon(
        position: DVec2,
        velocity: DVec2,
        vertices: Vec<DVec2>,
        color: Color,
        is_active: bool,
    ) -> Result<Self> {
        if vertices.is_empty() {
            return Err(SandboxError::InvalidShape {
                reason: "polygon has no vertices",
            });
        }
        let finite = vertices.iter().all(|v| v.is_finite())
            && math::all_finite(&[position.x, position.y, velocity.x, velocity.y]);
        if !finite {
            return Err(SandboxError::InvalidShape {
                reason: "polygon arguments must be finite",
            });
        }
        if vertices.len() < 3 || math::polygon_signed_area(&vertices).abs() < f64::EPSILON {
            return Err(SandboxError::InvalidShape {
                reason: "polygon has zero area",
            });
        }
        if !math::is_convex(&vertices) {
            return Err(SandboxError::InvalidShape {
                reason: "polygon is not convex",
            });
        }
        Ok(Self::from_shape(
            BodyShape::Polygon { vertices },
            position,
            velocity,
            color,
            is_active,
        ))
    }

    /// Static half-plane along one edge of `bounds`.
    pub fn plane(side: PlaneSide, bounds: &WorldBounds) -> Self {
        let (normal, offset) = side.plane_equation(bounds);
        Self::from_shape(
            BodyShape::Plane {
                side,
                normal,
                offset,
            },
            normal * offset,
            DVec2::ZERO,
            Color::WHITE,
            false,
        )
    }

    /// Static strip of segments through `points` (world space).
    pub fn track(points: Vec<DVec2>, thickness: f64, color: Color) -> Result<Self> {
        if points.len() < 2 {
            return Err(SandboxError::InvalidShape {
                reason: "track needs at least two points",
            });
        }
        if !thickness.is_finite() || thickness <= 0.0 || points.iter().any(|p| !p.is_finite()) {
            return Err(SandboxError::InvalidShape {
                reason: "track thickness must be positive and points finite",
            });
        }
        Ok(Self::from_shape(
            BodyShape::Track { points, thickness },
            DVec2::ZERO,
            DVec2::ZERO,
            color,
            false,
        ))
    }

    pub fn vehicle(
        position: DVec2,
        velocity: DVec2,
        desc: VehicleDesc,
        color: Color,
    ) -> Result<Self> {
        let dims = [desc.chassis_width, desc.chassis_height, desc.wheel_radius];
        if !math::all_finite(&dims) || !math::all_finite(&[position.x, position.y, velocity.x, velocity.y]) {
            return Err(SandboxError::InvalidShape {
                reason: "vehicle arguments must be finite",
            });
        }
        if dims.iter().any(|d| *d <= 0.0) {
            return Err(SandboxError::InvalidShape {
                reason: "vehicle dimensions must be positive",
            });
        }
        let half_extents = DVec2::new(desc.chassis_width, desc.chassis_height) * 0.5;
        let wheel_x = (half_extents.x - desc.wheel_radius).max(0.0);
        let wheel_offsets = [
            DVec2::new(-wheel_x, half_extents.y),
            DVec2::new(wheel_x, half_extents.y),
        ];
        Ok(Self::from_shape(
            BodyShape::Vehicle {
                half_extents,
                wheel_radius: desc.wheel_radius,
                wheel_offsets,
            },
            position,
            velocity,
            color,
            true,
        ))
    }

    pub fn shape(&self) -> &BodyShape {
        &self.shape
    }

    pub fn kind(&self) -> BodyKind {
        self.shape.kind()
    }

    pub fn position(&self) -> DVec2 {
        self.position
    }

    pub fn velocity(&self) -> DVec2 {
        self.velocity
    }

    pub fn set_position(&mut self, position: DVec2) {
        self.position = position;
    }

    pub fn set_velocity(&mut self, velocity: DVec2) {
        self.velocity = velocity;
    }

    /// Adds a velocity change. Static bodies ignore it.
    pub fn apply_impulse(&mut self, delta_velocity: DVec2) {
        if self.is_static() {
            return;
        }
        self.velocity += delta_velocity;
    }

    /// Shape-derived mass; infinite for static bodies.
    pub fn mass(&self) -> f64 {
        if self.is_static() {
            f64::INFINITY
        } else {
            self.mass
        }
    }

    pub fn inverse_mass(&self) -> f64 {
        if self.is_static() || self.mass <= 0.0 {
            0.0
        } else {
            1.0 / self.mass
        }
    }

    pub(crate) fn set_mass(&mut self, mass: f64) {
        self.mass = mass;
    }

    pub fn radius(&self) -> Option<f64> {
        match self.shape {
            BodyShape::Disc { radius } => Some(radius),
            _ => None,
        }
    }

    /// Resizes a disc so its area matches its mass at the material density.
    pub fn recompute_radius_from_mass(&mut self) {
        let density = self.material.density;
        if let BodyShape::Disc { radius } = &mut self.shape {
            *radius = (self.mass / (PI * density)).sqrt();
        }
    }

    pub fn bounding_radius(&self) -> f64 {
        self.shape.bounding_radius()
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn is_static(&self) -> bool {
        !self.is_active
    }

    pub fn is_marked_for_deletion(&self) -> bool {
        self.marked_for_deletion
    }

    pub fn mark_for_deletion(&mut self) {
        self.marked_for_deletion = true;
    }

    /// Participates in force and collision passes this step.
    pub fn is_simulated(&self) -> bool {
        !self.marked_for_deletion
    }

    pub fn spring_connections(&self) -> &[BodyId] {
        &self.spring_connections
    }

    pub fn incoming_spring_connections(&self) -> usize {
        self.incoming_spring_connections
    }

    pub fn is_connected_to(&self, other: BodyId) -> bool {
        self.spring_connections.contains(&other)
    }

    /// Adds an outgoing edge; returns false for self-loops and duplicates.
    pub(crate) fn connect(&mut self, target: BodyId) -> bool {
        if target == self.id || self.is_connected_to(target) {
            return false;
        }
        self.spring_connections.push(target);
        true
    }

    pub(crate) fn disconnect(&mut self, target: BodyId) -> bool {
        let before = self.spring_connections.len();
        self.spring_connections.retain(|id| *id != target);
        before != self.spring_connections.len()
    }

    pub(crate) fn take_spring_connections(&mut self) -> Vec<BodyId> {
        std::mem::take(&mut self.spring_connections)
    }

    pub(crate) fn increment_incoming(&mut self) {
        self.incoming_spring_connections += 1;
    }

    pub(crate) fn decrement_incoming(&mut self) {
        self.incoming_spring_connections = self.incoming_spring_connections.saturating_sub(1);
    }

    /// World-space outline for drawing: polygon or chassis corners, or track points.
    /// Discs and planes have no outline.
    pub fn outline(&self) -> Vec<DVec2> {
        let rotation = DVec2::from_angle(self.angle);
        let to_world = |local: DVec2| self.position + rotation.rotate(local);
        match &self.shape {
            BodyShape::Polygon { vertices } => vertices.iter().map(|v| to_world(*v)).collect(),
            BodyShape::Vehicle { half_extents, .. } => [
                DVec2::new(-half_extents.x, -half_extents.y),
                DVec2::new(half_extents.x, -half_extents.y),
                DVec2::new(half_extents.x, half_extents.y),
                DVec2::new(-half_extents.x, half_extents.y),
            ]
            .into_iter()
            .map(to_world)
            .collect(),
            BodyShape::Track { points, .. } => points.clone(),
            BodyShape::Disc { .. } | BodyShape::Plane { .. } => Vec::new(),
        }
    }

    /// World-space wheel centres and radius of a vehicle.
    pub fn wheels(&self) -> Option<([DVec2; 2], f64)> {
        match &self.shape {
            BodyShape::Vehicle {
                wheel_radius,
                wheel_offsets,
                ..
            } => {
                let rotation = DVec2::from_angle(self.angle);
                let centres = wheel_offsets.map(|offset| self.position + rotation.rotate(offset));
                Some((centres, *wheel_radius))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn disc_mass_is_area() {
        let body = Body::disc(DVec2::ZERO, 10.0, DVec2::ZERO, Color::WHITE, true).unwrap();
        assert_relative_eq!(body.mass(), PI * 100.0);
        assert_relative_eq!(body.inverse_mass(), 1.0 / (PI * 100.0));
    }

    #[test]
    fn invalid_disc_radius_is_rejected() {
        for radius in [0.0, -1.0, f64::NAN] {
            let err = Body::disc(DVec2::ZERO, radius, DVec2::ZERO, Color::WHITE, true).unwrap_err();
            assert!(matches!(err, SandboxError::InvalidShape { .. }));
        }
    }

    #[test]
    fn polygon_validation() {
        let empty = Body::polygon(DVec2::ZERO, DVec2::ZERO, Vec::new(), Color::WHITE, true);
        assert!(matches!(empty, Err(SandboxError::InvalidShape { .. })));

        let collinear = vec![DVec2::ZERO, DVec2::X, DVec2::X * 2.0];
        assert!(Body::polygon(DVec2::ZERO, DVec2::ZERO, collinear, Color::WHITE, true).is_err());

        let triangle = vec![DVec2::new(0.0, 0.0), DVec2::new(4.0, 0.0), DVec2::new(0.0, 3.0)];
        let body = Body::polygon(DVec2::ZERO, DVec2::ZERO, triangle, Color::WHITE, true).unwrap();
        assert_relative_eq!(body.mass(), 6.0);
        assert_relative_eq!(body.bounding_radius(), 4.0);
    }

    #[test]
    fn static_bodies_have_zero_inverse_mass_and_ignore_impulses() {
        let mut body = Body::disc(DVec2::ZERO, 3.0, DVec2::ZERO, Color::WHITE, false).unwrap();
        assert!(body.is_static());
        assert_eq!(body.inverse_mass(), 0.0);
        assert!(body.mass().is_infinite());
        body.apply_impulse(DVec2::new(1.0, 1.0));
        assert_eq!(body.velocity(), DVec2::ZERO);

        let plane = Body::plane(PlaneSide::Bottom, &WorldBounds::default());
        assert!(plane.is_static());
    }

    #[test]
    fn radius_follows_mass() {
        let mut body = Body::disc(DVec2::ZERO, 10.0, DVec2::ZERO, Color::WHITE, true).unwrap();
        let mass = body.mass();
        body.set_mass(mass * 2.0);
        body.recompute_radius_from_mass();
        assert_relative_eq!(body.radius().unwrap(), 10.0 * 2.0_f64.sqrt(), max_relative = 1e-12);
    }

    #[test]
    fn connections_reject_self_and_duplicates() {
        let mut body = Body::disc(DVec2::ZERO, 1.0, DVec2::ZERO, Color::WHITE, true).unwrap();
        body.id = BodyId::new(0, 0);
        let other = BodyId::new(1, 0);
        assert!(!body.connect(body.id));
        assert!(body.connect(other));
        assert!(!body.connect(other));
        assert_eq!(body.spring_connections(), &[other]);
        assert!(body.disconnect(other));
        assert!(!body.disconnect(other));
    }

    #[test]
    fn polygon_outline_rotates_about_position() {
        let square = vec![
            DVec2::new(-1.0, -1.0),
            DVec2::new(1.0, -1.0),
            DVec2::new(1.0, 1.0),
            DVec2::new(-1.0, 1.0),
        ];
        let mut body =
            Body::polygon(DVec2::new(5.0, 5.0), DVec2::ZERO, square, Color::WHITE, true).unwrap();
        body.angle = std::f64::consts::FRAC_PI_2;
        let outline = body.outline();
        assert_relative_eq!(outline[0].x, 6.0, epsilon = 1e-12);
        assert_relative_eq!(outline[0].y, 4.0, epsilon = 1e-12);
    }

    #[test]
    fn vehicle_mass_includes_wheels() {
        let desc = VehicleDesc {
            chassis_width: 10.0,
            chassis_height: 4.0,
            wheel_radius: 1.0,
        };
        let body = Body::vehicle(DVec2::ZERO, DVec2::ZERO, desc, Color::WHITE).unwrap();
        assert_relative_eq!(body.mass(), 40.0 + 2.0 * PI);
        let (centres, radius) = body.wheels().unwrap();
        assert_eq!(radius, 1.0);
        assert_relative_eq!(centres[1].x, 4.0);
        assert_relative_eq!(centres[1].y, 2.0);
    }
}
