use glam::DVec2;

use super::ccd::CCDDetector;
use crate::{
    core::body::{Body, BodyShape},
    utils::{allocator::BodyId, math},
};

/// Contact between two bodies found within the current step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub body_a: BodyId,
    pub body_b: BodyId,
    /// Unit normal pointing from `body_a` towards `body_b`.
    pub normal: DVec2,
    /// Fraction of the step at which the shapes first touch.
    pub time_of_impact: f64,
}

/// Shape-pair dispatch for contact generation.
pub struct NarrowPhase;

impl NarrowPhase {
    pub fn collide(a: &Body, b: &Body, dt: f64, ccd: &CCDDetector) -> Option<Contact> {
        if a.is_static() && b.is_static() {
            return None;
        }

        match (a.shape(), b.shape()) {
            (BodyShape::Plane { normal, offset, .. }, _) => {
                Self::circle_plane(b, *normal, *offset, dt, ccd)
                    .map(|(n, t)| Self::contact(a, b, -n, t))
            }
            (_, BodyShape::Plane { normal, offset, .. }) => {
                Self::circle_plane(a, *normal, *offset, dt, ccd)
                    .map(|(n, t)| Self::contact(a, b, n, t))
            }
            (BodyShape::Track { points, thickness }, _) => {
                Self::circle_track(b, points, *thickness, dt, ccd)
                    .map(|(n, t)| Self::contact(a, b, -n, t))
            }
            (_, BodyShape::Track { points, thickness }) => {
                Self::circle_track(a, points, *thickness, dt, ccd)
                    .map(|(n, t)| Self::contact(a, b, n, t))
            }
            _ => Self::circle_circle(a, b, dt, ccd),
        }
    }

    fn contact(a: &Body, b: &Body, normal: DVec2, time_of_impact: f64) -> Contact {
        Contact {
            body_a: a.id,
            body_b: b.id,
            normal,
            time_of_impact,
        }
    }

    /// Discs, polygons and vehicles all collide as their bounding circles.
    fn circle_circle(a: &Body, b: &Body, dt: f64, ccd: &CCDDetector) -> Option<Contact> {
        let relative_position = b.position() - a.position();
        let relative_velocity = b.velocity() - a.velocity();
        let radius_sum = a.bounding_radius() + b.bounding_radius();

        let t = ccd.circle_circle(relative_position, relative_velocity, radius_sum, dt)?;

        let at_impact = relative_position + relative_velocity * dt * t;
        let normal = at_impact
            .try_normalize()
            .or_else(|| (-relative_velocity).try_normalize())?;

        Some(Self::contact(a, b, normal, t))
    }

    /// Returns the normal pointing from the circle into the plane.
    fn circle_plane(
        circle: &Body,
        plane_normal: DVec2,
        plane_offset: f64,
        dt: f64,
        ccd: &CCDDetector,
    ) -> Option<(DVec2, f64)> {
        let distance = plane_normal.dot(circle.position()) - plane_offset;
        let normal_velocity = plane_normal.dot(circle.velocity());
        ccd.circle_plane(distance, normal_velocity, circle.bounding_radius(), dt)
            .map(|t| (-plane_normal, t))
    }

    /// Earliest contact against any segment of the track, treating each segment
    /// locally as a plane through its closest point.
    fn circle_track(
        circle: &Body,
        points: &[DVec2],
        thickness: f64,
        dt: f64,
        ccd: &CCDDetector,
    ) -> Option<(DVec2, f64)> {
        let position = circle.position();
        let velocity = circle.velocity();
        let reach = circle.bounding_radius() + thickness * 0.5;
        let end = position + velocity * dt;

        points
            .windows(2)
            .filter_map(|segment| {
                let (a, b) = (segment[0], segment[1]);
                let closest = math::closest_point_on_segment(position, a, b);
                let end_closest = math::closest_point_on_segment(end, a, b);
                let near = position.distance(closest) <= reach || end.distance(end_closest) <= reach;
                if !near && !math::segments_intersect(position, end, a, b) {
                    return None;
                }

                let away = (position - closest)
                    .try_normalize()
                    .or_else(|| (b - a).perp().try_normalize())?;
                let distance = (position - closest).dot(away);
                let t = ccd.circle_plane(distance, velocity.dot(away), reach, dt)?;
                Some((-away, t))
            })
            .min_by(|lhs, rhs| lhs.1.total_cmp(&rhs.1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::WorldBounds,
        core::types::{Color, PlaneSide},
    };

    fn disc(id: u32, x: f64, y: f64, vx: f64, vy: f64, radius: f64) -> Body {
        let mut body = Body::disc(DVec2::new(x, y), radius, DVec2::new(vx, vy), Color::WHITE, true)
            .expect("valid disc");
        body.id = BodyId::new(id, 0);
        body
    }

    #[test]
    fn head_on_discs_produce_axis_normal() {
        let a = disc(0, 0.0, 0.0, 5.0, 0.0, 10.0);
        let b = disc(1, 21.0, 0.0, -5.0, 0.0, 10.0);
        let contact = NarrowPhase::collide(&a, &b, 1.0, &CCDDetector::new()).expect("impact");
        assert_eq!(contact.normal, DVec2::X);
        assert!((contact.time_of_impact - 0.1).abs() < 1e-12);
    }

    #[test]
    fn disc_falling_onto_bottom_plane() {
        let bounds = WorldBounds::default();
        let mut floor = Body::plane(PlaneSide::Bottom, &bounds);
        floor.id = BodyId::new(1, 0);
        let ball = disc(0, 100.0, bounds.height - 12.0, 0.0, 10.0, 5.0);

        let contact = NarrowPhase::collide(&ball, &floor, 1.0, &CCDDetector::new()).expect("impact");
        assert_eq!(contact.normal, DVec2::Y);
        assert!((contact.time_of_impact - 0.7).abs() < 1e-9);

        let reversed = NarrowPhase::collide(&floor, &ball, 1.0, &CCDDetector::new()).expect("impact");
        assert_eq!(reversed.normal, DVec2::NEG_Y);
    }

    #[test]
    fn disc_resting_on_track_segment() {
        let mut track = Body::track(
            vec![DVec2::new(0.0, 100.0), DVec2::new(100.0, 100.0)],
            4.0,
            Color::WHITE,
        )
        .unwrap();
        track.id = BodyId::new(1, 0);
        let ball = disc(0, 50.0, 95.0, 0.0, 3.0, 5.0);

        let contact = NarrowPhase::collide(&ball, &track, 1.0, &CCDDetector::new()).expect("touching");
        assert_eq!(contact.time_of_impact, 0.0);
        assert_eq!(contact.normal, DVec2::Y);

        let far = disc(2, 50.0, 20.0, 0.0, 3.0, 5.0);
        assert!(NarrowPhase::collide(&far, &track, 1.0, &CCDDetector::new()).is_none());

        let fast = disc(3, 50.0, 20.0, 0.0, 200.0, 5.0);
        let contact = NarrowPhase::collide(&fast, &track, 1.0, &CCDDetector::new()).expect("swept hit");
        assert!((contact.time_of_impact - 73.0 / 200.0).abs() < 1e-9);
    }

    #[test]
    fn static_pairs_are_ignored() {
        let bounds = WorldBounds::default();
        let left = Body::plane(PlaneSide::Left, &bounds);
        let top = Body::plane(PlaneSide::Top, &bounds);
        assert!(NarrowPhase::collide(&left, &top, 1.0, &CCDDetector::new()).is_none());
    }
}
