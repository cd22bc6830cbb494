//! Collision response: positional overlap correction, restitution bounce and merging.

use glam::DVec2;

use crate::{
    core::body::{Body, BodyKind},
    utils::math,
};

/// Pushes two overlapping discs apart along their centre line, half the overlap
/// each. A static disc stays put and its partner takes the whole correction.
/// Coincident centres have no separating axis and are left alone.
pub fn correct_overlap(a: &mut Body, b: &mut Body) -> bool {
    let (Some(radius_a), Some(radius_b)) = (a.radius(), b.radius()) else {
        return false;
    };
    let offset = b.position() - a.position();
    let distance = offset.length();
    let overlap = radius_a + radius_b - distance;
    if overlap <= 0.0 || distance == 0.0 {
        return false;
    }

    let axis = offset / distance;
    let (share_a, share_b) = match (a.is_static(), b.is_static()) {
        (true, true) => return false,
        (true, false) => (0.0, 1.0),
        (false, true) => (1.0, 0.0),
        (false, false) => (0.5, 0.5),
    };
    a.set_position(a.position() - axis * overlap * share_a);
    b.set_position(b.position() + axis * overlap * share_b);
    true
}

/// One-dimensional collision with restitution, written in inverse masses so a
/// static partner (inverse mass 0) acts as an immovable wall.
///
/// Returns the post-collision velocities of both bodies.
pub fn partially_elastic_collision(
    v_a: f64,
    v_b: f64,
    inverse_mass_a: f64,
    inverse_mass_b: f64,
    restitution: f64,
) -> (f64, f64) {
    let total = inverse_mass_a + inverse_mass_b;
    if total <= 0.0 {
        return (v_a, v_b);
    }
    let momentum_part = inverse_mass_b * v_a + inverse_mass_a * v_b;
    let new_a = (momentum_part + inverse_mass_a * restitution * (v_b - v_a)) / total;
    let new_b = (momentum_part + inverse_mass_b * restitution * (v_a - v_b)) / total;
    (new_a, new_b)
}

/// Reflects the normal velocity components of a contacting pair.
///
/// `normal` points from `a` to `b`. Pairs already separating along the normal
/// are left untouched. Returns whether velocities changed.
pub fn bounce(a: &mut Body, b: &mut Body, normal: DVec2) -> bool {
    let inverse_mass_a = a.inverse_mass();
    let inverse_mass_b = b.inverse_mass();
    if inverse_mass_a + inverse_mass_b <= 0.0 {
        return false;
    }

    let frame_a = math::to_normal_frame(a.velocity(), normal);
    let frame_b = math::to_normal_frame(b.velocity(), normal);
    if frame_b.x - frame_a.x >= 0.0 {
        return false;
    }

    let restitution = a.material.combined_restitution(&b.material);
    let (normal_a, normal_b) =
        partially_elastic_collision(frame_a.x, frame_b.x, inverse_mass_a, inverse_mass_b, restitution);

    if !a.is_static() {
        a.set_velocity(math::from_normal_frame(DVec2::new(normal_a, frame_a.y), normal));
    }
    if !b.is_static() {
        b.set_velocity(math::from_normal_frame(DVec2::new(normal_b, frame_b.y), normal));
    }
    true
}

/// Both bodies are dynamic discs, the only pairs that can merge.
pub fn can_merge(a: &Body, b: &Body) -> bool {
    a.kind() == BodyKind::Disc
        && b.kind() == BodyKind::Disc
        && !a.is_static()
        && !b.is_static()
        && !a.is_marked_for_deletion()
        && !b.is_marked_for_deletion()
}

/// Which side of the pair survived a merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeSurvivor {
    A,
    B,
}

/// The heavier disc absorbs the lighter one (ties go to `a`). The survivor takes
/// the mass-weighted centroid, momentum-conserving velocity and mass-weighted
/// color, the summed mass and the matching radius; the other is flagged for deletion.
pub fn merge(a: &mut Body, b: &mut Body) -> MergeSurvivor {
    let (big, small, survivor) = if a.mass() >= b.mass() {
        (a, b, MergeSurvivor::A)
    } else {
        (b, a, MergeSurvivor::B)
    };

    let big_mass = big.mass();
    let small_mass = small.mass();
    let total = big_mass + small_mass;

    let centroid = (big.position() * big_mass + small.position() * small_mass) / total;
    let velocity = (big.velocity() * big_mass + small.velocity() * small_mass) / total;

    big.set_position(centroid);
    big.set_velocity(velocity);
    big.color = big.color.mass_weighted(big_mass, small.color, small_mass);
    big.set_mass(total);
    big.recompute_radius_from_mass();
    small.mark_for_deletion();

    survivor
}
