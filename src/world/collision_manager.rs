use log::debug;

use crate::{
    collision::{
        broadphase::BroadPhase,
        ccd::CCDDetector,
        narrowphase::NarrowPhase,
        response::{self, MergeSurvivor},
    },
    config::CollisionType,
    core::body::Body,
    utils::allocator::Arena,
};

/// Counts produced by one collision pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CollisionSummary {
    pub bounces: usize,
    pub merges: usize,
}

pub struct CollisionManager {
    pub broadphase: BroadPhase,
    pub ccd: CCDDetector,
}

impl Default for CollisionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl CollisionManager {
    pub fn new() -> Self {
        Self {
            broadphase: BroadPhase::new(),
            ccd: CCDDetector::new(),
        }
    }

    /// Runs detection and response once over every candidate pair.
    ///
    /// In merge mode dynamic disc pairs that touch within the step are merged
    /// and never bounced. Everything else gets overlap correction followed by a
    /// restitution bounce at the contact normal. Bodies merged away earlier in
    /// the pass are skipped for the remaining pairs.
    pub fn resolve(
        &mut self,
        bodies: &mut Arena<Body>,
        collision_type: CollisionType,
        dt: f64,
    ) -> CollisionSummary {
        let mut summary = CollisionSummary::default();
        let pairs = self.broadphase.candidate_pairs(bodies, dt);

        for &(id_a, id_b) in pairs {
            let Some((a, b)) = bodies.get2_mut(id_a, id_b) else {
                continue;
            };
            if !a.is_simulated() || !b.is_simulated() {
                continue;
            }

            if collision_type == CollisionType::Merge && response::can_merge(a, b) {
                if discs_meet(&self.ccd, a, b, dt) {
                    let survivor = match response::merge(a, b) {
                        MergeSurvivor::A => id_a,
                        MergeSurvivor::B => id_b,
                    };
                    debug!("merged {id_a} and {id_b} into {survivor}");
                    summary.merges += 1;
                }
                continue;
            }

            response::correct_overlap(a, b);
            if let Some(contact) = NarrowPhase::collide(a, b, dt, &self.ccd) {
                if response::bounce(a, b, contact.normal) {
                    summary.bounces += 1;
                }
            }
        }

        summary
    }
}

/// Whether two discs overlap now or touch within the step. Merging needs no
/// contact normal, so coincident centres count.
fn discs_meet(ccd: &CCDDetector, a: &Body, b: &Body, dt: f64) -> bool {
    let (Some(radius_a), Some(radius_b)) = (a.radius(), b.radius()) else {
        return false;
    };
    ccd.circle_circle(
        b.position() - a.position(),
        b.velocity() - a.velocity(),
        radius_a + radius_b,
        dt,
    )
    .is_some()
}
