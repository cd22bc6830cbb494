use crate::{
    core::body::Body,
    utils::allocator::{Arena, BodyId},
};

/// All-pairs broad phase over the live body set.
///
/// Every unordered pair with at least one dynamic member is a candidate, except
/// pairs of finite shapes whose swept bounding circles cannot meet during the step.
#[derive(Debug, Default)]
pub struct BroadPhase {
    pairs: Vec<(BodyId, BodyId)>,
    pub pruned_last_step: usize,
}

impl BroadPhase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn candidate_pairs(&mut self, bodies: &Arena<Body>, dt: f64) -> &[(BodyId, BodyId)] {
        self.pairs.clear();
        self.pruned_last_step = 0;

        let live: Vec<&Body> = bodies.values().filter(|body| body.is_simulated()).collect();
        for (i, a) in live.iter().enumerate() {
            for b in &live[i + 1..] {
                if a.is_static() && b.is_static() {
                    continue;
                }
                if Self::cannot_meet(a, b, dt) {
                    self.pruned_last_step += 1;
                    continue;
                }
                self.pairs.push((a.id, b.id));
            }
        }

        &self.pairs
    }

    fn cannot_meet(a: &Body, b: &Body, dt: f64) -> bool {
        let reach = a.bounding_radius() + b.bounding_radius();
        if !reach.is_finite() {
            return false;
        }
        let travel = (b.velocity() - a.velocity()).length() * dt.abs();
        a.position().distance(b.position()) > reach + travel
    }
}
