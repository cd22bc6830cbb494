//! Directed spring graph stored as per-body adjacency lists.
//!
//! Each body owns its outgoing edge list and an incoming counter. Edges are
//! added by [`SpringGraph::grow`] and removed either when they stretch past the
//! maximum length or when an endpoint is deleted.

use glam::DVec2;
use log::debug;

use super::forces::{DampedSpring, SpringOutcome};
use crate::{
    config::SimulationConfig,
    core::body::Body,
    utils::allocator::{Arena, BodyId},
};

#[derive(Debug, Default)]
pub struct SpringGraph {
    candidates: Vec<(BodyId, DVec2)>,
    impulses: Vec<(BodyId, DVec2)>,
    severed: Vec<(BodyId, BodyId)>,
    pub formed_last_step: usize,
    pub severed_last_step: usize,
}

impl SpringGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Connects every ordered pair of dynamic bodies closer than the formation
    /// distance, as long as the source has outgoing capacity and the target has
    /// incoming capacity. Pairs are visited in arena order and capacities are
    /// re-read after every new edge.
    pub fn grow(&mut self, bodies: &mut Arena<Body>, config: &SimulationConfig) -> usize {
        let cap = config.spring_max_connections;
        let threshold = config.spring_formation_distance;

        self.candidates.clear();
        self.candidates.extend(
            bodies
                .iter()
                .filter(|(_, body)| body.is_simulated() && !body.is_static())
                .map(|(id, body)| (id, body.position())),
        );

        let mut formed = 0;
        for &(source, source_position) in &self.candidates {
            if outgoing(bodies, source) >= cap {
                continue;
            }
            for &(target, target_position) in &self.candidates {
                if source == target {
                    continue;
                }
                if outgoing(bodies, source) >= cap {
                    break;
                }
                let Some(target_body) = bodies.get(target) else {
                    continue;
                };
                if target_body.incoming_spring_connections() >= cap {
                    continue;
                }
                if source_position.distance(target_position) >= threshold {
                    continue;
                }

                let connected = bodies
                    .get_mut(source)
                    .is_some_and(|body| body.connect(target));
                if connected {
                    if let Some(target_body) = bodies.get_mut(target) {
                        target_body.increment_incoming();
                    }
                    formed += 1;
                }
            }
        }

        self.formed_last_step = formed;
        formed
    }

    /// Evaluates every edge against the state at the start of the pass, then
    /// applies the resulting impulses and removes overstretched edges.
    pub fn apply_forces(&mut self, bodies: &mut Arena<Body>, spring: &DampedSpring, dt: f64) -> usize {
        self.impulses.clear();
        self.severed.clear();

        for (source_id, source) in bodies.iter() {
            if !source.is_simulated() || source.is_static() {
                continue;
            }
            for &target_id in source.spring_connections() {
                let Some(target) = bodies.get(target_id) else {
                    continue;
                };
                match spring.evaluate(
                    source.position(),
                    source.velocity(),
                    source.mass(),
                    target.position(),
                    target.velocity(),
                    dt,
                ) {
                    SpringOutcome::Impulse(delta) => self.impulses.push((source_id, delta)),
                    SpringOutcome::Sever => self.severed.push((source_id, target_id)),
                    SpringOutcome::Degenerate => {}
                }
            }
        }

        for &(id, delta) in &self.impulses {
            if let Some(body) = bodies.get_mut(id) {
                body.apply_impulse(delta);
            }
        }

        for &(source, target) in &self.severed {
            let removed = bodies
                .get_mut(source)
                .is_some_and(|body| body.disconnect(target));
            if removed {
                if let Some(body) = bodies.get_mut(target) {
                    body.decrement_incoming();
                }
            }
        }

        if !self.severed.is_empty() {
            debug!("severed {} overstretched springs", self.severed.len());
        }
        self.severed_last_step = self.severed.len();
        self.severed.len()
    }

    /// Removes every edge touching `id` and fixes up the counters of the other
    /// endpoints. Must run before the body leaves the arena.
    pub fn detach(bodies: &mut Arena<Body>, id: BodyId) {
        let outgoing = bodies
            .get_mut(id)
            .map(|body| body.take_spring_connections())
            .unwrap_or_default();
        for target in outgoing {
            if let Some(body) = bodies.get_mut(target) {
                body.decrement_incoming();
            }
        }
        for body in bodies.values_mut() {
            body.disconnect(id);
        }
    }

    pub fn edges(bodies: &Arena<Body>) -> impl Iterator<Item = (BodyId, BodyId)> + '_ {
        bodies.iter().flat_map(|(id, body)| {
            body.spring_connections().iter().map(move |target| (id, *target))
        })
    }

    pub fn edge_count(bodies: &Arena<Body>) -> usize {
        bodies.values().map(|body| body.spring_connections().len()).sum()
    }
}

fn outgoing(bodies: &Arena<Body>, id: BodyId) -> usize {
    bodies
        .get(id)
        .map_or(0, |body| body.spring_connections().len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Color;

    fn arena_with(positions: &[(f64, f64)]) -> (Arena<Body>, Vec<BodyId>) {
        let mut arena = Arena::new();
        let ids = positions
            .iter()
            .map(|&(x, y)| {
                let id = arena.insert(
                    Body::disc(DVec2::new(x, y), 1.0, DVec2::ZERO, Color::WHITE, true).unwrap(),
                );
                arena.get_mut(id).unwrap().id = id;
                id
            })
            .collect();
        (arena, ids)
    }

    fn config(cap: usize) -> SimulationConfig {
        SimulationConfig {
            spring_max_connections: cap,
            spring_formation_distance: 50.0,
            ..SimulationConfig::quiescent()
        }
    }

    #[test]
    fn nearby_pairs_connect_both_ways() {
        let (mut arena, ids) = arena_with(&[(0.0, 0.0), (10.0, 0.0), (500.0, 0.0)]);
        let mut graph = SpringGraph::new();
        assert_eq!(graph.grow(&mut arena, &config(10)), 2);

        let a = arena.get(ids[0]).unwrap();
        let b = arena.get(ids[1]).unwrap();
        assert!(a.is_connected_to(ids[1]));
        assert!(b.is_connected_to(ids[0]));
        assert_eq!(a.incoming_spring_connections(), 1);
        assert!(arena.get(ids[2]).unwrap().spring_connections().is_empty());

        // Already connected pairs are not duplicated.
        assert_eq!(graph.grow(&mut arena, &config(10)), 0);
    }

    #[test]
    fn degree_caps_hold() {
        let (mut arena, ids) = arena_with(&[(0.0, 0.0), (5.0, 0.0), (10.0, 0.0), (15.0, 0.0)]);
        let mut graph = SpringGraph::new();
        graph.grow(&mut arena, &config(1));

        for id in &ids {
            let body = arena.get(*id).unwrap();
            assert!(body.spring_connections().len() <= 1);
            assert!(body.incoming_spring_connections() <= 1);
        }
        let incoming: usize = arena.values().map(|b| b.incoming_spring_connections()).sum();
        assert_eq!(incoming, SpringGraph::edge_count(&arena));
    }

    #[test]
    fn static_bodies_are_never_connected() {
        let (mut arena, ids) = arena_with(&[(0.0, 0.0)]);
        let wall = arena.insert(
            Body::disc(DVec2::new(5.0, 0.0), 1.0, DVec2::ZERO, Color::WHITE, false).unwrap(),
        );
        arena.get_mut(wall).unwrap().id = wall;

        SpringGraph::new().grow(&mut arena, &config(10));
        assert!(arena.get(ids[0]).unwrap().spring_connections().is_empty());
        assert_eq!(arena.get(wall).unwrap().incoming_spring_connections(), 0);
    }

    #[test]
    fn overstretched_edge_is_severed() {
        let (mut arena, ids) = arena_with(&[(0.0, 0.0), (10.0, 0.0)]);
        let mut graph = SpringGraph::new();
        graph.grow(&mut arena, &config(10));
        arena.get_mut(ids[1]).unwrap().set_position(DVec2::new(200.0, 0.0));

        let spring = DampedSpring {
            stiffness: 1.0,
            damping: 0.0,
            rest_length: 10.0,
            max_length: 150.0,
        };
        assert_eq!(graph.apply_forces(&mut arena, &spring, 1.0), 2);
        assert_eq!(SpringGraph::edge_count(&arena), 0);
        for id in &ids {
            let body = arena.get(*id).unwrap();
            assert_eq!(body.incoming_spring_connections(), 0);
            assert_eq!(body.velocity(), DVec2::ZERO);
        }
    }

    #[test]
    fn forces_are_computed_from_the_pass_start() {
        let (mut arena, ids) = arena_with(&[(0.0, 0.0), (20.0, 0.0)]);
        let mut graph = SpringGraph::new();
        graph.grow(&mut arena, &config(10));

        let spring = DampedSpring {
            stiffness: 1.0,
            damping: 1.0,
            rest_length: 10.0,
            max_length: 0.0,
        };
        graph.apply_forces(&mut arena, &spring, 1.0);

        let a = arena.get(ids[0]).unwrap().velocity();
        let b = arena.get(ids[1]).unwrap().velocity();
        assert!(a.x > 0.0);
        assert!((a.x + b.x).abs() < 1e-12);
    }

    #[test]
    fn detach_leaves_no_dangling_edges() {
        let (mut arena, ids) = arena_with(&[(0.0, 0.0), (5.0, 0.0), (10.0, 0.0)]);
        SpringGraph::new().grow(&mut arena, &config(10));

        SpringGraph::detach(&mut arena, ids[1]);
        arena.remove(ids[1]);

        assert!(SpringGraph::edges(&arena).all(|(a, b)| arena.contains(a) && arena.contains(b)));
        assert_eq!(arena.get(ids[0]).unwrap().incoming_spring_connections(), 1);
        assert_eq!(arena.get(ids[2]).unwrap().incoming_spring_connections(), 1);
        assert_eq!(SpringGraph::edge_count(&arena), 2);
    }
}
