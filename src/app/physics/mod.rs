mod forces;
mod quadtree;
mod schedule;

use std::collections::HashMap;
use std::f32::consts::TAU;

use eframe::egui::{Vec2, vec2};

use crate::config::{ForceConfig, LayoutConfig, PhaseStage};
use forces::{
    CollisionScratch, apply_centering, apply_collision, apply_gravity, apply_links, integrate,
};
use schedule::PhaseScheduler;
pub(in crate::app) use schedule::{EdgeFade, ForceStrengths};

/// Stable index of a node for the lifetime of one simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(in crate::app) struct NodeHandle(pub(in crate::app) usize);

impl NodeHandle {
    pub(in crate::app) fn index(self) -> usize {
        self.0
    }
}

pub(in crate::app) struct SimNode {
    pub id: String,
    pub position: Vec2,
    pub velocity: Vec2,
    pub radius: f32,
    pub pin: Option<Vec2>,
}

/// An edge with endpoints resolved once at simulation start; `None` marks an
/// endpoint id that was not part of the node set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(in crate::app) struct SimLink {
    pub source: Option<NodeHandle>,
    pub target: Option<NodeHandle>,
}

impl SimLink {
    pub(in crate::app) fn touches(self, handle: NodeHandle) -> bool {
        self.source == Some(handle) || self.target == Some(handle)
    }
}

/// d3-style power scale, sign preserving. A degenerate domain maps to the
/// bottom of the range.
pub(in crate::app) fn power_scale(value: f32, domain: [f32; 2], range: [f32; 2], exponent: f32) -> f32 {
    let warp = |x: f32| x.signum() * x.abs().powf(exponent);
    let low = warp(domain[0]);
    let high = warp(domain[1]);
    let span = high - low;
    if !span.is_finite() || span.abs() <= f32::EPSILON {
        return range[0];
    }
    let t = ((warp(value) - low) / span).clamp(0.0, 1.0);
    range[0] + (range[1] - range[0]) * t
}

pub(in crate::app) struct Simulation {
    nodes: Vec<SimNode>,
    links: Vec<SimLink>,
    index_by_id: HashMap<String, NodeHandle>,
    degree: Vec<usize>,
    center: Vec2,
    forces: ForceConfig,
    scheduler: PhaseScheduler,
    alpha: f32,
    alpha_target: f32,
    running: bool,
    collision_scratch: CollisionScratch,
}

impl Simulation {
    /// `nodes` are `(id, size)` pairs in display order, `links` are
    /// `(from id, to id)` pairs.
    pub(in crate::app) fn new(
        nodes: &[(String, f32)],
        links: &[(String, String)],
        layout: &LayoutConfig,
        forces: &ForceConfig,
        phases: &[PhaseStage],
    ) -> Self {
        let center = vec2(layout.center[0], layout.center[1]);
        let (min_size, max_size) = nodes.iter().fold(
            (f32::INFINITY, f32::NEG_INFINITY),
            |(min, max), (_, size)| (min.min(*size), max.max(*size)),
        );
        let domain = if min_size.is_finite() {
            [min_size, max_size]
        } else {
            [0.0, 0.0]
        };

        let count = nodes.len();
        let mut index_by_id = HashMap::with_capacity(count);
        let sim_nodes = nodes
            .iter()
            .enumerate()
            .map(|(index, (id, size))| {
                index_by_id.insert(id.clone(), NodeHandle(index));
                let angle = (index as f32 / count as f32) * TAU;
                SimNode {
                    id: id.clone(),
                    position: center + vec2(angle.cos(), angle.sin()) * layout.initial_radius,
                    velocity: Vec2::ZERO,
                    radius: power_scale(
                        *size,
                        domain,
                        forces.radius_range,
                        forces.radius_exponent,
                    ),
                    pin: None,
                }
            })
            .collect::<Vec<_>>();

        let mut degree = vec![0usize; count];
        let sim_links = links
            .iter()
            .map(|(from, to)| {
                let link = SimLink {
                    source: index_by_id.get(from).copied(),
                    target: index_by_id.get(to).copied(),
                };
                if let (Some(source), Some(target)) = (link.source, link.target) {
                    degree[source.index()] += 1;
                    degree[target.index()] += 1;
                } else {
                    tracing::debug!(from = %from, to = %to, "connection references a missing source");
                }
                link
            })
            .collect::<Vec<_>>();

        let running = !sim_nodes.is_empty();
        tracing::debug!(nodes = count, links = sim_links.len(), "simulation started");

        Self {
            nodes: sim_nodes,
            links: sim_links,
            index_by_id,
            degree,
            center,
            forces: forces.clone(),
            scheduler: PhaseScheduler::new(phases.to_vec()),
            alpha: forces.alpha,
            alpha_target: 0.0,
            running,
            collision_scratch: CollisionScratch::new(),
        }
    }

    /// Advances the layout by one step. Returns whether the simulation is
    /// still running afterwards; a stopped simulation ignores ticks.
    pub(in crate::app) fn tick(&mut self) -> bool {
        if !self.running || self.nodes.is_empty() {
            return false;
        }

        self.alpha += (self.alpha_target - self.alpha) * self.forces.alpha_decay;
        let strengths = self.scheduler.advance();

        apply_gravity(
            &mut self.nodes,
            self.center,
            self.forces.gravity_strength,
            self.alpha,
        );
        apply_collision(
            &mut self.nodes,
            self.forces.collision_padding,
            strengths.collision,
            &mut self.collision_scratch,
        );
        apply_links(
            &mut self.nodes,
            &self.links,
            &self.degree,
            self.forces.link_distance,
            strengths.link,
            self.alpha,
        );
        apply_centering(&mut self.nodes, self.center, self.forces.centering_strength);
        integrate(&mut self.nodes, self.forces.velocity_decay);

        if self.alpha < self.forces.alpha_min && self.alpha_target < self.forces.alpha_min {
            self.running = false;
            tracing::debug!(phase = self.scheduler.phase(), "simulation settled");
        }
        self.running
    }

    /// Raises the alpha target and restarts a settled simulation.
    pub(in crate::app) fn reheat(&mut self) {
        self.alpha_target = self.forces.reheat_alpha_target;
        if !self.nodes.is_empty() {
            self.running = true;
        }
    }

    /// Lets the simulation decay back toward rest.
    pub(in crate::app) fn cool(&mut self) {
        self.alpha_target = 0.0;
    }

    pub(in crate::app) fn stop(&mut self) {
        if self.running {
            tracing::debug!(phase = self.scheduler.phase(), "simulation stopped");
        }
        self.running = false;
    }

    pub(in crate::app) fn pin(&mut self, handle: NodeHandle, position: Vec2) {
        if let Some(node) = self.nodes.get_mut(handle.index()) {
            node.pin = Some(position);
            node.position = position;
            node.velocity = Vec2::ZERO;
        }
    }

    pub(in crate::app) fn unpin(&mut self, handle: NodeHandle) {
        if let Some(node) = self.nodes.get_mut(handle.index()) {
            node.pin = None;
        }
    }

    pub(in crate::app) fn is_running(&self) -> bool {
        self.running
    }

    pub(in crate::app) fn alpha(&self) -> f32 {
        self.alpha
    }

    pub(in crate::app) fn phase(&self) -> u32 {
        self.scheduler.phase()
    }

    pub(in crate::app) fn strengths(&self) -> ForceStrengths {
        self.scheduler.strengths()
    }

    pub(in crate::app) fn edges_revealed(&self) -> bool {
        self.scheduler.edges_revealed()
    }

    pub(in crate::app) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(in crate::app) fn nodes(&self) -> impl Iterator<Item = (NodeHandle, &SimNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (NodeHandle(index), node))
    }

    pub(in crate::app) fn node(&self, handle: NodeHandle) -> Option<&SimNode> {
        self.nodes.get(handle.index())
    }

    pub(in crate::app) fn links(&self) -> &[SimLink] {
        &self.links
    }

    pub(in crate::app) fn handle_of(&self, id: &str) -> Option<NodeHandle> {
        self.index_by_id.get(id).copied()
    }

    /// Position of a node, or the origin for a handle that resolves to
    /// nothing.
    pub(in crate::app) fn position_of(&self, handle: Option<NodeHandle>) -> Vec2 {
        handle
            .and_then(|handle| self.node(handle))
            .map(|node| node.position)
            .unwrap_or(Vec2::ZERO)
    }

    pub(in crate::app) fn link_endpoints(&self, link: SimLink) -> (Vec2, Vec2) {
        (self.position_of(link.source), self.position_of(link.target))
    }

    /// Topmost node whose circle contains `world`.
    pub(in crate::app) fn node_at(&self, world: Vec2) -> Option<NodeHandle> {
        self.nodes()
            .filter(|(_, node)| (node.position - world).length_sq() <= node.radius * node.radius)
            .min_by(|(_, a), (_, b)| {
                (a.position - world)
                    .length_sq()
                    .total_cmp(&(b.position - world).length_sq())
            })
            .map(|(handle, _)| handle)
    }
}

impl Drop for Simulation {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GraphConfig;

    fn simulation(nodes: &[(&str, f32)], links: &[(&str, &str)]) -> Simulation {
        let config = GraphConfig::default();
        let nodes = nodes
            .iter()
            .map(|(id, size)| (id.to_string(), *size))
            .collect::<Vec<_>>();
        let links = links
            .iter()
            .map(|(from, to)| (from.to_string(), to.to_string()))
            .collect::<Vec<_>>();
        Simulation::new(
            &nodes,
            &links,
            &config.layout,
            &config.forces,
            &config.phases,
        )
    }

    fn settle(simulation: &mut Simulation) -> usize {
        let mut ticks = 0;
        while simulation.tick() {
            ticks += 1;
            assert!(ticks < 5_000, "simulation never settled");
        }
        ticks
    }

    fn center() -> Vec2 {
        let [x, y] = GraphConfig::default().layout.center;
        vec2(x, y)
    }

    #[test]
    fn radius_is_monotonic_in_size() {
        let sizes = [0.0, 1.0, 3.0, 10.0, 250.0, 10_000.0];
        let radii = sizes
            .iter()
            .map(|size| power_scale(*size, [0.0, 10_000.0], [10.0, 30.0], 0.3))
            .collect::<Vec<_>>();
        for pair in radii.windows(2) {
            assert!(pair[1] >= pair[0]);
        }
        assert_eq!(radii[0], 10.0);
        assert!((radii[5] - 30.0).abs() < 1e-4);
    }

    #[test]
    fn node_radii_follow_sizes() {
        let simulation = simulation(&[("a", 5.0), ("b", 50.0), ("c", 500.0)], &[]);
        let radii = simulation
            .nodes()
            .map(|(_, node)| node.radius)
            .collect::<Vec<_>>();
        assert_eq!(radii[0], 10.0);
        assert!(radii[0] <= radii[1] && radii[1] <= radii[2]);
        assert!((radii[2] - 30.0).abs() < 1e-4);
    }

    #[test]
    fn initial_positions_form_a_ring() {
        let simulation = simulation(&[("a", 1.0), ("b", 1.0), ("c", 1.0), ("d", 1.0)], &[]);
        let radius = GraphConfig::default().layout.initial_radius;
        for (_, node) in simulation.nodes() {
            assert!(((node.position - center()).length() - radius).abs() < 1e-3);
        }
        let first = simulation.node(NodeHandle(0)).expect("first node");
        assert!((first.position - (center() + vec2(radius, 0.0))).length() < 1e-3);
    }

    #[test]
    fn empty_bucket_is_a_no_op() {
        let mut simulation = simulation(&[], &[]);
        assert_eq!(simulation.len(), 0);
        assert!(!simulation.is_running());
        assert!(!simulation.tick());
        simulation.reheat();
        assert!(!simulation.tick());
        assert_eq!(simulation.phase(), 0);
        assert_eq!(simulation.node_at(Vec2::ZERO), None);
    }

    #[test]
    fn single_node_settles_at_center() {
        let mut simulation = simulation(&[("only", 10.0)], &[]);
        let node = simulation.node(NodeHandle(0)).expect("node");
        assert_eq!(node.radius, 10.0);

        settle(&mut simulation);
        assert!(simulation.alpha() < GraphConfig::default().forces.alpha_min);
        let node = simulation.node(NodeHandle(0)).expect("node");
        assert!((node.position - center()).length() < 1.0);
    }

    #[test]
    fn linked_pair_converges_to_link_distance() {
        let mut simulation = simulation(&[("a", 10.0), ("b", 10.0)], &[("a", "b")]);
        settle(&mut simulation);

        let (a, b) = simulation.link_endpoints(simulation.links()[0]);
        let distance = (a - b).length();
        assert!(
            (distance - 200.0).abs() <= 10.0,
            "distance {distance} is not near the link distance"
        );
    }

    #[test]
    fn collision_keeps_crowded_nodes_apart() {
        let ids = (0..12).map(|index| format!("n{index}")).collect::<Vec<_>>();
        let nodes = ids.iter().map(|id| (id.as_str(), 10.0)).collect::<Vec<_>>();
        let mut simulation = simulation(&nodes, &[]);
        settle(&mut simulation);

        let positions = simulation
            .nodes()
            .map(|(_, node)| node.position)
            .collect::<Vec<_>>();
        for (i, a) in positions.iter().enumerate() {
            for b in positions.iter().skip(i + 1) {
                assert!((*a - *b).length() > 15.0);
            }
        }
    }

    #[test]
    fn phase_advances_once_per_tick() {
        let mut simulation = simulation(&[("a", 1.0), ("b", 2.0)], &[("a", "b")]);
        let mut previous = simulation.phase();
        for _ in 0..60 {
            simulation.tick();
            assert_eq!(simulation.phase(), previous + 1);
            previous = simulation.phase();
        }
        assert!(simulation.edges_revealed());
    }

    #[test]
    fn reheat_restarts_without_resetting_phase() {
        let mut simulation = simulation(&[("a", 1.0), ("b", 2.0)], &[("a", "b")]);
        let ticks = settle(&mut simulation) as u32;
        assert!(!simulation.is_running());

        simulation.reheat();
        assert!(simulation.tick());
        assert_eq!(simulation.phase(), ticks + 2);

        simulation.cool();
        settle(&mut simulation);
        assert!(!simulation.is_running());
    }

    #[test]
    fn pinned_node_stays_on_its_pin() {
        let mut simulation = simulation(&[("a", 1.0), ("b", 2.0), ("c", 3.0)], &[("a", "b")]);
        let pin = vec2(-300.0, 125.0);
        simulation.pin(NodeHandle(0), pin);
        for _ in 0..120 {
            simulation.tick();
            assert_eq!(simulation.node(NodeHandle(0)).expect("node").position, pin);
        }

        simulation.unpin(NodeHandle(0));
        simulation.reheat();
        simulation.tick();
        assert_ne!(simulation.node(NodeHandle(0)).expect("node").position, pin);
    }

    #[test]
    fn missing_link_endpoint_resolves_to_origin() {
        let mut simulation = simulation(&[("a", 1.0)], &[("a", "ghost"), ("ghost", "a")]);
        let links = simulation.links().to_vec();
        assert_eq!(links[0].target, None);
        assert_eq!(simulation.link_endpoints(links[0]).1, Vec2::ZERO);
        assert_eq!(simulation.link_endpoints(links[1]).0, Vec2::ZERO);
        settle(&mut simulation);
    }

    #[test]
    fn stop_cancels_the_run() {
        let mut simulation = simulation(&[("a", 1.0), ("b", 1.0)], &[]);
        simulation.stop();
        let before = simulation.node(NodeHandle(0)).expect("node").position;
        assert!(!simulation.tick());
        assert_eq!(simulation.node(NodeHandle(0)).expect("node").position, before);
    }

    #[test]
    fn node_at_hits_within_radius_only() {
        let simulation = simulation(&[("a", 1.0), ("b", 1.0)], &[]);
        let position = simulation.node(NodeHandle(1)).expect("node").position;
        assert_eq!(simulation.node_at(position + vec2(3.0, 0.0)), Some(NodeHandle(1)));
        assert_eq!(simulation.node_at(position + vec2(0.0, 40.0)), None);
    }
}
