use eframe::egui::{Vec2, vec2};

use crate::util::jiggle;

use super::quadtree::CollisionTree;
use super::{SimLink, SimNode};

/// Weak pull of every node toward the layout center, scaled by alpha.
pub(super) fn apply_gravity(nodes: &mut [SimNode], center: Vec2, strength: f32, alpha: f32) {
    let scale = strength * alpha;
    if scale == 0.0 {
        return;
    }
    for node in nodes {
        node.velocity += (center - node.position) * scale;
    }
}

/// Shifts the whole cloud so its centroid drifts toward the center. Not
/// scaled by alpha.
pub(super) fn apply_centering(nodes: &mut [SimNode], center: Vec2, strength: f32) {
    if nodes.is_empty() || strength == 0.0 {
        return;
    }

    let mut centroid = Vec2::ZERO;
    for node in nodes.iter() {
        centroid += node.position;
    }
    centroid /= nodes.len() as f32;

    let shift = (centroid - center) * strength;
    for node in nodes {
        node.position -= shift;
    }
}

/// Springs between linked nodes. The lighter-connected endpoint moves more.
pub(super) fn apply_links(
    nodes: &mut [SimNode],
    links: &[SimLink],
    degree: &[usize],
    distance: f32,
    strength: f32,
    alpha: f32,
) {
    if strength == 0.0 {
        return;
    }

    for (link_index, link) in links.iter().enumerate() {
        let (Some(source), Some(target)) = (link.source, link.target) else {
            continue;
        };
        let (source, target) = (source.index(), target.index());
        if source == target || source >= nodes.len() || target >= nodes.len() {
            continue;
        }

        let source_next = nodes[source].position + nodes[source].velocity;
        let target_next = nodes[target].position + nodes[target].velocity;
        let mut delta = target_next - source_next;
        if delta.x == 0.0 {
            delta.x = jiggle(link_index * 2 + 1);
        }
        if delta.y == 0.0 {
            delta.y = jiggle(link_index * 2 + 2);
        }

        let length = delta.length();
        let correction = delta * ((length - distance) / length * alpha * strength);

        let source_degree = degree.get(source).copied().unwrap_or(1).max(1) as f32;
        let target_degree = degree.get(target).copied().unwrap_or(1).max(1) as f32;
        let bias = source_degree / (source_degree + target_degree);

        nodes[target].velocity -= correction * bias;
        nodes[source].velocity += correction * (1.0 - bias);
    }
}

pub(super) struct CollisionScratch {
    predicted: Vec<Vec2>,
    radii: Vec<f32>,
    candidates: Vec<usize>,
}

impl CollisionScratch {
    pub(super) fn new() -> Self {
        Self {
            predicted: Vec::new(),
            radii: Vec::new(),
            candidates: Vec::new(),
        }
    }
}

/// Pushes overlapping circles apart, judged on where they are about to be.
pub(super) fn apply_collision(
    nodes: &mut [SimNode],
    padding: f32,
    strength: f32,
    scratch: &mut CollisionScratch,
) {
    if strength == 0.0 || nodes.len() < 2 {
        return;
    }

    scratch.predicted.clear();
    scratch.radii.clear();
    for node in nodes.iter() {
        scratch.predicted.push(node.position + node.velocity);
        scratch.radii.push(node.radius + padding);
    }

    let Some(tree) = CollisionTree::build(&scratch.predicted, &scratch.radii) else {
        return;
    };

    for index in 0..nodes.len() {
        let radius = scratch.radii[index];
        let point = nodes[index].position + nodes[index].velocity;

        scratch.candidates.clear();
        tree.visit_candidates(scratch.predicted[index], radius, &mut |other| {
            if other > index {
                scratch.candidates.push(other);
            }
        });

        let radius_sq = radius * radius;
        for &other in &scratch.candidates {
            let other_radius = scratch.radii[other];
            let reach = radius + other_radius;
            let mut delta = point - nodes[other].position - nodes[other].velocity;
            let distance_sq = delta.length_sq();
            if distance_sq >= reach * reach {
                continue;
            }

            if delta.x == 0.0 {
                delta.x = jiggle(index * 31 + other);
            }
            if delta.y == 0.0 {
                delta.y = jiggle(other * 31 + index);
            }
            let distance = delta.length();
            let push = delta * ((reach - distance) / distance * strength);

            let other_sq = other_radius * other_radius;
            let share = other_sq / (radius_sq + other_sq);
            nodes[index].velocity += push * share;
            nodes[other].velocity -= push * (1.0 - share);
        }
    }
}

pub(super) fn integrate(nodes: &mut [SimNode], velocity_decay: f32) {
    let keep = 1.0 - velocity_decay;
    for node in nodes {
        if let Some(pin) = node.pin {
            node.position = pin;
            node.velocity = Vec2::ZERO;
        } else {
            node.velocity *= keep;
            node.position += node.velocity;
        }
    }
}
