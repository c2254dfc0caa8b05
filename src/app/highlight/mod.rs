use std::collections::HashSet;

use eframe::egui::Color32;

use crate::config::HighlightConfig;

use super::physics::{NodeHandle, SimLink};
use super::theme::Palette;

/// Nodes one edge away from `focus`, from a single pass over `links`.
/// Direction is ignored and dangling endpoints are skipped.
pub(in crate::app) fn neighbors(links: &[SimLink], focus: NodeHandle) -> HashSet<NodeHandle> {
    let mut found = HashSet::new();
    for link in links {
        if link.source == Some(focus)
            && let Some(target) = link.target
        {
            found.insert(target);
        }
        if link.target == Some(focus)
            && let Some(source) = link.source
        {
            found.insert(source);
        }
    }
    found
}

pub(in crate::app) struct Highlight {
    focus: NodeHandle,
    neighbors: HashSet<NodeHandle>,
}

impl Highlight {
    pub(in crate::app) fn compute(links: &[SimLink], focus: NodeHandle) -> Self {
        Self {
            focus,
            neighbors: neighbors(links, focus),
        }
    }

    pub(in crate::app) fn focus(&self) -> NodeHandle {
        self.focus
    }

    pub(in crate::app) fn is_active(&self, handle: NodeHandle) -> bool {
        handle == self.focus || self.neighbors.contains(&handle)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct NodeStyle {
    pub opacity: f32,
    pub color: Color32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct LabelStyle {
    pub opacity: f32,
    pub color: Color32,
    pub nudge: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct EdgeStyle {
    pub opacity: f32,
    pub color: Color32,
    pub width: f32,
}

pub(in crate::app) fn node_style(
    highlight: Option<&Highlight>,
    handle: NodeHandle,
    palette: &Palette,
    config: &HighlightConfig,
) -> NodeStyle {
    match highlight {
        Some(highlight) if highlight.is_active(handle) => NodeStyle {
            opacity: 1.0,
            color: palette.node_active,
        },
        Some(_) => NodeStyle {
            opacity: config.dim_opacity,
            color: palette.node,
        },
        None => NodeStyle {
            opacity: 1.0,
            color: palette.node,
        },
    }
}

pub(in crate::app) fn label_style(
    highlight: Option<&Highlight>,
    handle: NodeHandle,
    palette: &Palette,
    config: &HighlightConfig,
) -> LabelStyle {
    match highlight {
        Some(highlight) if highlight.is_active(handle) => LabelStyle {
            opacity: 1.0,
            color: palette.text_active,
            nudge: if highlight.focus() == handle {
                config.label_nudge
            } else {
                0.0
            },
        },
        Some(_) => LabelStyle {
            opacity: config.dim_opacity,
            color: palette.text,
            nudge: 0.0,
        },
        None => LabelStyle {
            opacity: 1.0,
            color: palette.text,
            nudge: 0.0,
        },
    }
}

/// `reveal` is the edge fade-in progress in `[0, 1]`; hidden edges stay
/// hidden even while hovering.
pub(in crate::app) fn edge_style(
    highlight: Option<&Highlight>,
    link: SimLink,
    reveal: f32,
    palette: &Palette,
    config: &HighlightConfig,
) -> EdgeStyle {
    let reveal = reveal.clamp(0.0, 1.0);
    match highlight {
        Some(highlight) if link.touches(highlight.focus()) => EdgeStyle {
            opacity: reveal,
            color: palette.edge_active,
            width: config.edge_active_width,
        },
        Some(_) => EdgeStyle {
            opacity: reveal * config.dim_opacity,
            color: palette.edge,
            width: config.edge_dim_width,
        },
        None => EdgeStyle {
            opacity: reveal * config.edge_opacity,
            color: palette.edge,
            width: config.edge_width,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::theme::ThemeName;

    fn link(source: Option<usize>, target: Option<usize>) -> SimLink {
        SimLink {
            source: source.map(NodeHandle),
            target: target.map(NodeHandle),
        }
    }

    fn links() -> Vec<SimLink> {
        vec![
            link(Some(0), Some(1)),
            link(Some(2), Some(0)),
            link(Some(1), Some(3)),
            link(Some(0), None),
            link(None, Some(0)),
            link(Some(4), Some(4)),
        ]
    }

    #[test]
    fn neighbor_set_is_exactly_adjacent_nodes() {
        let found = neighbors(&links(), NodeHandle(0));
        assert_eq!(found, HashSet::from([NodeHandle(1), NodeHandle(2)]));

        let found = neighbors(&links(), NodeHandle(3));
        assert_eq!(found, HashSet::from([NodeHandle(1)]));

        assert!(neighbors(&links(), NodeHandle(9)).is_empty());
    }

    #[test]
    fn neighbor_set_matches_definition() {
        let links = links();
        for focus in 0..6 {
            let focus = NodeHandle(focus);
            let expected = links
                .iter()
                .filter_map(|link| match (link.source, link.target) {
                    (Some(source), Some(target)) if source == focus => Some(target),
                    (Some(source), Some(target)) if target == focus => Some(source),
                    _ => None,
                })
                .collect::<HashSet<_>>();
            assert_eq!(neighbors(&links, focus), expected);
        }
    }

    #[test]
    fn hover_dims_unrelated_nodes() {
        let palette = Palette::for_theme(ThemeName::Dark);
        let config = HighlightConfig::default();
        let highlight = Highlight::compute(&links(), NodeHandle(0));

        let focus = node_style(Some(&highlight), NodeHandle(0), &palette, &config);
        let neighbor = node_style(Some(&highlight), NodeHandle(2), &palette, &config);
        let other = node_style(Some(&highlight), NodeHandle(3), &palette, &config);
        let idle = node_style(None, NodeHandle(3), &palette, &config);

        assert_eq!(focus.color, palette.node_active);
        assert_eq!(neighbor.opacity, 1.0);
        assert_eq!(other.opacity, 0.3);
        assert_eq!(other.color, palette.node);
        assert_eq!(idle, NodeStyle { opacity: 1.0, color: palette.node });
    }

    #[test]
    fn only_hovered_label_is_nudged() {
        let palette = Palette::for_theme(ThemeName::Light);
        let config = HighlightConfig::default();
        let highlight = Highlight::compute(&links(), NodeHandle(0));

        assert_eq!(label_style(Some(&highlight), NodeHandle(0), &palette, &config).nudge, 10.0);
        assert_eq!(label_style(Some(&highlight), NodeHandle(1), &palette, &config).nudge, 0.0);
        assert_eq!(label_style(None, NodeHandle(0), &palette, &config).nudge, 0.0);
    }

    #[test]
    fn incident_edges_are_thicker() {
        let palette = Palette::for_theme(ThemeName::Dark);
        let config = HighlightConfig::default();
        let highlight = Highlight::compute(&links(), NodeHandle(0));

        let incident = edge_style(Some(&highlight), link(Some(2), Some(0)), 1.0, &palette, &config);
        let other = edge_style(Some(&highlight), link(Some(1), Some(3)), 1.0, &palette, &config);
        let idle = edge_style(None, link(Some(1), Some(3)), 1.0, &palette, &config);

        assert!(incident.width > idle.width && idle.width > other.width);
        assert_eq!(incident.color, palette.edge_active);
        assert_eq!(incident.opacity, 1.0);
        assert!(other.opacity < idle.opacity);
    }

    #[test]
    fn unrevealed_edges_stay_hidden() {
        let palette = Palette::for_theme(ThemeName::Dark);
        let config = HighlightConfig::default();
        let highlight = Highlight::compute(&links(), NodeHandle(0));
        let style = edge_style(Some(&highlight), link(Some(0), Some(1)), 0.0, &palette, &config);
        assert_eq!(style.opacity, 0.0);
    }
}
