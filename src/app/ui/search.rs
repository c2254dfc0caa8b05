use std::collections::HashSet;
use std::sync::Arc;

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::bucket::BucketSnapshot;

use super::super::physics::{NodeHandle, Simulation};
use super::super::{SearchMatchCache, ViewModel};

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
}

/// Sources whose name fuzzily matches `query`, best first. Ties keep
/// fetch order.
pub(in crate::app) fn rank_matches(
    snapshot: &BucketSnapshot,
    simulation: &Simulation,
    query: &str,
) -> Vec<(i64, NodeHandle)> {
    let query = query.trim();
    if query.is_empty() {
        return Vec::new();
    }

    let matcher = SkimMatcherV2::default();
    let mut ranked = snapshot
        .sources
        .iter()
        .filter_map(|source| {
            let score = fuzzy_match_score(&matcher, &source.name, query)?;
            Some((score, simulation.handle_of(&source.source_id)?))
        })
        .collect::<Vec<_>>();
    ranked.sort_by(|a, b| b.0.cmp(&a.0));
    ranked
}

impl ViewModel {
    pub(in crate::app) fn search_matches(&mut self) -> Option<Arc<HashSet<NodeHandle>>> {
        let query = self.search.trim();
        if query.is_empty() {
            return None;
        }

        if let Some(cached) = &self.search_match_cache
            && cached.revision == self.revision
            && cached.query == query
        {
            return Some(Arc::clone(&cached.matches));
        }

        let ranked = rank_matches(&self.snapshot, &self.simulation, query);
        let matches = Arc::new(ranked.iter().map(|(_, handle)| *handle).collect::<HashSet<_>>());
        self.search_match_cache = Some(SearchMatchCache {
            query: query.to_owned(),
            revision: self.revision,
            matches: Arc::clone(&matches),
            best: ranked.first().map(|(_, handle)| *handle),
        });

        Some(matches)
    }

    /// Selects and zooms to the best search hit.
    pub(in crate::app) fn focus_best_match(&mut self, now: f64) {
        if self.search_matches().is_none() {
            return;
        }
        let Some(best) = self
            .search_match_cache
            .as_ref()
            .and_then(|cached| cached.best)
        else {
            return;
        };
        let Some(source_id) = self.simulation.node(best).map(|node| node.id.clone()) else {
            return;
        };

        self.interaction.focus_node(best, &self.simulation, now);
        tracing::debug!(source_id = %source_id, query = %self.search, "focused search match");
        self.interaction.select(Some(source_id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::graph::build_simulation;
    use crate::bucket::{Source, SourceType};
    use crate::config::GraphConfig;

    fn source(id: &str, name: &str) -> Source {
        Source {
            source_id: id.to_owned(),
            bucket_id: None,
            name: name.to_owned(),
            kind: SourceType::Note,
            size: None,
            url: None,
            created: String::new(),
            updated: String::new(),
        }
    }

    fn snapshot() -> BucketSnapshot {
        BucketSnapshot {
            bucket_id: "b".to_owned(),
            sources: vec![
                source("1", "Attention Is All You Need"),
                source("2", "Graph drawing by force-directed placement"),
                source("3", "Force layout notes"),
            ],
            connections: Vec::new(),
        }
    }

    #[test]
    fn blank_query_matches_nothing() {
        let snapshot = snapshot();
        let simulation = build_simulation(&snapshot, &GraphConfig::default());
        assert!(rank_matches(&snapshot, &simulation, "  ").is_empty());
    }

    #[test]
    fn matches_are_case_insensitive_and_ranked() {
        let snapshot = snapshot();
        let simulation = build_simulation(&snapshot, &GraphConfig::default());
        let ranked = rank_matches(&snapshot, &simulation, "FORCE");
        let handles = ranked.iter().map(|(_, handle)| *handle).collect::<HashSet<_>>();

        assert_eq!(ranked.len(), 2);
        assert!(handles.contains(&simulation.handle_of("2").expect("2")));
        assert!(handles.contains(&simulation.handle_of("3").expect("3")));
        assert!(ranked.windows(2).all(|pair| pair[0].0 >= pair[1].0));
    }
}
