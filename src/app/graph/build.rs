use crate::bucket::BucketSnapshot;
use crate::config::GraphConfig;

use super::super::physics::Simulation;

/// Lays out a fresh simulation for `snapshot`. Sources keep their fetch
/// order, which fixes their place on the starting ring.
pub(in crate::app) fn build_simulation(snapshot: &BucketSnapshot, config: &GraphConfig) -> Simulation {
    let nodes = snapshot
        .sources
        .iter()
        .map(|source| (source.source_id.clone(), source.size_metric()))
        .collect::<Vec<_>>();
    let links = snapshot
        .connections
        .iter()
        .map(|connection| {
            (
                connection.from_source_id.clone(),
                connection.to_source_id.clone(),
            )
        })
        .collect::<Vec<_>>();

    Simulation::new(
        &nodes,
        &links,
        &config.layout,
        &config.forces,
        &config.phases,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bucket::{Connection, ConnectionData, Source, SourceType};

    fn source(id: &str, size: Option<f64>) -> Source {
        Source {
            source_id: id.to_owned(),
            bucket_id: Some("b1".to_owned()),
            name: format!("Source {id}"),
            kind: SourceType::Website,
            size,
            url: None,
            created: String::new(),
            updated: String::new(),
        }
    }

    fn connection(from: &str, to: &str) -> Connection {
        Connection {
            connection_id: None,
            from_source_id: from.to_owned(),
            to_source_id: to.to_owned(),
            data: ConnectionData {
                name: None,
                description: String::new(),
            },
        }
    }

    #[test]
    fn snapshot_maps_onto_nodes_and_links() {
        let snapshot = BucketSnapshot {
            bucket_id: "b1".to_owned(),
            sources: vec![source("a", Some(4.0)), source("b", None), source("c", Some(900.0))],
            connections: vec![connection("a", "b"), connection("b", "gone")],
        };
        let simulation = build_simulation(&snapshot, &GraphConfig::default());

        assert_eq!(simulation.len(), 3);
        assert_eq!(simulation.links().len(), 2);

        let a = simulation.handle_of("a").expect("a");
        let b = simulation.handle_of("b").expect("b");
        let c = simulation.handle_of("c").expect("c");
        assert_eq!(simulation.links()[0].source, Some(a));
        assert_eq!(simulation.links()[0].target, Some(b));
        assert_eq!(simulation.links()[1].target, None);

        let radius = |handle| simulation.node(handle).expect("node").radius;
        assert_eq!(radius(b), 10.0);
        assert!(radius(a) > radius(b));
        assert!((radius(c) - 30.0).abs() < 1e-4);
    }

    #[test]
    fn new_snapshot_restarts_phase() {
        let snapshot = BucketSnapshot {
            bucket_id: "b1".to_owned(),
            sources: vec![source("a", Some(1.0)), source("b", Some(2.0))],
            connections: vec![connection("a", "b")],
        };
        let config = GraphConfig::default();

        let mut first = build_simulation(&snapshot, &config);
        for _ in 0..60 {
            first.tick();
        }
        assert!(first.edges_revealed());
        first.stop();

        let second = build_simulation(&snapshot, &config);
        assert_eq!(second.phase(), 0);
        assert!(!second.edges_revealed());
        assert!(second.is_running());
    }
}
