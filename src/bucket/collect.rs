use anyhow::{Context, Result};

use super::model::{Connection, Source};
use super::store::SourceStore;

/// Everything the graph needs from one fetch of a bucket.
#[derive(Clone, Debug, Default)]
pub struct BucketSnapshot {
    pub bucket_id: String,
    pub sources: Vec<Source>,
    pub connections: Vec<Connection>,
}

impl BucketSnapshot {
    pub fn source(&self, source_id: &str) -> Option<&Source> {
        self.sources
            .iter()
            .find(|source| source.source_id == source_id)
    }

    pub fn connections_of<'a>(
        &'a self,
        source_id: &'a str,
    ) -> impl Iterator<Item = &'a Connection> + 'a {
        self.connections
            .iter()
            .filter(move |connection| connection.touches(source_id))
    }
}

pub fn collect_bucket(store: &dyn SourceStore, bucket_id: &str) -> Result<BucketSnapshot> {
    let sources = store
        .fetch_sources(bucket_id)
        .with_context(|| format!("failed to fetch sources for bucket {bucket_id}"))?;
    let connections = store
        .fetch_connections(bucket_id)
        .with_context(|| format!("failed to fetch connections for bucket {bucket_id}"))?;

    tracing::debug!(
        bucket_id,
        sources = sources.len(),
        connections = connections.len(),
        "collected bucket"
    );

    Ok(BucketSnapshot {
        bucket_id: bucket_id.to_owned(),
        sources,
        connections,
    })
}

/// Deletes a source and returns the refetched bucket.
///
/// The caller keeps rendering its current snapshot until this returns; a
/// failed delete therefore leaves the graph exactly as it was.
pub fn delete_and_refetch(
    store: &dyn SourceStore,
    bucket_id: &str,
    source_id: &str,
) -> Result<BucketSnapshot> {
    store
        .delete_source(bucket_id, source_id)
        .with_context(|| format!("failed to delete source {source_id}"))?;
    tracing::info!(bucket_id, source_id, "deleted source");
    collect_bucket(store, bucket_id)
}
