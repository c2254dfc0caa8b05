use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result, anyhow, bail};
use serde::{Deserialize, Serialize};

use super::model::{Connection, Source};

/// Backend seam for bucket contents.
///
/// Implementations are called from background workers, never from the frame
/// loop, so they are free to block.
pub trait SourceStore: Send + Sync {
    fn fetch_sources(&self, bucket_id: &str) -> Result<Vec<Source>>;
    fn fetch_connections(&self, bucket_id: &str) -> Result<Vec<Connection>>;
    fn delete_source(&self, bucket_id: &str, source_id: &str) -> Result<()>;
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BucketDocument {
    bucket_id: String,
    #[serde(default)]
    sources: Vec<Source>,
    #[serde(default)]
    connections: Vec<Connection>,
}

/// A bucket persisted as one JSON document on disk.
pub struct JsonBucketStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonBucketStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the bucket id stored in the document, used when none is given
    /// on the command line.
    pub fn bucket_id(&self) -> Result<String> {
        Ok(self.read_document()?.bucket_id)
    }

    fn read_document(&self) -> Result<BucketDocument> {
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read bucket file {}", self.path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("invalid bucket JSON in {}", self.path.display()))
    }

    fn read_bucket(&self, bucket_id: &str) -> Result<BucketDocument> {
        let document = self.read_document()?;
        if document.bucket_id != bucket_id {
            bail!(
                "bucket {bucket_id} not found in {} (file holds {})",
                self.path.display(),
                document.bucket_id
            );
        }
        Ok(document)
    }

    fn write_document(&self, document: &BucketDocument) -> Result<()> {
        let data =
            serde_json::to_string_pretty(document).context("failed to serialize bucket JSON")?;
        fs::write(&self.path, data)
            .with_context(|| format!("failed to write bucket file {}", self.path.display()))
    }
}

impl SourceStore for JsonBucketStore {
    fn fetch_sources(&self, bucket_id: &str) -> Result<Vec<Source>> {
        Ok(self.read_bucket(bucket_id)?.sources)
    }

    fn fetch_connections(&self, bucket_id: &str) -> Result<Vec<Connection>> {
        Ok(self.read_bucket(bucket_id)?.connections)
    }

    fn delete_source(&self, bucket_id: &str, source_id: &str) -> Result<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| anyhow!("bucket store lock poisoned"))?;

        let mut document = self.read_bucket(bucket_id)?;
        let before = document.sources.len();
        document
            .sources
            .retain(|source| source.source_id != source_id);
        if document.sources.len() == before {
            bail!("source {source_id} does not exist in bucket {bucket_id}");
        }

        // Connections die with either endpoint.
        document
            .connections
            .retain(|connection| !connection.touches(source_id));

        self.write_document(&document)
    }
}
