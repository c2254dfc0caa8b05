mod collect;
mod model;
mod store;

pub use collect::{BucketSnapshot, collect_bucket, delete_and_refetch};
pub use model::Source;
#[cfg(test)]
pub use model::{Connection, ConnectionData, SourceType};
pub use store::{JsonBucketStore, SourceStore};
