// Repository trait for reading snapshots
use crate::domain::series::ReadingSnapshot;
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait SnapshotRepository: Send + Sync {
    /// List all location ids that have a snapshot
    async fn list_locations(&self) -> anyhow::Result<Vec<String>>;

    /// Latest snapshot for a location
    async fn get_snapshot(&self, location: &str) -> anyhow::Result<Option<Arc<ReadingSnapshot>>>;

    /// Replace the snapshot for `snapshot.location` as a whole, returning the previous one
    async fn replace_snapshot(
        &self,
        snapshot: ReadingSnapshot,
    ) -> anyhow::Result<Option<Arc<ReadingSnapshot>>>;
}
