// In-memory snapshot repository
use crate::application::snapshot_repository::SnapshotRepository;
use crate::domain::series::ReadingSnapshot;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Holds one immutable snapshot per location. Writers build the whole
/// snapshot first and swap it in under the write lock, so readers observe
/// either the previous or the new snapshot.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    snapshots: RwLock<HashMap<String, Arc<ReadingSnapshot>>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SnapshotRepository for MemoryRepository {
    async fn list_locations(&self) -> Result<Vec<String>> {
        let snapshots = self.snapshots.read().await;
        let mut locations: Vec<String> = snapshots.keys().cloned().collect();
        locations.sort();
        Ok(locations)
    }

    async fn get_snapshot(&self, location: &str) -> Result<Option<Arc<ReadingSnapshot>>> {
        Ok(self.snapshots.read().await.get(location).cloned())
    }

    async fn replace_snapshot(&self, snapshot: ReadingSnapshot) -> Result<Option<Arc<ReadingSnapshot>>> {
        let location = snapshot.location.clone();
        let snapshot = Arc::new(snapshot);
        let previous = self.snapshots.write().await.insert(location.clone(), snapshot);

        tracing::debug!(
            "stored snapshot for {} (replaced: {})",
            location,
            previous.is_some()
        );
        Ok(previous)
    }
}
