// Ingest service - Use case for replacing a location's readings
use crate::application::snapshot_repository::SnapshotRepository;
use crate::infrastructure::payload_mapper::{PayloadError, snapshot_from_payload};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error(transparent)]
    Payload(#[from] PayloadError),
    #[error(transparent)]
    Repository(#[from] anyhow::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngestSummary {
    pub location: String,
    pub current_variables: Vec<String>,
    pub forecast_variables: Vec<String>,
    pub forecast_hours: usize,
    pub received_at_ms: i64,
    pub replaced: bool,
}

#[derive(Clone)]
pub struct IngestService {
    repository: Arc<dyn SnapshotRepository>,
}

impl IngestService {
    pub fn new(repository: Arc<dyn SnapshotRepository>) -> Self {
        Self { repository }
    }

    /// Parses `body` and replaces the stored snapshot in one step. A payload
    /// that fails to parse leaves the previous snapshot untouched.
    pub async fn ingest(&self, location: &str, body: &[u8]) -> Result<IngestSummary, IngestError> {
        let snapshot = snapshot_from_payload(location, body)?;

        let summary = IngestSummary {
            location: location.to_string(),
            current_variables: snapshot.current.variables().map(str::to_string).collect(),
            forecast_variables: snapshot.forecast.variables().map(str::to_string).collect(),
            forecast_hours: snapshot.forecast_horizon(),
            received_at_ms: snapshot.received_at_ms,
            replaced: false,
        };

        let previous = self.repository.replace_snapshot(snapshot).await?;
        tracing::info!(
            "ingested readings for {} ({} current, {} forecast variables)",
            location,
            summary.current_variables.len(),
            summary.forecast_variables.len()
        );

        Ok(IngestSummary {
            replaced: previous.is_some(),
            ..summary
        })
    }
}
