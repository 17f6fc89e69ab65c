// Application layer - Use cases over snapshots
pub mod dashboard_service;
pub mod ingest_service;
pub mod snapshot_repository;
pub mod streaming_service;
