// Application state for HTTP handlers
use crate::application::dashboard_service::DashboardService;
use crate::application::ingest_service::IngestService;
use crate::application::streaming_service::StreamingPlaybackService;

#[derive(Clone)]
pub struct AppState {
    pub dashboard_service: DashboardService,
    pub ingest_service: IngestService,
    pub streaming_service: StreamingPlaybackService,
}
