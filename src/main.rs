// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use tracing_subscriber::EnvFilter;

use crate::application::dashboard_service::DashboardService;
use crate::application::ingest_service::IngestService;
use crate::application::streaming_service::StreamingPlaybackService;
use crate::infrastructure::config::{load_breakpoint_table, load_legend_scale, load_server_config};
use crate::infrastructure::memory_repository::MemoryRepository;
use crate::presentation::app_state::AppState;
use crate::presentation::router::create_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let server_config = load_server_config()?;
    let breakpoints = Arc::new(load_breakpoint_table()?);
    let legend = Arc::new(load_legend_scale()?);
    tracing::info!(
        "loaded breakpoints for {:?}, legend for {}",
        breakpoints.pollutants().collect::<Vec<_>>(),
        legend.variable
    );

    // Create repository (infrastructure layer)
    let repository = Arc::new(MemoryRepository::new());

    // Create services (application layer)
    let dashboard_service =
        DashboardService::new(repository.clone(), breakpoints.clone(), legend.clone());
    let ingest_service = IngestService::new(repository.clone());
    let streaming_service = StreamingPlaybackService::new(
        repository,
        breakpoints,
        legend,
        server_config.playback.clone(),
    );

    // Create application state
    let state = Arc::new(AppState {
        dashboard_service,
        ingest_service,
        streaming_service,
    });

    // Build router (presentation layer)
    let router = create_router(state);

    // Start server
    let addr: SocketAddr = server_config.server.bind_address.parse()?;
    tracing::info!("Starting air-quality-dashboard service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
