// Router - HTTP routes and middleware
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    get_aqi, get_legend, get_values, health_check, ingest_readings, list_locations,
    stream_playback,
};
use axum::{
    Router,
    routing::{get, put},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn create_router(state: Arc<AppState>) -> Router {
    // Brotli is applied per handler
    Router::new()
        .route("/healthz", get(health_check))
        .route("/legend", get(get_legend))
        .route("/locations", get(list_locations))
        .route("/locations/:id/readings", put(ingest_readings))
        .route("/locations/:id/aqi", get(get_aqi))
        .route("/locations/:id/values", get(get_values))
        .route("/locations/:id/playback", get(stream_playback))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dashboard_service::DashboardService;
    use crate::application::ingest_service::IngestService;
    use crate::application::streaming_service::StreamingPlaybackService;
    use crate::domain::breakpoint::BreakpointTable;
    use crate::domain::legend::LegendScale;
    use crate::infrastructure::config::PlaybackSettings;
    use crate::infrastructure::memory_repository::MemoryRepository;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn app() -> Router {
        let repository = Arc::new(MemoryRepository::new());
        let breakpoints = Arc::new(BreakpointTable::epa_default());
        let legend = Arc::new(LegendScale::default());

        let state = Arc::new(AppState {
            dashboard_service: DashboardService::new(
                repository.clone(),
                breakpoints.clone(),
                legend.clone(),
            ),
            ingest_service: IngestService::new(repository.clone()),
            streaming_service: StreamingPlaybackService::new(
                repository,
                breakpoints,
                legend,
                PlaybackSettings {
                    tick_ms: 1,
                    ..PlaybackSettings::default()
                },
            ),
        });
        create_router(state)
    }

    fn payload() -> String {
        let forecast: Vec<f64> = (1..=72).map(f64::from).collect();
        json!({
            "air_pollutant": {
                "hourly": {"time": ["t0", "t1"], "pm2_5": [10.0, 40.0]},
                "hourly_units": {"pm2_5": "μg/m³"}
            },
            "weather": {
                "hourly": {"temperature_2m": [30.0, 31.5]},
                "hourly_units": {"temperature_2m": "°C"}
            },
            "prediction_air": json!({"pm2_5": forecast}).to_string()
        })
        .to_string()
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
        let (status, bytes) = send(app, Request::get(uri).body(Body::empty()).unwrap()).await;
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn ingest(app: &Router) {
        let request = Request::put("/locations/hanoi/readings")
            .header("content-type", "application/json")
            .body(Body::from(payload()))
            .unwrap();
        let (status, _) = send(app, request).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_check() {
        let (status, body) = send(&app(), Request::get("/healthz").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"ok");
    }

    #[tokio::test]
    async fn test_ingest_then_query() {
        let app = app();
        ingest(&app).await;

        let (status, locations) = get_json(&app, "/locations").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(locations, json!(["hanoi"]));

        let (status, report) = get_json(&app, "/locations/hanoi/aqi").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(report["aqi"], 112);
        assert_eq!(report["label"], "Now");
        assert_eq!(report["category"], "Unhealthy for Sensitive Groups");

        // Offset 5 -> forecast index 4 -> 5 ug/m3
        let (_, report) = get_json(&app, "/locations/hanoi/aqi?hour=5").await;
        assert_eq!(report["aqi"], 21);
        assert_eq!(report["legend_category"], "Good");

        let (_, values) = get_json(&app, "/locations/hanoi/values?hour=5&vars=pm2_5,temperature_2m").await;
        assert_eq!(values["label"], "+5h");
        assert_eq!(values["values"][0]["value"], 5.0);
        assert_eq!(values["values"][0]["unit"], "μg/m³");
        assert_eq!(values["values"][1]["value"], "--");

        // Clamped to the last forecast hour
        let (_, values) = get_json(&app, "/locations/hanoi/values?hour=500&vars=pm2_5").await;
        assert_eq!(values["hour_offset"], 72);
        assert_eq!(values["values"][0]["value"], 72.0);
    }

    #[tokio::test]
    async fn test_unknown_location_is_404() {
        let (status, body) = get_json(&app(), "/locations/paris/aqi").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_malformed_payload_is_400() {
        let request = Request::put("/locations/hanoi/readings")
            .body(Body::from(r#"{"weather": {}}"#))
            .unwrap();
        let (status, body) = send(&app(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_legend() {
        let (status, legend) = get_json(&app(), "/legend").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(legend["thresholds"], json!([15.0, 35.0, 55.0, 110.0, 250.0]));
        assert_eq!(legend["variable"], "pm2_5");
    }

    #[tokio::test]
    async fn test_bad_query_is_json_400() {
        let app = app();
        ingest(&app).await;

        for uri in [
            "/locations/hanoi/aqi?hour=abc",
            "/locations/hanoi/values?hour=1.5",
            "/locations/hanoi/playback?frames=-1",
        ] {
            let (status, body) = get_json(&app, uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
            assert_eq!(body["code"], "BAD_REQUEST");
            assert!(body["message"].as_str().unwrap().contains("query"), "{}", body);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_playback_stream() {
        let app = app();
        ingest(&app).await;

        let request = Request::get("/locations/hanoi/playback?from=71&frames=3")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);

        let frames: Vec<Value> = body
            .split(|b| *b == b'\n')
            .filter(|line| !line.is_empty())
            .map(|line| serde_json::from_slice(line).unwrap())
            .collect();
        let labels: Vec<&str> = frames
            .iter()
            .map(|frame| frame["values"]["label"].as_str().unwrap())
            .collect();
        assert_eq!(labels, vec!["+71h", "+72h", "Now"]);
    }
}
