// HTTP request handlers
use crate::domain::selector::HourOffset;
use crate::infrastructure::chunked_json::stream_from_receiver;
use crate::infrastructure::http_response::{accepts_brotli, json_response};
use crate::presentation::app_state::AppState;
use crate::presentation::error::AppError;
use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequestParts, Path, Query, State},
    http::{HeaderMap, request::Parts},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// `Query` whose rejections use the JSON error body
pub struct ApiQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(ApiQuery(value)),
            Err(rejection) => Err(AppError::BadRequest(rejection.body_text())),
        }
    }
}

#[derive(Deserialize)]
pub struct HourQuery {
    pub hour: Option<i64>,
    /// Comma separated variable names
    pub vars: Option<String>,
}

#[derive(Deserialize)]
pub struct PlaybackQuery {
    pub from: Option<i64>,
    pub frames: Option<usize>,
}

fn parse_variables(vars: Option<&str>) -> Option<Vec<String>> {
    let variables: Vec<String> = vars?
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect();

    if variables.is_empty() { None } else { Some(variables) }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// List all locations with readings
pub async fn list_locations(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response, AppError> {
    let locations = state.dashboard_service.list_locations().await?;
    Ok(json_response(&locations, accepts_brotli(&headers)).await?)
}

/// Replace the readings of a location with a fresh upstream payload
pub async fn ingest_readings(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Response, AppError> {
    let summary = state.ingest_service.ingest(&id, &body).await?;
    Ok(json_response(&summary, false).await?)
}

/// Overall AQI at an hour offset
pub async fn get_aqi(
    Path(id): Path<String>,
    ApiQuery(query): ApiQuery<HourQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response, AppError> {
    let offset = HourOffset::clamped(query.hour.unwrap_or(0));
    let report = state
        .dashboard_service
        .aqi_report(&id, offset)
        .await?
        .ok_or_else(|| AppError::unknown_location(&id))?;

    Ok(json_response(&report, accepts_brotli(&headers)).await?)
}

/// Variable values at an hour offset
pub async fn get_values(
    Path(id): Path<String>,
    ApiQuery(query): ApiQuery<HourQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response, AppError> {
    let offset = HourOffset::clamped(query.hour.unwrap_or(0));
    let variables = parse_variables(query.vars.as_deref());
    let selection = state
        .dashboard_service
        .values(&id, variables.as_deref(), offset)
        .await?
        .ok_or_else(|| AppError::unknown_location(&id))?;

    Ok(json_response(&selection, accepts_brotli(&headers)).await?)
}

/// Legend display scale
pub async fn get_legend(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response, AppError> {
    Ok(json_response(state.dashboard_service.legend(), accepts_brotli(&headers)).await?)
}

/// Stream forecast playback frames (progressive loading)
pub async fn stream_playback(
    Path(id): Path<String>,
    ApiQuery(query): ApiQuery<PlaybackQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response, AppError> {
    let from = HourOffset::clamped(query.from.unwrap_or(0));
    let frames = state.streaming_service.frame_limit(query.frames);

    let rx = state
        .streaming_service
        .stream_playback(&id, from, frames)
        .await?
        .ok_or_else(|| AppError::unknown_location(&id))?;

    Ok(stream_from_receiver(rx, accepts_brotli(&headers))
        .await
        .into_response())
}
