// Mapper from the upstream reading payload to domain snapshots
use crate::domain::series::{ReadingSnapshot, Samples, TimeSeries};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("malformed reading payload: {0}")]
    Malformed(#[source] serde_json::Error),
    #[error("{field} is not valid embedded JSON: {source}")]
    EmbeddedJson {
        field: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("{field} must be a JSON object")]
    NotAnObject { field: &'static str },
}

#[derive(Debug, Deserialize)]
struct ReadingsPayload {
    air_pollutant: SourceSection,
    weather: SourceSection,
    #[serde(default)]
    prediction_air: Option<Value>,
    #[serde(default)]
    prediction_weather: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct SourceSection {
    #[serde(default)]
    hourly: Map<String, Value>,
    #[serde(default)]
    hourly_units: Map<String, Value>,
}

/// Parse a raw payload into a snapshot for `location`.
///
/// Variables that are not numeric series (e.g. the `time` column) are
/// skipped. Predictions may be inline objects or JSON-encoded strings.
pub fn snapshot_from_payload(location: &str, body: &[u8]) -> Result<ReadingSnapshot, PayloadError> {
    let payload: ReadingsPayload = serde_json::from_slice(body).map_err(PayloadError::Malformed)?;

    let mut current = TimeSeries::new();
    append_series(&mut current, "air_pollutant.hourly", &payload.air_pollutant.hourly);
    append_series(&mut current, "weather.hourly", &payload.weather.hourly);

    let mut forecast = TimeSeries::new();
    let prediction_air = prediction_map("prediction_air", payload.prediction_air)?;
    append_series(&mut forecast, "prediction_air", &prediction_air);
    let prediction_weather = prediction_map("prediction_weather", payload.prediction_weather)?;
    append_series(&mut forecast, "prediction_weather", &prediction_weather);

    let mut units = HashMap::new();
    for section in [&payload.air_pollutant, &payload.weather] {
        for (variable, unit) in &section.hourly_units {
            if let Some(unit) = unit.as_str() {
                units.insert(variable.clone(), unit.to_string());
            }
        }
    }

    tracing::debug!(
        "parsed payload for {}: {} current, {} forecast variables",
        location,
        current.len(),
        forecast.len()
    );

    Ok(ReadingSnapshot::new(location, current, forecast).with_units(units))
}

fn prediction_map(field: &'static str, value: Option<Value>) -> Result<Map<String, Value>, PayloadError> {
    let value = match value {
        None | Some(Value::Null) => return Ok(Map::new()),
        // Some producers ship predictions as a JSON document inside a string
        Some(Value::String(encoded)) => serde_json::from_str(&encoded)
            .map_err(|source| PayloadError::EmbeddedJson { field, source })?,
        Some(value) => value,
    };

    match value {
        Value::Object(map) => Ok(map),
        _ => Err(PayloadError::NotAnObject { field }),
    }
}

fn append_series(series: &mut TimeSeries, source: &str, variables: &Map<String, Value>) {
    for (variable, values) in variables {
        match samples_from(values) {
            Some(samples) => series.insert(variable.clone(), samples),
            None => tracing::debug!("skipping non-numeric {} variable {}", source, variable),
        }
    }
}

/// Arrays are taken as-is; objects keyed by hour label are taken in
/// document order.
fn samples_from(values: &Value) -> Option<Samples> {
    let items: Vec<&Value> = match values {
        Value::Array(items) => items.iter().collect(),
        Value::Object(items) => items.values().collect(),
        _ => return None,
    };

    items
        .into_iter()
        .map(|item| match item {
            Value::Null => Some(None),
            Value::Number(number) => number.as_f64().map(Some),
            _ => None,
        })
        .collect()
}
