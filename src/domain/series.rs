// Hourly time series and the per-location reading snapshot
use std::collections::HashMap;

/// Hourly samples; `None` marks a null sample in the source data.
pub type Samples = Vec<Option<f64>>;

/// Variable name -> ordered hourly samples, kept in first-insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeSeries {
    variables: Vec<(String, Samples)>,
}

impl TimeSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a variable. A replaced variable keeps its position.
    pub fn insert(&mut self, variable: impl Into<String>, samples: Samples) {
        let variable = variable.into();
        match self.variables.iter_mut().find(|(name, _)| *name == variable) {
            Some((_, existing)) => *existing = samples,
            None => self.variables.push((variable, samples)),
        }
    }

    pub fn get(&self, variable: &str) -> Option<&[Option<f64>]> {
        self.variables
            .iter()
            .find(|(name, _)| name == variable)
            .map(|(_, samples)| samples.as_slice())
    }

    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.variables.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Longest sample run across all variables.
    pub fn horizon(&self) -> usize {
        self.variables
            .iter()
            .map(|(_, samples)| samples.len())
            .max()
            .unwrap_or(0)
    }
}

impl<S: Into<String>> FromIterator<(S, Samples)> for TimeSeries {
    fn from_iter<T: IntoIterator<Item = (S, Samples)>>(iter: T) -> Self {
        let mut series = TimeSeries::new();
        for (variable, samples) in iter {
            series.insert(variable, samples);
        }
        series
    }
}

/// Everything known about one location after a single upstream response.
///
/// Snapshots are never mutated once built: a new response produces a new
/// snapshot which replaces the old one as a whole.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadingSnapshot {
    pub location: String,
    /// Observed hourly values, latest last.
    pub current: TimeSeries,
    /// Predicted values, hour +1 first.
    pub forecast: TimeSeries,
    pub units: HashMap<String, String>,
    pub received_at_ms: i64,
}

impl ReadingSnapshot {
    pub fn new(location: impl Into<String>, current: TimeSeries, forecast: TimeSeries) -> Self {
        Self {
            location: location.into(),
            current,
            forecast,
            units: HashMap::new(),
            received_at_ms: chrono::Utc::now().timestamp_millis(),
        }
    }

    pub fn with_units(mut self, units: HashMap<String, String>) -> Self {
        self.units = units;
        self
    }

    pub fn unit(&self, variable: &str) -> &str {
        self.units.get(variable).map(String::as_str).unwrap_or("")
    }

    /// Current variables first, then forecast-only ones, without duplicates.
    pub fn variables(&self) -> Vec<&str> {
        let mut variables: Vec<&str> = self.current.variables().collect();
        for variable in self.forecast.variables() {
            if !variables.contains(&variable) {
                variables.push(variable);
            }
        }
        variables
    }

    pub fn forecast_horizon(&self) -> usize {
        self.forecast.horizon()
    }
}
