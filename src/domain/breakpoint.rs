// Breakpoint tables - concentration ranges mapped onto AQI index ranges
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// A closed concentration interval mapped linearly onto an index interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Breakpoint {
    pub low_concentration: f64,
    pub high_concentration: f64,
    pub low_index: u16,
    pub high_index: u16,
}

impl Breakpoint {
    pub const fn new(
        low_concentration: f64,
        high_concentration: f64,
        low_index: u16,
        high_index: u16,
    ) -> Self {
        Self {
            low_concentration,
            high_concentration,
            low_index,
            high_index,
        }
    }

    /// Inclusive on both ends. NaN never matches.
    pub fn contains(&self, concentration: f64) -> bool {
        self.low_concentration <= concentration && concentration <= self.high_concentration
    }

    fn interpolate(&self, concentration: f64) -> u16 {
        let span = self.high_concentration - self.low_concentration;
        if span == 0.0 {
            return self.low_index;
        }

        // AQI = ((Ihigh - Ilow) / (Chigh - Clow)) * (C - Clow) + Ilow
        let index_span = f64::from(self.high_index) - f64::from(self.low_index);
        let index =
            index_span / span * (concentration - self.low_concentration) + f64::from(self.low_index);

        // f64::round rounds half away from zero
        index.round() as u16
    }
}

/// Map a single pollutant concentration to its sub-index.
///
/// Returns `None` (not applicable) when the concentration is NaN, falls into a
/// gap between two breakpoints, or lies outside the table.
pub fn compute_subindex(concentration: f64, breakpoints: &[Breakpoint]) -> Option<u16> {
    if concentration.is_nan() {
        return None;
    }

    breakpoints
        .iter()
        .find(|bp| bp.contains(concentration))
        .map(|bp| bp.interpolate(concentration))
}

#[derive(Debug, Error, PartialEq)]
pub enum TableError {
    #[error("pollutant {pollutant} has no breakpoints")]
    Empty { pollutant: String },
    #[error("pollutant {pollutant}: breakpoint {position} has an inverted range")]
    InvertedRange { pollutant: String, position: usize },
    #[error("pollutant {pollutant}: breakpoint {position} overlaps the previous one")]
    Overlap { pollutant: String, position: usize },
}

/// EPA interpolation table, keyed by pollutant. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakpointTable {
    pollutants: BTreeMap<String, Vec<Breakpoint>>,
}

impl BreakpointTable {
    pub fn new(pollutants: BTreeMap<String, Vec<Breakpoint>>) -> Result<Self, TableError> {
        for (pollutant, breakpoints) in &pollutants {
            validate(pollutant, breakpoints)?;
        }
        Ok(Self { pollutants })
    }

    /// PM2.5 breakpoints (ug/m3, 24-hour) as used by the dashboard.
    pub fn epa_default() -> Self {
        const PM25_BREAKPOINTS: [Breakpoint; 7] = [
            Breakpoint::new(0.0, 12.0, 0, 50),      // Good
            Breakpoint::new(12.1, 35.4, 51, 100),   // Moderate
            Breakpoint::new(35.5, 55.4, 101, 150),  // Unhealthy for Sensitive Groups
            Breakpoint::new(55.5, 150.4, 151, 200), // Unhealthy
            Breakpoint::new(150.5, 250.4, 201, 300), // Very Unhealthy
            Breakpoint::new(250.5, 350.4, 301, 400), // Hazardous
            Breakpoint::new(350.5, 500.4, 401, 500), // Hazardous
        ];

        let mut pollutants = BTreeMap::new();
        pollutants.insert("pm2_5".to_string(), PM25_BREAKPOINTS.to_vec());
        Self { pollutants }
    }

    pub fn get(&self, pollutant: &str) -> Option<&[Breakpoint]> {
        self.pollutants.get(pollutant).map(Vec::as_slice)
    }

    pub fn pollutants(&self) -> impl Iterator<Item = &str> {
        self.pollutants.keys().map(String::as_str)
    }

    /// Sub-index for a pollutant; `None` when the pollutant has no entry.
    pub fn subindex(&self, pollutant: &str, concentration: f64) -> Option<u16> {
        self.get(pollutant)
            .and_then(|breakpoints| compute_subindex(concentration, breakpoints))
    }
}

impl Default for BreakpointTable {
    fn default() -> Self {
        Self::epa_default()
    }
}

fn validate(pollutant: &str, breakpoints: &[Breakpoint]) -> Result<(), TableError> {
    if breakpoints.is_empty() {
        return Err(TableError::Empty {
            pollutant: pollutant.to_string(),
        });
    }

    for (position, bp) in breakpoints.iter().enumerate() {
        // Negated comparisons so NaN bounds are rejected too
        if !(bp.low_concentration <= bp.high_concentration) || bp.low_index > bp.high_index {
            return Err(TableError::InvertedRange {
                pollutant: pollutant.to_string(),
                position,
            });
        }
        if position > 0 && !(breakpoints[position - 1].high_concentration < bp.low_concentration) {
            return Err(TableError::Overlap {
                pollutant: pollutant.to_string(),
                position,
            });
        }
    }

    Ok(())
}
