// Time-series selector - values at an hour offset over current and forecast series
use super::series::{ReadingSnapshot, TimeSeries};
use serde::{Serialize, Serializer};
use std::fmt;

/// An hour offset from now, always within `0..=72`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct HourOffset(u8);

impl HourOffset {
    pub const NOW: HourOffset = HourOffset(0);
    pub const MAX: HourOffset = HourOffset(72);

    /// Out-of-range hours are clamped to the nearest bound.
    pub fn clamped(hours: i64) -> Self {
        HourOffset(hours.clamp(0, i64::from(Self::MAX.0)) as u8)
    }

    pub fn hours(self) -> u8 {
        self.0
    }

    pub fn is_now(self) -> bool {
        self == Self::NOW
    }

    /// One hour later, wrapping from the last forecast hour back to now.
    pub fn next(self) -> Self {
        if self >= Self::MAX {
            Self::NOW
        } else {
            HourOffset(self.0 + 1)
        }
    }

    pub fn label(self) -> String {
        if self.is_now() {
            "Now".to_string()
        } else {
            format!("+{}h", self.0)
        }
    }
}

/// A selected value, or the missing marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SelectedValue {
    Value(f64),
    Missing,
}

impl SelectedValue {
    /// Rendered in place of a missing value.
    pub const SENTINEL: &'static str = "--";

    pub fn value(self) -> Option<f64> {
        match self {
            SelectedValue::Value(value) => Some(value),
            SelectedValue::Missing => None,
        }
    }

    pub fn is_missing(self) -> bool {
        matches!(self, SelectedValue::Missing)
    }
}

impl From<Option<f64>> for SelectedValue {
    fn from(value: Option<f64>) -> Self {
        match value {
            Some(value) if !value.is_nan() => SelectedValue::Value(value),
            _ => SelectedValue::Missing,
        }
    }
}

impl fmt::Display for SelectedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectedValue::Value(value) => write!(f, "{}", value),
            SelectedValue::Missing => f.write_str(Self::SENTINEL),
        }
    }
}

impl Serialize for SelectedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SelectedValue::Value(value) => serializer.serialize_f64(*value),
            SelectedValue::Missing => serializer.serialize_str(Self::SENTINEL),
        }
    }
}

/// Value of `variable` at `offset`.
///
/// Offset 0 reads the last current sample; offset N reads forecast sample
/// N - 1. Anything unresolved is [`SelectedValue::Missing`].
pub fn select(
    variable: &str,
    offset: HourOffset,
    current: &TimeSeries,
    forecast: &TimeSeries,
) -> SelectedValue {
    let sample = if offset.is_now() {
        current
            .get(variable)
            .and_then(|samples| samples.last().copied())
    } else {
        let index = usize::from(offset.hours()) - 1;
        forecast
            .get(variable)
            .and_then(|samples| samples.get(index).copied())
    };

    sample.flatten().into()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reading {
    pub variable: String,
    pub value: SelectedValue,
    pub unit: String,
}

/// Named values for one hour offset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Selection {
    pub hour_offset: HourOffset,
    pub label: String,
    pub values: Vec<Reading>,
}

impl Selection {
    pub fn get(&self, variable: &str) -> SelectedValue {
        self.values
            .iter()
            .find(|reading| reading.variable == variable)
            .map(|reading| reading.value)
            .unwrap_or(SelectedValue::Missing)
    }
}

/// Selects `variables` at `offset`, or every variable of the snapshot when
/// `variables` is `None`.
pub fn select_many(
    snapshot: &ReadingSnapshot,
    variables: Option<&[String]>,
    offset: HourOffset,
) -> Selection {
    let names: Vec<&str> = match variables {
        Some(variables) => variables.iter().map(String::as_str).collect(),
        None => snapshot.variables(),
    };

    let values = names
        .into_iter()
        .map(|variable| Reading {
            variable: variable.to_string(),
            value: select(variable, offset, &snapshot.current, &snapshot.forecast),
            unit: snapshot.unit(variable).to_string(),
        })
        .collect();

    Selection {
        hour_offset: offset,
        label: offset.label(),
        values,
    }
}
