// AQI aggregation - overall index over measured pollutants and EPA categories
use super::breakpoint::BreakpointTable;
use serde::Serialize;

/// EPA AQI category, ordered from best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum AqiCategory {
    #[serde(rename = "Good")]
    Good,
    #[serde(rename = "Moderate")]
    Moderate,
    #[serde(rename = "Unhealthy for Sensitive Groups")]
    UnhealthyForSensitiveGroups,
    #[serde(rename = "Unhealthy")]
    Unhealthy,
    #[serde(rename = "Very Unhealthy")]
    VeryUnhealthy,
    #[serde(rename = "Hazardous")]
    Hazardous,
}

impl AqiCategory {
    pub fn from_aqi(aqi: u16) -> Self {
        match aqi {
            0..=50 => AqiCategory::Good,
            51..=100 => AqiCategory::Moderate,
            101..=150 => AqiCategory::UnhealthyForSensitiveGroups,
            151..=200 => AqiCategory::Unhealthy,
            201..=300 => AqiCategory::VeryUnhealthy,
            _ => AqiCategory::Hazardous,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AqiCategory::Good => "Good",
            AqiCategory::Moderate => "Moderate",
            AqiCategory::UnhealthyForSensitiveGroups => "Unhealthy for Sensitive Groups",
            AqiCategory::Unhealthy => "Unhealthy",
            AqiCategory::VeryUnhealthy => "Very Unhealthy",
            AqiCategory::Hazardous => "Hazardous",
        }
    }

    /// EPA reporting colour as a hex string
    pub fn color(self) -> &'static str {
        match self {
            AqiCategory::Good => "#00e400",
            AqiCategory::Moderate => "#ffff00",
            AqiCategory::UnhealthyForSensitiveGroups => "#ff7e00",
            AqiCategory::Unhealthy => "#ff0000",
            AqiCategory::VeryUnhealthy => "#8f3f97",
            AqiCategory::Hazardous => "#7e0023",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AqiSummary {
    pub aqi: u16,
    /// Pollutant that produced the max; `None` when nothing applied.
    pub dominant_pollutant: Option<String>,
}

impl AqiSummary {
    pub fn category(&self) -> AqiCategory {
        AqiCategory::from_aqi(self.aqi)
    }
}

/// Max sub-index over `readings`. Defaults to 0 when no pollutant applies.
/// Ties keep the pollutant seen first.
pub fn overall_aqi<'a, I>(readings: I, table: &BreakpointTable) -> AqiSummary
where
    I: IntoIterator<Item = (&'a str, f64)>,
{
    let mut summary = AqiSummary {
        aqi: 0,
        dominant_pollutant: None,
    };

    for (pollutant, concentration) in readings {
        let Some(subindex) = table.subindex(pollutant, concentration) else {
            tracing::trace!("no sub-index for {} at {}", pollutant, concentration);
            continue;
        };

        if summary.dominant_pollutant.is_none() || subindex > summary.aqi {
            summary.aqi = subindex;
            summary.dominant_pollutant = Some(pollutant.to_string());
        }
    }

    summary
}
