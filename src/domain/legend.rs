// Legend display scale - concentration thresholds shown on the map legend
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum LegendError {
    #[error("legend needs at least one threshold")]
    Empty,
    #[error("legend has {thresholds} thresholds, {categories} categories and {colors} colors")]
    LengthMismatch {
        thresholds: usize,
        categories: usize,
        colors: usize,
    },
    #[error("legend thresholds must ascend (position {0})")]
    Unordered(usize),
}

/// Display thresholds for one variable. Independent of the EPA
/// interpolation table: this scale only labels concentrations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegendScale {
    pub variable: String,
    pub title: String,
    pub unit: String,
    pub max_value: f64,
    pub thresholds: Vec<f64>,
    pub categories: Vec<String>,
    pub colors: Vec<String>,
}

impl Default for LegendScale {
    fn default() -> Self {
        Self {
            variable: "pm2_5".to_string(),
            title: "PM2.5".to_string(),
            unit: "μg/m³".to_string(),
            max_value: 250.0,
            thresholds: vec![15.0, 35.0, 55.0, 110.0, 250.0],
            categories: vec![
                "Good".to_string(),
                "Moderate".to_string(),
                "Unhealthy for Sensitive Groups".to_string(),
                "Unhealthy".to_string(),
                "Very Unhealthy".to_string(),
            ],
            colors: vec![
                "#00e400".to_string(),
                "#ffff00".to_string(),
                "#ff7e00".to_string(),
                "#ff0000".to_string(),
                "#8f3f97".to_string(),
            ],
        }
    }
}

impl LegendScale {
    pub fn validate(&self) -> Result<(), LegendError> {
        if self.thresholds.is_empty() {
            return Err(LegendError::Empty);
        }
        if self.categories.len() != self.thresholds.len() || self.colors.len() != self.thresholds.len()
        {
            return Err(LegendError::LengthMismatch {
                thresholds: self.thresholds.len(),
                categories: self.categories.len(),
                colors: self.colors.len(),
            });
        }
        if let Some(position) = self
            .thresholds
            .windows(2)
            .position(|pair| !(pair[0] < pair[1]))
        {
            return Err(LegendError::Unordered(position + 1));
        }
        Ok(())
    }

    /// `None` only for a scale without thresholds.
    fn bucket(&self, value: f64) -> Option<usize> {
        let last = self.thresholds.len().checked_sub(1)?;
        Some(
            self.thresholds
                .iter()
                .position(|threshold| value <= *threshold)
                .unwrap_or(last),
        )
    }

    /// First category whose threshold is >= `value`; values past the last
    /// threshold share the last category.
    pub fn category_for(&self, value: f64) -> Option<&str> {
        self.categories.get(self.bucket(value)?).map(String::as_str)
    }

    pub fn color_for(&self, value: f64) -> Option<&str> {
        self.colors.get(self.bucket(value)?).map(String::as_str)
    }
}
