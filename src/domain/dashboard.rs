// Dashboard domain models
use super::aqi::{AqiCategory, overall_aqi};
use super::breakpoint::BreakpointTable;
use super::legend::LegendScale;
use super::selector::{HourOffset, Selection, select, select_many};
use super::series::ReadingSnapshot;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AqiReport {
    pub hour_offset: HourOffset,
    pub label: String,
    pub aqi: u16,
    pub dominant_pollutant: Option<String>,
    pub category: AqiCategory,
    pub color: &'static str,
    /// Legend category of the legend variable at this offset.
    pub legend_category: Option<String>,
    pub legend_color: Option<String>,
}

impl AqiReport {
    pub fn build(
        snapshot: &ReadingSnapshot,
        table: &BreakpointTable,
        legend: &LegendScale,
        offset: HourOffset,
    ) -> Self {
        // Snapshot order decides ties
        let readings: Vec<(&str, f64)> = snapshot
            .variables()
            .into_iter()
            .filter(|variable| table.get(variable).is_some())
            .filter_map(|pollutant| {
                select(pollutant, offset, &snapshot.current, &snapshot.forecast)
                    .value()
                    .map(|value| (pollutant, value))
            })
            .collect();

        let summary = overall_aqi(readings, table);
        let category = summary.category();

        let legend_value =
            select(&legend.variable, offset, &snapshot.current, &snapshot.forecast).value();
        let legend_category = legend_value
            .and_then(|value| legend.category_for(value))
            .map(str::to_string);
        let legend_color = legend_value
            .and_then(|value| legend.color_for(value))
            .map(str::to_string);

        Self {
            hour_offset: offset,
            label: offset.label(),
            aqi: summary.aqi,
            dominant_pollutant: summary.dominant_pollutant,
            category,
            color: category.color(),
            legend_category,
            legend_color,
        }
    }
}

/// One step of a forecast playback stream.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaybackFrame {
    pub sequence: usize,
    pub aqi: AqiReport,
    pub values: Selection,
}

impl PlaybackFrame {
    pub fn build(
        sequence: usize,
        snapshot: &ReadingSnapshot,
        table: &BreakpointTable,
        legend: &LegendScale,
        offset: HourOffset,
    ) -> Self {
        Self {
            sequence,
            aqi: AqiReport::build(snapshot, table, legend, offset),
            values: select_many(snapshot, None, offset),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::breakpoint::Breakpoint;
    use crate::domain::series::{Samples, TimeSeries};
    use std::collections::BTreeMap;

    fn snapshot() -> ReadingSnapshot {
        let forecast_pm25: Samples = (0..72).map(|hour| Some(f64::from(hour) * 5.0)).collect();
        let current: TimeSeries = [
            ("pm2_5", vec![Some(3.0), Some(40.0)]),
            ("pm10", vec![Some(80.0)]),
        ]
        .into_iter()
        .collect();
        let forecast: TimeSeries = [("pm2_5", forecast_pm25)].into_iter().collect();
        ReadingSnapshot::new("hanoi", current, forecast)
    }

    #[test]
    fn test_report_now() {
        let report = AqiReport::build(
            &snapshot(),
            &BreakpointTable::epa_default(),
            &LegendScale::default(),
            HourOffset::NOW,
        );

        assert_eq!(report.aqi, 112);
        assert_eq!(report.dominant_pollutant.as_deref(), Some("pm2_5"));
        assert_eq!(report.category, AqiCategory::UnhealthyForSensitiveGroups);
        assert_eq!(report.color, "#ff7e00");
        // 40 ug/m3 sits in the legend's 35..55 band
        assert_eq!(report.legend_category.as_deref(), Some("Unhealthy for Sensitive Groups"));
        assert_eq!(report.legend_color.as_deref(), Some("#ff7e00"));
        assert_eq!(report.label, "Now");
    }

    #[test]
    fn test_report_forecast_hour() {
        // offset 3 -> index 2 -> 10 ug/m3
        let report = AqiReport::build(
            &snapshot(),
            &BreakpointTable::epa_default(),
            &LegendScale::default(),
            HourOffset::clamped(3),
        );

        assert_eq!(report.aqi, 42);
        assert_eq!(report.category, AqiCategory::Good);
        assert_eq!(report.legend_category.as_deref(), Some("Good"));
    }

    #[test]
    fn test_report_without_data_is_zero() {
        let empty = ReadingSnapshot::new("nowhere", TimeSeries::new(), TimeSeries::new());
        let report = AqiReport::build(
            &empty,
            &BreakpointTable::epa_default(),
            &LegendScale::default(),
            HourOffset::clamped(12),
        );

        assert_eq!(report.aqi, 0);
        assert_eq!(report.dominant_pollutant, None);
        assert_eq!(report.legend_category, None);
    }

    #[test]
    fn test_tie_keeps_snapshot_order() {
        let mut pollutants = BTreeMap::new();
        pollutants.insert("pm2_5".to_string(), vec![Breakpoint::new(0.0, 12.0, 0, 50)]);
        pollutants.insert("pm10".to_string(), vec![Breakpoint::new(0.0, 54.0, 0, 50)]);
        let table = BreakpointTable::new(pollutants).unwrap();

        // Both reach 50; pm2_5 is listed first even though pm10 sorts first
        let current: TimeSeries = [("pm2_5", vec![Some(12.0)]), ("pm10", vec![Some(54.0)])]
            .into_iter()
            .collect();
        let snapshot = ReadingSnapshot::new("hanoi", current, TimeSeries::new());
        let report = AqiReport::build(&snapshot, &table, &LegendScale::default(), HourOffset::NOW);
        assert_eq!(report.aqi, 50);
        assert_eq!(report.dominant_pollutant.as_deref(), Some("pm2_5"));

        let current: TimeSeries = [("pm10", vec![Some(54.0)]), ("pm2_5", vec![Some(12.0)])]
            .into_iter()
            .collect();
        let snapshot = ReadingSnapshot::new("hanoi", current, TimeSeries::new());
        let report = AqiReport::build(&snapshot, &table, &LegendScale::default(), HourOffset::NOW);
        assert_eq!(report.dominant_pollutant.as_deref(), Some("pm10"));
    }

    #[test]
    fn test_empty_legend_has_no_category() {
        let legend = LegendScale {
            thresholds: vec![],
            categories: vec![],
            colors: vec![],
            ..LegendScale::default()
        };
        let report =
            AqiReport::build(&snapshot(), &BreakpointTable::epa_default(), &legend, HourOffset::NOW);
        assert_eq!(report.aqi, 112);
        assert_eq!(report.legend_category, None);
        assert_eq!(report.legend_color, None);
    }

    #[test]
    fn test_frame_carries_selection() {
        let frame = PlaybackFrame::build(
            4,
            &snapshot(),
            &BreakpointTable::epa_default(),
            &LegendScale::default(),
            HourOffset::clamped(1),
        );

        assert_eq!(frame.sequence, 4);
        assert_eq!(frame.values.label, "+1h");
        assert_eq!(frame.values.values.len(), 2);
        assert!(frame.values.get("pm10").is_missing());
        assert_eq!(frame.aqi.aqi, 0);
    }
}
