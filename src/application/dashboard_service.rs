// Dashboard service - AQI reports and value selections per location
use crate::application::snapshot_repository::SnapshotRepository;
use crate::domain::breakpoint::BreakpointTable;
use crate::domain::dashboard::AqiReport;
use crate::domain::legend::LegendScale;
use crate::domain::selector::{HourOffset, Selection, select_many};
use std::sync::Arc;

#[derive(Clone)]
pub struct DashboardService {
    repository: Arc<dyn SnapshotRepository>,
    breakpoints: Arc<BreakpointTable>,
    legend: Arc<LegendScale>,
}

impl DashboardService {
    pub fn new(
        repository: Arc<dyn SnapshotRepository>,
        breakpoints: Arc<BreakpointTable>,
        legend: Arc<LegendScale>,
    ) -> Self {
        Self {
            repository,
            breakpoints,
            legend,
        }
    }

    pub async fn list_locations(&self) -> anyhow::Result<Vec<String>> {
        self.repository.list_locations().await
    }

    pub fn legend(&self) -> &LegendScale {
        &self.legend
    }

    /// `Ok(None)` when the location has no snapshot
    pub async fn aqi_report(
        &self,
        location: &str,
        offset: HourOffset,
    ) -> anyhow::Result<Option<AqiReport>> {
        let Some(snapshot) = self.repository.get_snapshot(location).await? else {
            return Ok(None);
        };

        let report = AqiReport::build(&snapshot, &self.breakpoints, &self.legend, offset);
        tracing::debug!(
            "AQI for {} at {}: {} {} ({:?})",
            location,
            report.label,
            report.aqi,
            report.category.label(),
            report.dominant_pollutant
        );
        Ok(Some(report))
    }

    /// `Ok(None)` when the location has no snapshot
    pub async fn values(
        &self,
        location: &str,
        variables: Option<&[String]>,
        offset: HourOffset,
    ) -> anyhow::Result<Option<Selection>> {
        let snapshot = self.repository.get_snapshot(location).await?;
        Ok(snapshot.map(|snapshot| select_many(&snapshot, variables, offset)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::selector::SelectedValue;
    use crate::domain::series::{ReadingSnapshot, TimeSeries};
    use crate::infrastructure::memory_repository::MemoryRepository;

    async fn service() -> DashboardService {
        let repository = Arc::new(MemoryRepository::new());
        let current: TimeSeries = [
            ("pm2_5", vec![Some(8.0), Some(40.0)]),
            ("temperature_2m", vec![Some(29.5)]),
        ]
        .into_iter()
        .collect();
        let forecast: TimeSeries = [("pm2_5", vec![Some(12.0); 72])].into_iter().collect();
        repository
            .replace_snapshot(ReadingSnapshot::new("hanoi", current, forecast))
            .await
            .unwrap();

        DashboardService::new(
            repository,
            Arc::new(BreakpointTable::epa_default()),
            Arc::new(LegendScale::default()),
        )
    }

    #[tokio::test]
    async fn test_aqi_report_for_known_location() {
        let service = service().await;

        let now = service.aqi_report("hanoi", HourOffset::NOW).await.unwrap().unwrap();
        assert_eq!(now.aqi, 112);

        let later = service
            .aqi_report("hanoi", HourOffset::clamped(24))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(later.aqi, 50);
    }

    #[tokio::test]
    async fn test_unknown_location() {
        let service = service().await;
        assert!(service.aqi_report("paris", HourOffset::NOW).await.unwrap().is_none());
        assert!(service.values("paris", None, HourOffset::NOW).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_values_forecast_missing_weather() {
        let service = service().await;
        let selection = service
            .values("hanoi", None, HourOffset::clamped(3))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(selection.get("pm2_5"), SelectedValue::Value(12.0));
        assert!(selection.get("temperature_2m").is_missing());
        assert_eq!(service.list_locations().await.unwrap(), vec!["hanoi"]);
    }
}
