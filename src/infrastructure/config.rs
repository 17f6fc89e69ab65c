use crate::domain::breakpoint::{Breakpoint, BreakpointTable};
use crate::domain::legend::LegendScale;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub server: ServerSettings,
    pub playback: PlaybackSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind_address: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PlaybackSettings {
    pub tick_ms: u64,
    pub default_frames: usize,
    pub max_frames: usize,
}

impl PlaybackSettings {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(1))
    }
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            tick_ms: 100,
            default_frames: 73,
            max_frames: 730,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
struct BreakpointsConfig {
    #[serde(default)]
    pollutants: BTreeMap<String, Vec<Breakpoint>>,
}

#[derive(Debug, Deserialize, Clone, Default)]
struct LegendConfig {
    #[serde(default)]
    legend: Option<LegendScale>,
}

pub fn load_server_config() -> anyhow::Result<ServerConfig> {
    let settings = config::Config::builder()
        .set_default("server.bind_address", "0.0.0.0:8080")?
        .set_default("playback.tick_ms", 100)?
        .set_default("playback.default_frames", 73)?
        .set_default("playback.max_frames", 730)?
        .add_source(config::File::with_name("config/server").required(false))
        .add_source(
            config::Environment::with_prefix("AQ_DASH")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}

pub fn load_breakpoint_table() -> anyhow::Result<BreakpointTable> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/breakpoints").required(false))
        .build()?;

    breakpoint_table_from(settings)
}

pub fn load_legend_scale() -> anyhow::Result<LegendScale> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/legend").required(false))
        .build()?;

    legend_scale_from(settings)
}

/// Falls back to the built-in EPA table when no pollutants are configured.
fn breakpoint_table_from(settings: config::Config) -> anyhow::Result<BreakpointTable> {
    let parsed: BreakpointsConfig = settings.try_deserialize()?;
    if parsed.pollutants.is_empty() {
        tracing::info!("no breakpoints configured, using the EPA PM2.5 table");
        return Ok(BreakpointTable::epa_default());
    }

    Ok(BreakpointTable::new(parsed.pollutants)?)
}

fn legend_scale_from(settings: config::Config) -> anyhow::Result<LegendScale> {
    let parsed: LegendConfig = settings.try_deserialize()?;
    let legend = parsed.legend.unwrap_or_default();
    legend.validate()?;
    Ok(legend)
}
