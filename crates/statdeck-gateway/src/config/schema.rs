use std::time::Duration;

use serde::Deserialize;
use statdeck_core::error::{Result, StatError};
use statdeck_core::{ChartLayout, Color, DisplayMode, StoreConfig};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    pub version: u32,

    #[serde(default)]
    pub gateway: GatewaySection,

    #[serde(default)]
    pub stats: StatsSection,

    #[serde(default)]
    pub chart: ChartSection,

    /// Extra series registered after the startup seed.
    #[serde(default)]
    pub series: Vec<SeriesConfig>,
}

impl GatewayConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(StatError::UnsupportedVersion);
        }

        self.stats.validate()?;
        self.gateway.validate(&self.stats)?;
        self.chart.validate()?;

        for s in &self.series {
            s.validate()?;
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewaySection {
    #[serde(default = "default_listen")]
    pub listen: String,

    #[serde(default = "default_housekeeping_interval_ms")]
    pub housekeeping_interval_ms: u64,
}

impl Default for GatewaySection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            housekeeping_interval_ms: default_housekeeping_interval_ms(),
        }
    }
}

impl GatewaySection {
    pub fn validate(&self, stats: &StatsSection) -> Result<()> {
        if self.housekeeping_interval_ms < 1000 {
            return Err(StatError::BadRequest(
                "gateway.housekeeping_interval_ms must be at least 1000".into(),
            ));
        }
        // sweeping less often than once per window lets buckets pile up
        if self.housekeeping_interval_ms > stats.granularity_secs.saturating_mul(1000) {
            return Err(StatError::BadRequest(
                "gateway.housekeeping_interval_ms must not exceed stats.granularity_secs".into(),
            ));
        }
        Ok(())
    }

    pub fn housekeeping_interval(&self) -> Duration {
        Duration::from_millis(self.housekeeping_interval_ms)
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}
fn default_housekeeping_interval_ms() -> u64 {
    60000
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StatsSection {
    #[serde(default = "default_granularity_secs")]
    pub granularity_secs: u64,

    #[serde(default = "default_window_count")]
    pub window_count: usize,
}

impl Default for StatsSection {
    fn default() -> Self {
        Self {
            granularity_secs: default_granularity_secs(),
            window_count: default_window_count(),
        }
    }
}

impl StatsSection {
    /// Upper bound on retained windows; each chart request walks every one.
    pub const MAX_WINDOW_COUNT: usize = 10_000;

    pub fn validate(&self) -> Result<()> {
        if self.window_count > Self::MAX_WINDOW_COUNT {
            return Err(StatError::BadRequest(format!(
                "stats.window_count must be between 1 and {}",
                Self::MAX_WINDOW_COUNT
            )));
        }
        self.store_config().validate()
    }

    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            granularity: Duration::from_secs(self.granularity_secs),
            window_count: self.window_count,
        }
    }
}

fn default_granularity_secs() -> u64 {
    300
}
fn default_window_count() -> usize {
    100
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChartSection {
    #[serde(default = "default_title")]
    pub title: String,

    #[serde(default = "default_width")]
    pub width: u32,

    #[serde(default = "default_height")]
    pub height: u32,
}

impl Default for ChartSection {
    fn default() -> Self {
        Self {
            title: default_title(),
            width: default_width(),
            height: default_height(),
        }
    }
}

impl ChartSection {
    pub fn validate(&self) -> Result<()> {
        if !(200..=4000).contains(&self.width) {
            return Err(StatError::BadRequest(
                "chart.width must be between 200 and 4000".into(),
            ));
        }
        if !(150..=4000).contains(&self.height) {
            return Err(StatError::BadRequest(
                "chart.height must be between 150 and 4000".into(),
            ));
        }
        Ok(())
    }

    pub fn layout(&self) -> ChartLayout {
        ChartLayout {
            title: self.title.clone(),
            width: self.width,
            height: self.height,
        }
    }
}

fn default_title() -> String {
    "statdeck Statistics".into()
}
fn default_width() -> u32 {
    1200
}
fn default_height() -> u32 {
    600
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeriesConfig {
    pub module_type: String,
    pub name: String,
    #[serde(default)]
    pub color: Color,
    #[serde(default)]
    pub mode: DisplayMode,
}

impl SeriesConfig {
    pub fn validate(&self) -> Result<()> {
        if self.module_type.is_empty() || self.name.is_empty() {
            return Err(StatError::BadRequest(
                "series entries need a non-empty module_type and name".into(),
            ));
        }
        Ok(())
    }
}
