//! CounterStore: the set of registered series and the operations over them.
//!
//! The store is plain data behind `&mut self`. It does no locking of its own;
//! callers that share it across tasks must serialize access (the gateway keeps
//! it behind a single mutex).

use std::collections::BTreeMap;
use std::time::Duration;

use crate::error::{Result, StatError};
use crate::series::{Color, DisplayMode, Series, SeriesId};
use crate::time::{duration_millis, Timestamp};

/// Default bucket width.
pub const DEFAULT_GRANULARITY: Duration = Duration::from_secs(5 * 60);
/// Default number of retained windows.
pub const DEFAULT_WINDOW_COUNT: usize = 100;

/// Module tag for process lifecycle series.
pub const PROCESS_MODULE: &str = "Process";
/// Module tag for message traffic series.
pub const MESSAGES_MODULE: &str = "Messages";

/// Tuning knobs for bucket width and retention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreConfig {
    pub granularity: Duration,
    pub window_count: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            granularity: DEFAULT_GRANULARITY,
            window_count: DEFAULT_WINDOW_COUNT,
        }
    }
}

impl StoreConfig {
    pub fn validate(&self) -> Result<()> {
        if self.granularity < Duration::from_secs(1) {
            return Err(StatError::BadRequest(
                "granularity must be at least one second".into(),
            ));
        }
        if self.window_count == 0 {
            return Err(StatError::BadRequest("window_count must be > 0".into()));
        }
        Ok(())
    }

    /// `granularity * window_count`: how far back buckets are kept.
    pub fn retention(&self) -> Duration {
        let windows = u32::try_from(self.window_count).unwrap_or(u32::MAX);
        self.granularity.saturating_mul(windows)
    }
}

/// One counted event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatEvent {
    pub id: SeriesId,
    pub count: i64,
}

impl StatEvent {
    /// Single occurrence of `name` under `module_type`.
    pub fn new(name: impl Into<String>, module_type: impl Into<String>) -> Self {
        Self {
            id: SeriesId::new(module_type, name),
            count: 1,
        }
    }

    pub fn with_count(mut self, count: i64) -> Self {
        self.count = count;
        self
    }
}

/// Result of [`CounterStore::register`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    Created,
    /// Identity already existed; only display settings changed.
    Updated,
}

/// Process-wide counter store.
#[derive(Debug)]
pub struct CounterStore {
    config: StoreConfig,
    series: BTreeMap<SeriesId, Series>,
}

impl CounterStore {
    /// Empty store. Prefer [`CounterStore::started`] outside of tests.
    pub fn new(config: StoreConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            series: BTreeMap::new(),
        })
    }

    /// Build a store and run the startup seed against it.
    pub fn started(config: StoreConfig, now: Timestamp) -> Result<Self> {
        let mut store = Self::new(config)?;
        store.startup_at(now);
        Ok(store)
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// All series, ordered by identity.
    pub fn series(&self) -> impl Iterator<Item = &Series> {
        self.series.values()
    }

    /// Register a series or refresh the display settings of an existing one.
    ///
    /// Re-registering never touches buckets.
    pub fn register(
        &mut self,
        name: &str,
        module_type: &str,
        color: Color,
        mode: DisplayMode,
    ) -> Registration {
        let id = SeriesId::new(module_type, name);
        if let Some(existing) = self.series.get_mut(&id) {
            tracing::info!(series=%id, "series already exists, updating display settings");
            existing.update_display(color, mode);
            return Registration::Updated;
        }
        tracing::debug!(series=%id, mode=mode.as_str(), "series registered");
        let series = Series::new(id.clone(), color, mode, self.config.granularity);
        self.series.insert(id, series);
        Registration::Created
    }

    /// Count an event now. See [`CounterStore::ingest_at`].
    pub fn ingest(&mut self, event: &StatEvent) -> bool {
        self.ingest_at(event, Timestamp::now())
    }

    /// Count an event against its series.
    ///
    /// Events for unregistered identities are logged and dropped; returns
    /// whether the event was counted.
    pub fn ingest_at(&mut self, event: &StatEvent, now: Timestamp) -> bool {
        match self.series.get_mut(&event.id) {
            Some(series) => {
                series.log_at(event.count, now);
                true
            }
            None => {
                tracing::warn!(
                    series=%event.id,
                    count=event.count,
                    "stat logged for unknown series, dropping"
                );
                false
            }
        }
    }

    pub fn find_exact(&self, name: &str, module_type: &str) -> Option<&Series> {
        self.series.get(&SeriesId::new(module_type, name))
    }

    pub fn find_exact_mut(&mut self, name: &str, module_type: &str) -> Option<&mut Series> {
        self.series.get_mut(&SeriesId::new(module_type, name))
    }

    pub(crate) fn get(&self, id: &SeriesId) -> Option<&Series> {
        self.series.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: &SeriesId) -> Option<&mut Series> {
        self.series.get_mut(id)
    }

    /// Sweep buckets outside the retention horizon, measured from now.
    pub fn house_keeping(&mut self) {
        self.house_keeping_at(Timestamp::now());
    }

    /// Drop every bucket older than `now - granularity * window_count`.
    pub fn house_keeping_at(&mut self, now: Timestamp) {
        let cutoff = now.saturating_sub(self.config.retention());
        let before: usize = self.series.values().map(Series::bucket_count).sum();
        for series in self.series.values_mut() {
            series.evict_older_than(cutoff);
        }
        let after: usize = self.series.values().map(Series::bucket_count).sum();
        tracing::debug!(
            cutoff_ms = cutoff.as_millis(),
            retention_ms = duration_millis(self.config.retention()),
            evicted = before - after,
            "housekeeping sweep"
        );
    }

    /// Seed the default series and count one startup event.
    pub fn startup(&mut self) {
        self.startup_at(Timestamp::now());
    }

    pub fn startup_at(&mut self, now: Timestamp) {
        self.register("Startup", PROCESS_MODULE, Color::from("lawngreen"), DisplayMode::Bar);
        self.register("Incoming Msgs", MESSAGES_MODULE, Color::from("blue"), DisplayMode::Line);
        self.register("Outgoing Msgs", MESSAGES_MODULE, Color::from("purple"), DisplayMode::Line);

        self.ingest_at(&StatEvent::new("Startup", PROCESS_MODULE), now);
        tracing::info!(series = self.len(), "counter store started");
    }
}
