//! Series: one `(module_type, name)` counter stream and its buckets.
//!
//! Buckets live in a map keyed by their aligned start, so "at most one bucket
//! per window" holds by construction and lookups never have to pick between
//! duplicates.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::bucket::Bucket;
use crate::chart::Point;
use crate::time::Timestamp;

/// Separator between module type and name in a composed key.
pub const KEY_SEPARATOR: char = '>';

/// Series identity. Compared case-sensitively.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SeriesId {
    module_type: String,
    name: String,
}

impl SeriesId {
    pub fn new(module_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            module_type: module_type.into(),
            name: name.into(),
        }
    }

    pub fn module_type(&self) -> &str {
        &self.module_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Composed key: `module_type>name`.
    pub fn key(&self) -> String {
        format!("{}{}{}", self.module_type, KEY_SEPARATOR, self.name)
    }

    /// Parse a literal `module_type>name` key.
    ///
    /// The input is trimmed first and must split into exactly two parts;
    /// the parts themselves are kept verbatim.
    pub fn parse_key(s: &str) -> Option<Self> {
        let mut parts = s.trim().split(KEY_SEPARATOR);
        let module_type = parts.next()?;
        let name = parts.next()?;
        if parts.next().is_some() {
            return None;
        }
        Some(Self::new(module_type, name))
    }
}

impl fmt::Display for SeriesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.module_type, KEY_SEPARATOR, self.name)
    }
}

/// How the renderer should draw a series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    #[default]
    Line,
    Bar,
}

impl DisplayMode {
    pub fn as_str(self) -> &'static str {
        match self {
            DisplayMode::Line => "line",
            DisplayMode::Bar => "bar",
        }
    }
}

/// Opaque display color, forwarded to the renderer untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(String);

impl Color {
    pub fn new(c: impl Into<String>) -> Self {
        Self(c.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Color {
    fn default() -> Self {
        Self("blue".into())
    }
}

impl From<&str> for Color {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A named, module-scoped counter stream.
#[derive(Debug, Clone)]
pub struct Series {
    id: SeriesId,
    color: Color,
    mode: DisplayMode,
    granularity: Duration,
    buckets: BTreeMap<Timestamp, Bucket>,
}

impl Series {
    pub fn new(id: SeriesId, color: Color, mode: DisplayMode, granularity: Duration) -> Self {
        Self {
            id,
            color,
            mode,
            granularity,
            buckets: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> &SeriesId {
        &self.id
    }

    pub fn key(&self) -> String {
        self.id.key()
    }

    pub fn color(&self) -> &Color {
        &self.color
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    /// Number of materialized buckets (including empty ones).
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn buckets(&self) -> impl Iterator<Item = &Bucket> {
        self.buckets.values()
    }

    /// Count for the window containing `ts`, without materializing a bucket.
    pub fn count_at(&self, ts: Timestamp) -> Option<i64> {
        self.buckets
            .get(&ts.align(self.granularity))
            .map(Bucket::count)
    }

    /// Bucket for the window containing `ts`, created empty if absent.
    pub fn resolve_bucket(&mut self, ts: Timestamp) -> &mut Bucket {
        let start = ts.align(self.granularity);
        self.buckets
            .entry(start)
            .or_insert_with(|| Bucket::new(start))
    }

    /// Add `delta` to the current window.
    pub fn log(&mut self, delta: i64) {
        self.log_at(delta, Timestamp::now());
    }

    pub fn log_at(&mut self, delta: i64, now: Timestamp) {
        self.resolve_bucket(now).add_count(delta);
    }

    /// One point per window walking back from `start`, most recent first.
    ///
    /// Every visited window gets a bucket, so reading an idle stretch leaves
    /// empty buckets behind for housekeeping to sweep.
    pub fn build_points(
        &mut self,
        start: Timestamp,
        window_count: usize,
        granularity: Duration,
    ) -> Vec<Point> {
        let mut points = Vec::with_capacity(window_count);
        for i in 0..window_count {
            let point_time = start.step_back(granularity, i);
            let value = self.resolve_bucket(point_time).count();
            points.push(Point {
                offset_minutes: point_time.minutes_since(start),
                value,
            });
        }
        points
    }

    /// Drop every bucket whose window starts strictly before `cutoff`.
    pub fn evict_older_than(&mut self, cutoff: Timestamp) {
        self.buckets = self.buckets.split_off(&cutoff);
    }

    pub fn update_display(&mut self, color: Color, mode: DisplayMode) {
        self.color = color;
        self.mode = mode;
    }
}
