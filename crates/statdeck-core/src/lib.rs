//! statdeck core: bucketed event counters, selector resolution, and chart data.
//!
//! This crate owns the counter store and everything needed to turn it into
//! chart input: time alignment, per-series buckets, retention sweeps, selector
//! matching, and the point sequences handed to a renderer. It carries no
//! transport or async runtime dependencies so the store can be driven from a
//! test, a CLI, or the gateway alike.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Bad input degrades to a log line plus a safe default (drop, skip, or an
//! empty result) instead of crashing the host process.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod bucket;
pub mod chart;
pub mod error;
pub mod render;
pub mod selector;
pub mod series;
pub mod store;
pub mod time;

pub use bucket::Bucket;
pub use chart::{build_chart, ChartSeries, Point};
/// Shared result type.
pub use error::{Result, StatError};
pub use render::{render_chart, Chart, ChartLayout, ChartRenderer};
pub use series::{Color, DisplayMode, Series, SeriesId};
pub use store::{CounterStore, Registration, StatEvent, StoreConfig};
pub use time::Timestamp;
