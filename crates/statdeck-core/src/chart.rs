//! Chart data assembly.
//!
//! Turns resolved series into the ordered point sequences a renderer draws.
//! x is minutes before the request time (zero or negative), y is the raw
//! bucket count.

use serde::Serialize;

use crate::series::{Color, DisplayMode};
use crate::store::CounterStore;
use crate::time::Timestamp;

/// One plotted window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub offset_minutes: f64,
    pub value: i64,
}

/// Everything the renderer needs for one series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub key: String,
    pub mode: DisplayMode,
    pub color: Color,
    pub points: Vec<Point>,
}

/// Resolve `selectors` and build one point sequence per matched series,
/// ordered by composed key.
///
/// `None` means nothing matched; that is "nothing to draw", not a failure.
pub fn build_chart<S: AsRef<str>>(
    store: &mut CounterStore,
    selectors: &[S],
    now: Timestamp,
) -> Option<Vec<ChartSeries>> {
    let Some(ids) = store.resolve_selectors(selectors) else {
        tracing::warn!(selectors = selectors.len(), "no chart type matches");
        return None;
    };

    let window_count = store.config().window_count;
    let granularity = store.config().granularity;

    let mut out = Vec::with_capacity(ids.len());
    for id in ids {
        let Some(series) = store.get_mut(&id) else {
            continue;
        };
        let points = series.build_points(now, window_count, granularity);
        out.push(ChartSeries {
            key: series.key(),
            mode: series.mode(),
            color: series.color().clone(),
            points,
        });
    }
    Some(out)
}
