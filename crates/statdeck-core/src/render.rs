//! Renderer boundary.
//!
//! Image encoding lives outside the core. A renderer receives a fully built
//! [`Chart`] and returns encoded bytes; failures are caught here and turned
//! into "no image produced" so a broken renderer never takes the caller down.

use bytes::Bytes;

use crate::chart::{build_chart, ChartSeries};
use crate::error::Result;
use crate::store::CounterStore;
use crate::time::Timestamp;

/// Axis title for the x axis (minutes before the request).
pub const X_AXIS_TITLE: &str = "Mins Ago";
/// Axis title for the y axis (raw counts).
pub const Y_AXIS_TITLE: &str = "Value";

/// Fixed presentation settings, independent of the data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartLayout {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for ChartLayout {
    fn default() -> Self {
        Self {
            title: "Statistics".into(),
            width: 1200,
            height: 600,
        }
    }
}

/// Input handed to a renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub title: String,
    pub x_title: &'static str,
    pub y_title: &'static str,
    pub width: u32,
    pub height: u32,
    pub series: Vec<ChartSeries>,
}

impl Chart {
    pub fn new(layout: &ChartLayout, series: Vec<ChartSeries>) -> Self {
        Self {
            title: layout.title.clone(),
            x_title: X_AXIS_TITLE,
            y_title: Y_AXIS_TITLE,
            width: layout.width,
            height: layout.height,
            series,
        }
    }
}

/// Encodes a chart into an image byte stream.
pub trait ChartRenderer: Send + Sync {
    /// MIME type of the produced bytes.
    fn content_type(&self) -> &'static str;
    fn render(&self, chart: &Chart) -> Result<Bytes>;
}

/// Build chart data for `selectors` and render it.
///
/// Returns `None` when nothing matched or the renderer failed; both are
/// logged, neither is propagated.
pub fn render_chart<S: AsRef<str>>(
    store: &mut CounterStore,
    renderer: &dyn ChartRenderer,
    layout: &ChartLayout,
    selectors: &[S],
    now: Timestamp,
) -> Option<Bytes> {
    let series = build_chart(store, selectors, now)?;
    let chart = Chart::new(layout, series);
    match renderer.render(&chart) {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            tracing::error!(error=%e, series = chart.series.len(), "error generating chart");
            None
        }
    }
}
