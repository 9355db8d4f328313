//! Chart assembly and the renderer boundary.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use bytes::Bytes;

use statdeck_core::{
    build_chart, render_chart, Chart, ChartLayout, ChartRenderer, Color, CounterStore,
    DisplayMode, StatError, StatEvent, StoreConfig, Timestamp,
};

const MINUTE: i64 = 60_000;
const T0: i64 = 1_700_000_100_000;

fn at(minutes: i64) -> Timestamp {
    Timestamp::from_millis(T0 + minutes * MINUTE)
}

fn store() -> CounterStore {
    let mut s = CounterStore::new(StoreConfig {
        granularity: Duration::from_secs(300),
        window_count: 3,
    })
    .unwrap();
    s.register("Msgs", "Bot", Color::from("blue"), DisplayMode::Line);
    s.register("Errors", "Bot", Color::from("red"), DisplayMode::Bar);
    s.ingest_at(&StatEvent::new("Msgs", "Bot").with_count(2), at(0));
    s.ingest_at(&StatEvent::new("Msgs", "Bot").with_count(3), at(6));
    s.ingest_at(&StatEvent::new("Errors", "Bot"), at(7));
    s
}

#[derive(Default)]
struct CountingRenderer {
    calls: AtomicUsize,
}

impl ChartRenderer for CountingRenderer {
    fn content_type(&self) -> &'static str {
        "text/plain"
    }

    fn render(&self, chart: &Chart) -> statdeck_core::Result<Bytes> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        let keys: Vec<&str> = chart.series.iter().map(|s| s.key.as_str()).collect();
        Ok(Bytes::from(keys.join(",")))
    }
}

struct BrokenRenderer;

impl ChartRenderer for BrokenRenderer {
    fn content_type(&self) -> &'static str {
        "image/png"
    }

    fn render(&self, _chart: &Chart) -> statdeck_core::Result<Bytes> {
        Err(StatError::RenderFailed("no canvas".into()))
    }
}

#[test]
fn chart_series_are_sorted_with_recent_points_first() {
    let mut s = store();
    let chart = build_chart(&mut s, &["Bot>.*"], at(6)).unwrap();

    assert_eq!(chart.len(), 2);
    assert_eq!(chart[0].key, "Bot>Errors");
    assert_eq!(chart[0].mode, DisplayMode::Bar);
    assert_eq!(chart[0].color.as_str(), "red");
    assert_eq!(chart[1].key, "Bot>Msgs");

    let msgs: Vec<(f64, i64)> = chart[1]
        .points
        .iter()
        .map(|p| (p.offset_minutes, p.value))
        .collect();
    assert_eq!(msgs, vec![(0.0, 3), (-5.0, 2), (-10.0, 0)]);

    let errors: Vec<i64> = chart[0].points.iter().map(|p| p.value).collect();
    assert_eq!(errors, vec![1, 0, 0]);
}

#[test]
fn building_a_chart_materializes_idle_windows() {
    let mut s = store();
    assert_eq!(s.find_exact("Errors", "Bot").unwrap().bucket_count(), 1);

    build_chart(&mut s, &["Bot>Errors"], at(6)).unwrap();

    // one point per window, each backed by a bucket now
    assert_eq!(s.find_exact("Errors", "Bot").unwrap().bucket_count(), 3);
    // unselected series are untouched
    assert_eq!(s.find_exact("Msgs", "Bot").unwrap().bucket_count(), 2);
}

#[test]
fn empty_resolution_is_not_an_error() {
    let mut s = store();
    assert!(build_chart(&mut s, &["Nope>.*"], at(6)).is_none());

    let renderer = CountingRenderer::default();
    let out = render_chart(&mut s, &renderer, &ChartLayout::default(), &["Nope>.*"], at(6));
    assert!(out.is_none());
    assert_eq!(renderer.calls.load(Ordering::Relaxed), 0);
}

#[test]
fn renderer_receives_layout_and_ordered_series() {
    let mut s = store();
    let renderer = CountingRenderer::default();
    let layout = ChartLayout {
        title: "bot Statistics".into(),
        ..ChartLayout::default()
    };
    let none: [&str; 0] = [];

    let out = render_chart(&mut s, &renderer, &layout, &none, at(6)).unwrap();
    assert_eq!(&out[..], b"Bot>Errors,Bot>Msgs");
    assert_eq!(renderer.calls.load(Ordering::Relaxed), 1);

    let chart = Chart::new(&layout, Vec::new());
    assert_eq!(chart.width, 1200);
    assert_eq!(chart.height, 600);
    assert_eq!(chart.x_title, "Mins Ago");
    assert_eq!(chart.y_title, "Value");
}

#[test]
fn renderer_failure_yields_no_image() {
    let mut s = store();
    let out = render_chart(&mut s, &BrokenRenderer, &ChartLayout::default(), &["Bot>Msgs"], at(6));
    assert!(out.is_none());
}

#[test]
fn points_serialize_for_external_renderers() {
    let mut s = store();
    let chart = build_chart(&mut s, &["Bot>Msgs"], at(6)).unwrap();
    let v = serde_json::to_value(&chart[0]).unwrap();
    assert_eq!(v["key"], "Bot>Msgs");
    assert_eq!(v["mode"], "line");
    assert_eq!(v["points"][0]["value"], 3);
}
