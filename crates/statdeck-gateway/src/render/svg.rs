//! SVG chart renderer.
//!
//! Draws line series as polylines and bar series as grouped rectangles on a
//! shared plot area. x runs from the oldest offset (left) to 0 (right).

use std::fmt::Write;

use bytes::Bytes;
use statdeck_core::error::{Result, StatError};
use statdeck_core::{Chart, ChartRenderer, ChartSeries, DisplayMode};

const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 180.0;
const MARGIN_TOP: f64 = 50.0;
const MARGIN_BOTTOM: f64 = 60.0;
const GRID_MINUTES: f64 = 60.0;

fn escape_xml(v: &str) -> String {
    v.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SvgRenderer;

impl SvgRenderer {
    pub fn new() -> Self {
        Self
    }
}

/// Plot-area coordinate mapping.
struct Frame {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
    x_min: f64,
    y_min: i64,
    y_max: i64,
}

impl Frame {
    fn new(chart: &Chart) -> Self {
        let points = chart.series.iter().flat_map(|s| s.points.iter());
        let mut x_min = 0.0f64;
        let mut y_min = 0i64;
        let mut y_max = 1i64;
        for p in points {
            x_min = x_min.min(p.offset_minutes);
            y_min = y_min.min(p.value);
            y_max = y_max.max(p.value);
        }
        Self {
            left: MARGIN_LEFT,
            top: MARGIN_TOP,
            width: (f64::from(chart.width) - MARGIN_LEFT - MARGIN_RIGHT).max(1.0),
            height: (f64::from(chart.height) - MARGIN_TOP - MARGIN_BOTTOM).max(1.0),
            x_min,
            y_min,
            y_max,
        }
    }

    fn x(&self, offset_minutes: f64) -> f64 {
        if self.x_min >= 0.0 {
            return self.left + self.width / 2.0;
        }
        self.left + (offset_minutes - self.x_min) / -self.x_min * self.width
    }

    fn y(&self, value: i64) -> f64 {
        // f64 so extreme counts cannot overflow
        let span = (self.y_max as f64 - self.y_min as f64).max(1.0);
        self.top + self.height - (value as f64 - self.y_min as f64) / span * self.height
    }

    fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

impl ChartRenderer for SvgRenderer {
    fn content_type(&self) -> &'static str {
        "image/svg+xml"
    }

    fn render(&self, chart: &Chart) -> Result<Bytes> {
        if chart.width == 0 || chart.height == 0 {
            return Err(StatError::RenderFailed("chart has no area".into()));
        }
        let frame = Frame::new(chart);
        let mut out = String::new();

        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = chart.width,
            h = chart.height
        );
        let _ = writeln!(out, r#"<rect width="100%" height="100%" fill="white"/>"#);
        let _ = writeln!(
            out,
            r#"<text x="{}" y="30" text-anchor="middle" font-family="Verdana" font-size="17" font-weight="bold" fill="darkgray">{}</text>"#,
            f64::from(chart.width) / 2.0,
            escape_xml(&chart.title)
        );

        render_axes(&mut out, chart, &frame);

        let bar_series: Vec<&ChartSeries> = chart
            .series
            .iter()
            .filter(|s| s.mode == DisplayMode::Bar)
            .collect();
        for (idx, s) in bar_series.iter().enumerate() {
            render_bars(&mut out, s, &frame, idx, bar_series.len());
        }
        for s in chart.series.iter().filter(|s| s.mode == DisplayMode::Line) {
            render_line(&mut out, s, &frame);
        }

        render_legend(&mut out, chart, &frame);

        let _ = writeln!(out, "</svg>");
        Ok(Bytes::from(out))
    }
}

fn render_axes(out: &mut String, chart: &Chart, f: &Frame) {
    let right = f.left + f.width;
    let bottom = f.bottom();

    // vertical grid every hour back from now
    let mut m = 0.0;
    while m >= f.x_min {
        let x = f.x(m);
        let _ = writeln!(
            out,
            r#"<line x1="{x:.1}" y1="{:.1}" x2="{x:.1}" y2="{bottom:.1}" stroke="lightgray"/>"#,
            f.top
        );
        let _ = writeln!(
            out,
            r#"<text x="{x:.1}" y="{:.1}" text-anchor="middle" font-size="11">{m}</text>"#,
            bottom + 16.0
        );
        if f.x_min >= 0.0 {
            break;
        }
        m -= GRID_MINUTES;
    }

    let _ = writeln!(
        out,
        r#"<line x1="{:.1}" y1="{bottom:.1}" x2="{right:.1}" y2="{bottom:.1}" stroke="black"/>"#,
        f.left
    );
    let _ = writeln!(
        out,
        r#"<line x1="{l:.1}" y1="{:.1}" x2="{l:.1}" y2="{bottom:.1}" stroke="black"/>"#,
        f.top,
        l = f.left
    );
    for v in [f.y_min, f.y_max] {
        let _ = writeln!(
            out,
            r#"<text x="{:.1}" y="{:.1}" text-anchor="end" font-size="11">{v}</text>"#,
            f.left - 6.0,
            f.y(v) + 4.0
        );
    }

    let _ = writeln!(
        out,
        r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="13">{}</text>"#,
        f.left + f.width / 2.0,
        f64::from(chart.height) - 15.0,
        escape_xml(chart.x_title)
    );
    let _ = writeln!(
        out,
        r#"<text x="20" y="{y:.1}" text-anchor="middle" font-size="13" transform="rotate(-90 20 {y:.1})">{}</text>"#,
        escape_xml(chart.y_title),
        y = f.top + f.height / 2.0
    );
}

fn render_line(out: &mut String, s: &ChartSeries, f: &Frame) {
    let coords: Vec<String> = s
        .points
        .iter()
        .map(|p| format!("{:.1},{:.1}", f.x(p.offset_minutes), f.y(p.value)))
        .collect();
    let _ = writeln!(
        out,
        r#"<polyline fill="none" stroke="{}" stroke-width="2" points="{}"><title>{}</title></polyline>"#,
        escape_xml(s.color.as_str()),
        coords.join(" "),
        escape_xml(&s.key)
    );
}

fn render_bars(out: &mut String, s: &ChartSeries, f: &Frame, idx: usize, of: usize) {
    let slot = f.width / s.points.len().max(1) as f64;
    let bar_w = (slot * 0.8 / of.max(1) as f64).max(1.0);
    let zero = f.y(0);
    for p in &s.points {
        let x = f.x(p.offset_minutes) - slot * 0.4 + bar_w * idx as f64;
        let y = f.y(p.value);
        let (top, h) = if y <= zero { (y, zero - y) } else { (zero, y - zero) };
        let _ = writeln!(
            out,
            r#"<rect x="{x:.1}" y="{top:.1}" width="{bar_w:.1}" height="{h:.1}" fill="{}"/>"#,
            escape_xml(s.color.as_str())
        );
    }
}

fn render_legend(out: &mut String, chart: &Chart, f: &Frame) {
    let x = f.left + f.width + 15.0;
    for (i, s) in chart.series.iter().enumerate() {
        let y = f.top + 10.0 + 20.0 * i as f64;
        let _ = writeln!(
            out,
            r#"<rect x="{x:.1}" y="{:.1}" width="12" height="12" fill="{}"/>"#,
            y - 10.0,
            escape_xml(s.color.as_str())
        );
        let _ = writeln!(
            out,
            r#"<text x="{:.1}" y="{y:.1}" font-size="12">{}</text>"#,
            x + 18.0,
            escape_xml(&s.key)
        );
    }
}
