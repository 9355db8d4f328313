//! Built-in chart renderers.
//!
//! The core only defines the `ChartRenderer` boundary; the gateway ships a
//! text-based SVG renderer so `/v1/chart` can return an image without any
//! native graphics stack.

pub mod svg;

pub use svg::SvgRenderer;
