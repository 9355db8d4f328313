//! statdeck gateway library entry.
//!
//! This crate wires the counter store into a running service: strict YAML
//! config, shared state, the periodic housekeeping task, the HTTP API, and the
//! built-in SVG renderer. It is consumed by the binary (`main.rs`) and by
//! integration tests.

pub mod api;
pub mod app_state;
pub mod config;
pub mod housekeeping;
pub mod ops;
pub mod render;
pub mod router;
