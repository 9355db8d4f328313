//! Top-level facade crate for statdeck.
//!
//! Re-exports the counter core and the gateway library so users can depend on a single crate.

pub mod core {
    pub use statdeck_core::*;
}

pub mod gateway {
    pub use statdeck_gateway::*;
}
