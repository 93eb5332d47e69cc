//! Variant Collection
//!
//! Development-time workflow that forces every relevant (material, local
//! keyword, global keyword) combination to be rendered at least once, so
//! the backend compiles each corresponding variant, then harvests the
//! result into a manifest.

pub mod config;
pub mod probe;
pub mod scheduler;

pub use config::{CollectRequest, Timings};
pub use probe::{GridLayout, Probe};
pub use scheduler::{CollectReport, Collector, TickOutcome};
