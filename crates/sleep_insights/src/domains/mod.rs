//! Domain modules for the sleep analysis pipeline.
//!
//! # Modules
//!
//! - [`stages`]: reduce one raw record to a nightly summary
//! - [`window`]: collect nightly summaries across a day window
//! - [`sleep_metrics`]: averages, consistency, debt, trend
//! - [`recommendations`]: threshold tiers to advisory messages
//! - [`fallback`]: fully shaped unavailable results
//! - [`snapshot`]: one-day fitness tile

pub mod fallback;
pub mod recommendations;
pub mod sleep_metrics;
pub mod snapshot;
pub mod stages;
pub mod window;

pub use fallback::Unavailability;
pub use window::DEFAULT_WINDOW_DAYS;
