//! FitPeaks - cycling activity analytics for the terminal
//!
//! Imports FIT recordings into a local SQLite store, derives peak power and
//! heart-rate values, training stress and aerobic decoupling, tracks
//! CTL/ATL/TSB fitness, and renders week, peak and detail reports.

pub mod metrics;
pub mod recording;
pub mod reports;
pub mod storage;
pub mod sync;

// Re-export commonly used types
pub use metrics::calculator::{ActivityMetrics, MetricsCalculator};
pub use recording::types::Activity;
pub use storage::config::AppConfig;
pub use storage::database::Database;
pub use storage::profile::AthleteProfile;
