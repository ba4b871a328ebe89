//! Training analytics built on the per-second series.
//!
//! - Peak rolling-window tables (power and heart rate)
//! - Aerobic decoupling
//! - Training Load (CTL/ATL/TSB)

pub mod decoupling;
pub mod error;
pub mod peaks;
pub mod training_load;

// Re-exports for convenience
pub use decoupling::{AerobicDecoupling, DecouplingBand, DECOUPLING_MIN_DISTANCE_METERS};
pub use error::{AnalyticsError, AnalyticsResult};
pub use peaks::{PeakTable, PeakWindow};
pub use training_load::{DailyLoad, Fitness, LoadEntry, TrainingLoadCalculator};
