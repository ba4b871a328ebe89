//! Metrics module for training calculations.

pub mod analytics;
pub mod calculator;
pub mod smoothing;

pub use calculator::{ActivityMetrics, MetricsCalculator};

// Re-export key analytics types for convenience
pub use analytics::{
    AerobicDecoupling, AnalyticsError, DailyLoad, DecouplingBand, Fitness, PeakTable, PeakWindow,
    TrainingLoadCalculator,
};
