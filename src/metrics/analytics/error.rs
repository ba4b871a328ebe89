//! Analytics error types.

use thiserror::Error;

/// Errors that can occur during analytics calculations.
///
/// Short series and unknown FTP are not errors; those surface as `None`
/// or zero-valued metrics.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// Invalid input provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Power and heart-rate series must cover the same seconds.
    #[error("Series length mismatch: {power} power samples, {heart_rate} heart-rate samples")]
    LengthMismatch { power: usize, heart_rate: usize },
}

/// Result type for analytics operations.
pub type AnalyticsResult<T> = Result<T, AnalyticsError>;

/// Fail unless both series have the same length.
pub fn ensure_same_length(power: &[u16], heart_rate: &[u16]) -> AnalyticsResult<()> {
    if power.len() != heart_rate.len() {
        return Err(AnalyticsError::LengthMismatch {
            power: power.len(),
            heart_rate: heart_rate.len(),
        });
    }
    Ok(())
}
