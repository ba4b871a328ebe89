//! Aerobic decoupling (Pw:HR drift between the two halves of a ride).

use super::error::{ensure_same_length, AnalyticsResult};
use crate::metrics::smoothing::{mean, normalized_power};
use serde::{Deserialize, Serialize};

/// Minimum distance before decoupling is worth reporting.
pub const DECOUPLING_MIN_DISTANCE_METERS: f64 = 10_000.0;

/// Decoupling between the first and second half of an activity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AerobicDecoupling {
    /// Percentage drop of the Pw:HR ratio from first to second half
    pub coupling: f64,
    /// First-half normalized power over mean heart rate
    pub first_half_ratio: f64,
    /// Second-half normalized power over mean heart rate
    pub second_half_ratio: f64,
}

impl AerobicDecoupling {
    /// Split the series at `len / 2` and compare the halves.
    ///
    /// `Ok(None)` when a half is empty, a half's mean heart rate is zero, or
    /// the first-half ratio is zero.
    pub fn calculate(power: &[u16], heart_rate: &[u16]) -> AnalyticsResult<Option<Self>> {
        ensure_same_length(power, heart_rate)?;

        let midpoint = power.len() / 2;
        let (first_power, second_power) = power.split_at(midpoint);
        let (first_hr, second_hr) = heart_rate.split_at(midpoint);

        if first_power.is_empty() || second_power.is_empty() {
            return Ok(None);
        }

        let (Some(first_half_ratio), Some(second_half_ratio)) = (
            aerobic_ratio(first_power, first_hr),
            aerobic_ratio(second_power, second_hr),
        ) else {
            return Ok(None);
        };

        if first_half_ratio == 0.0 {
            return Ok(None);
        }

        let coupling = ((first_half_ratio - second_half_ratio) / first_half_ratio) * 100.0;

        Ok(Some(Self {
            coupling,
            first_half_ratio,
            second_half_ratio,
        }))
    }

    /// Traffic-light band used by reports: under 5% is well coupled.
    pub fn band(&self) -> DecouplingBand {
        if self.coupling < 5.0 {
            DecouplingBand::Coupled
        } else if self.coupling < 8.0 {
            DecouplingBand::Drifting
        } else {
            DecouplingBand::Decoupled
        }
    }
}

/// Coarse classification of a decoupling percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecouplingBand {
    /// Below 5%
    Coupled,
    /// 5% to 8%
    Drifting,
    /// 8% and above
    Decoupled,
}

/// Normalized power of a segment over its mean heart rate.
fn aerobic_ratio(power: &[u16], heart_rate: &[u16]) -> Option<f64> {
    let hr_avg = mean(heart_rate)?;
    if hr_avg == 0.0 {
        return None;
    }
    Some(normalized_power(power) / hr_avg)
}
