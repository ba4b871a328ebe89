//! Rolling-window reduction and Normalized Power.
//!
//! All series are one sample per elapsed second. Dropouts are stored as
//! explicit zeros, so a window always spans exactly `window` wall-clock
//! seconds.

use std::collections::VecDeque;

/// Window used for the Normalized Power rolling average.
pub const NORMALIZED_POWER_WINDOW: usize = 30;

/// Fixed-length rolling average over a sample stream.
///
/// Keeps a running sum: each new sample is added and the sample leaving the
/// window is subtracted, so a full pass is O(n).
#[derive(Debug)]
pub struct RollingAverage {
    /// Samples currently inside the window
    buffer: VecDeque<u16>,
    /// Window size in samples
    window_size: usize,
    /// Running sum of `buffer`
    sum: u64,
}

impl RollingAverage {
    /// Create a new rolling average with the given window size.
    pub fn new(window_size: usize) -> Self {
        Self {
            buffer: VecDeque::with_capacity(window_size),
            window_size,
            sum: 0,
        }
    }

    /// Create a 30-second rolling average (for Normalized Power calculation).
    pub fn thirty_second() -> Self {
        Self::new(NORMALIZED_POWER_WINDOW)
    }

    /// Add a sample. Returns the window mean (truncated) once the window is full.
    pub fn push(&mut self, value: u16) -> Option<u16> {
        if self.window_size == 0 {
            return None;
        }

        self.buffer.push_back(value);
        self.sum += u64::from(value);

        if self.buffer.len() > self.window_size {
            if let Some(old) = self.buffer.pop_front() {
                self.sum -= u64::from(old);
            }
        }

        self.average()
    }

    /// Mean of the current window, or `None` until the window has filled.
    pub fn average(&self) -> Option<u16> {
        if self.is_full() {
            Some((self.sum / self.window_size as u64) as u16)
        } else {
            None
        }
    }

    /// Check if the buffer holds a full window.
    pub fn is_full(&self) -> bool {
        self.window_size > 0 && self.buffer.len() >= self.window_size
    }

    /// Reset the rolling average.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.sum = 0;
    }

    /// Get the number of samples in the buffer.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

/// Rolling mean of every full `window` in `source`, zeros included.
///
/// Output length is `len(source) - window + 1`; empty when the series is
/// shorter than the window. Callers treat empty as "no value", not zero.
pub fn rolling_average(source: &[u16], window: usize) -> Vec<u16> {
    if window == 0 || source.len() < window {
        return Vec::new();
    }

    let mut rolling = RollingAverage::new(window);
    let mut averages = Vec::with_capacity(source.len() - window + 1);

    for &sample in source {
        if let Some(avg) = rolling.push(sample) {
            averages.push(avg);
        }
    }

    averages
}

/// Rolling mean after dropping zero samples.
///
/// Older normalized-power code used this to keep dropouts from deflating
/// the result. It breaks the index-to-second mapping, so nothing in the
/// report pipeline uses it; it is kept for comparing the two behaviours.
pub fn rolling_average_skip_zeros(source: &[u16], window: usize) -> Vec<u16> {
    let filtered: Vec<u16> = source.iter().copied().filter(|&s| s > 0).collect();
    rolling_average(&filtered, window)
}

/// Arithmetic mean of a series, `None` for an empty one.
pub fn mean(series: &[u16]) -> Option<f64> {
    if series.is_empty() {
        return None;
    }
    let sum: u64 = series.iter().map(|&s| u64::from(s)).sum();
    Some(sum as f64 / series.len() as f64)
}

/// Normalized Power calculation.
///
/// NP = 4th root of average of (30-second rolling average power)^4
#[derive(Debug)]
pub struct NormalizedPowerCalculator {
    /// 30-second rolling average
    rolling_avg: RollingAverage,
    /// Sum of 4th powers
    sum_fourth_power: f64,
    /// Count of full windows seen
    count: u32,
}

impl NormalizedPowerCalculator {
    /// Create a new Normalized Power calculator.
    pub fn new() -> Self {
        Self {
            rolling_avg: RollingAverage::thirty_second(),
            sum_fourth_power: 0.0,
            count: 0,
        }
    }

    /// Add a power sample.
    pub fn add(&mut self, power: u16) {
        if let Some(avg) = self.rolling_avg.push(power) {
            self.sum_fourth_power += f64::from(avg).powi(4);
            self.count += 1;
        }
    }

    /// Current Normalized Power, `None` until 30 samples have been seen.
    pub fn normalized_power(&self) -> Option<f64> {
        if self.count == 0 {
            return None;
        }

        let avg_fourth_power = self.sum_fourth_power / f64::from(self.count);
        Some(avg_fourth_power.powf(0.25))
    }

    /// Reset the calculator.
    pub fn reset(&mut self) {
        self.rolling_avg.reset();
        self.sum_fourth_power = 0.0;
        self.count = 0;
    }
}

impl Default for NormalizedPowerCalculator {
    fn default() -> Self {
        Self::new()
    }
}

/// Normalized Power of a whole power series; 0 when shorter than 30 seconds.
pub fn normalized_power(power: &[u16]) -> f64 {
    let mut calculator = NormalizedPowerCalculator::new();
    for &sample in power {
        calculator.add(sample);
    }
    calculator.normalized_power().unwrap_or(0.0)
}

/// Normalized Power rounded to whole watts.
pub fn normalized_power_watts(power: &[u16]) -> u16 {
    normalized_power(power).round() as u16
}
