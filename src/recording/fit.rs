//! FIT recording parser.
//!
//! Reads `record` messages into one-sample-per-second power and heart-rate
//! series. Seconds with no record become zero samples so that an index is
//! always the number of seconds since the first record.

use super::types::{ImportError, ParsedRecording};
use chrono::NaiveDateTime;
use fitparser::Value;
use tracing::debug;

/// One decoded `record` message.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawSample {
    pub timestamp: NaiveDateTime,
    pub power: Option<u16>,
    pub heart_rate: Option<u16>,
    pub distance: Option<f64>,
}

/// Parse FIT file content into a zero-padded recording.
pub fn parse_fit(content: &[u8]) -> Result<ParsedRecording, ImportError> {
    let fit_data = fitparser::from_bytes(content)
        .map_err(|e| ImportError::ParseError(format!("FIT parse error: {}", e)))?;

    let mut samples = Vec::new();

    for record in fit_data {
        if record.kind() != fitparser::profile::MesgNum::Record {
            continue;
        }

        let mut timestamp: Option<NaiveDateTime> = None;
        let mut power: Option<u16> = None;
        let mut heart_rate: Option<u16> = None;
        let mut distance: Option<f64> = None;

        for field in record.fields() {
            match field.name() {
                "timestamp" => {
                    if let Value::Timestamp(t) = field.value() {
                        timestamp = Some(t.naive_local());
                    }
                }
                "power" => power = numeric(field.value()).map(to_sample),
                "heart_rate" => heart_rate = numeric(field.value()).map(to_sample),
                "distance" => distance = numeric(field.value()),
                _ => {}
            }
        }

        // Records without a timestamp cannot be placed on the timeline.
        if let Some(timestamp) = timestamp {
            samples.push(RawSample {
                timestamp,
                power,
                heart_rate,
                distance,
            });
        }
    }

    build_series(&samples)
}

/// Lay samples out one per second, zero-filling gaps.
///
/// Samples must be in timestamp order. A sample that lands on a second
/// already filled is dropped.
pub fn build_series(samples: &[RawSample]) -> Result<ParsedRecording, ImportError> {
    let first = samples.first().ok_or(ImportError::NoSamples)?;
    let start_time = first.timestamp;

    let mut power: Vec<u16> = Vec::with_capacity(samples.len());
    let mut heart_rate: Vec<u16> = Vec::with_capacity(samples.len());
    let mut distance_meters = 0.0;
    let mut end_time = start_time;
    let mut moving_seconds = 0u32;
    let mut padded = 0usize;

    for sample in samples {
        let offset = (sample.timestamp - start_time).num_seconds();
        if offset < 0 || (offset as usize) < power.len() {
            continue;
        }

        let index = offset as usize;
        padded += index - power.len();
        power.resize(index, 0);
        heart_rate.resize(index, 0);

        power.push(sample.power.unwrap_or(0));
        heart_rate.push(sample.heart_rate.unwrap_or(0));
        moving_seconds += 1;
        end_time = sample.timestamp;

        if let Some(d) = sample.distance.filter(|d| *d > 0.0) {
            distance_meters = d;
        }
    }

    if padded > 0 {
        debug!("Zero-filled {} missing seconds", padded);
    }

    Ok(ParsedRecording {
        start_time,
        end_time,
        distance_meters,
        moving_seconds,
        power,
        heart_rate,
    })
}

fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::UInt8(v) | Value::UInt8z(v) | Value::Byte(v) => Some(f64::from(*v)),
        Value::UInt16(v) | Value::UInt16z(v) => Some(f64::from(*v)),
        Value::UInt32(v) | Value::UInt32z(v) => Some(f64::from(*v)),
        Value::SInt8(v) => Some(f64::from(*v)),
        Value::SInt16(v) => Some(f64::from(*v)),
        Value::SInt32(v) => Some(f64::from(*v)),
        Value::Float32(v) => Some(f64::from(*v)),
        Value::Float64(v) => Some(*v),
        _ => None,
    }
}

fn to_sample(value: f64) -> u16 {
    value.clamp(0.0, f64::from(u16::MAX)) as u16
}
