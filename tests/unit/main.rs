//! Integration tests against the public `fitpeaks` API.

mod activity_store_test;
mod config_test;
mod fitness_test;
mod metrics_test;
mod profile_test;
mod reports_test;
mod sync_test;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use fitpeaks::recording::ParsedRecording;
use fitpeaks::Activity;

/// Local wall time on a 2024 date.
pub fn at(month: u32, day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, month, day)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

/// Steady ride: constant power and heart rate for `seconds`, covering `distance` meters.
pub fn steady_ride(source_id: &str, start: NaiveDateTime, seconds: u32, watts: u16, distance: f64) -> Activity {
    let recording = ParsedRecording {
        start_time: start,
        end_time: start + Duration::seconds(i64::from(seconds)),
        distance_meters: distance,
        moving_seconds: seconds,
        power: vec![watts; seconds as usize],
        heart_rate: vec![140; seconds as usize],
    };
    Activity::from_recording(source_id, recording).unwrap()
}
