//! Rolling windows, normalized power, peaks and per-activity metrics.

use super::{at, steady_ride};
use fitpeaks::metrics::analytics::peaks::peak;
use fitpeaks::metrics::smoothing::{normalized_power, rolling_average};
use fitpeaks::metrics::{ActivityMetrics, PeakTable, PeakWindow};
use fitpeaks::storage::AthleteProfileEntry;
use chrono::NaiveDate;

fn profile_entry(ftp: u16) -> AthleteProfileEntry {
    AthleteProfileEntry {
        start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        ftp,
        rest_heart_rate: 50,
        threshold_heart_rate: 165,
        max_heart_rate: 185,
    }
}

#[test]
fn test_rolling_average_matches_window_means() {
    let source = [100, 200, 300, 400, 500, 7];
    let window = 3;
    let averages = rolling_average(&source, window);

    assert_eq!(averages.len(), source.len() - window + 1);
    for (i, avg) in averages.iter().enumerate() {
        let sum: u32 = source[i..i + window].iter().map(|&s| u32::from(s)).sum();
        assert_eq!(u32::from(*avg), sum / window as u32);
    }
}

#[test]
fn test_rolling_average_short_series_is_empty() {
    assert!(rolling_average(&[100; 4], 5).is_empty());
    assert_eq!(peak(&[100; 4], 5), None);
}

#[test]
fn test_normalized_power_of_constant_series() {
    let np = normalized_power(&[200; 600]);
    assert!((np - 200.0).abs() < 1e-9);
}

#[test]
fn test_normalized_power_not_below_average() {
    let mut power = Vec::new();
    for _ in 0..10 {
        power.extend(std::iter::repeat(400).take(60));
        power.extend(std::iter::repeat(100).take(60));
    }
    let average = power.iter().map(|&p| f64::from(p)).sum::<f64>() / power.len() as f64;

    assert!(normalized_power(&power) >= average);
    assert_eq!(normalized_power(&power[..29]), 0.0);
}

#[test]
fn test_peaks_do_not_increase_with_window_length() {
    let series: Vec<u16> = (0..3600).map(|i| if i % 2 == 0 { 400 } else { 0 }).collect();
    let table = PeakTable::extract(&series);

    let values: Vec<u16> = table.iter().filter_map(|(_, v)| v).collect();
    assert_eq!(values.len(), 8);
    for pair in values.windows(2) {
        assert!(pair[0] >= pair[1], "{:?}", values);
    }
    assert_eq!(table.get(PeakWindow::Sec5), Some(240));
    assert_eq!(table.get(PeakWindow::Min60), Some(200));
    assert_eq!(table.get(PeakWindow::Min90), None);
}

#[test]
fn test_steady_hour_end_to_end() {
    let ride = steady_ride("hour.fit", at(3, 12, 18), 3600, 200, 15_000.0);
    assert_eq!(ride.normalized_power, 200);
    assert_eq!(ride.avg_power, 200);

    let metrics = ActivityMetrics::compute(&ride, Some(&profile_entry(250))).unwrap();
    assert!((metrics.intensity_factor - 0.8).abs() < 1e-9);
    assert!((metrics.tss - 64.0).abs() < 1e-9);
    assert!((metrics.speed_kmh - 15.0).abs() < 1e-9);
    assert_eq!(metrics.variability_index, 0.0);

    let decoupling = metrics.decoupling.unwrap();
    assert!(decoupling.coupling.abs() < 1e-9);
}

#[test]
fn test_tss_is_stable_across_recomputation() {
    let ride = steady_ride("repeat.fit", at(3, 12, 18), 2700, 230, 20_000.0);
    let entry = profile_entry(260);

    let first = ActivityMetrics::compute(&ride, Some(&entry)).unwrap();
    let second = ActivityMetrics::compute(&ride, Some(&entry)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_decoupling_needs_ten_kilometres() {
    let entry = profile_entry(250);
    let long = steady_ride("long.fit", at(3, 12, 18), 1200, 200, 10_000.0);
    let short = steady_ride("short.fit", at(3, 12, 18), 1200, 200, 9_999.0);

    assert!(ActivityMetrics::compute(&long, Some(&entry)).unwrap().decoupling.is_some());
    let short_metrics = ActivityMetrics::compute(&short, Some(&entry)).unwrap();
    assert!(short_metrics.decoupling.is_none());
    assert!(short_metrics.aerobic_efficiency.is_none());
}

#[test]
fn test_unknown_ftp_gives_zero_stress() {
    let ride = steady_ride("noftp.fit", at(3, 12, 18), 3600, 200, 15_000.0);
    let metrics = ActivityMetrics::compute(&ride, None).unwrap();

    assert_eq!(metrics.ftp, None);
    assert_eq!(metrics.intensity_factor, 0.0);
    assert_eq!(metrics.tss, 0.0);
    assert!((metrics.speed_kmh - 15.0).abs() < 1e-9);
}
