//! Progressive CTL/ATL/TSB tracking.

use super::{at, steady_ride};
use chrono::NaiveDate;
use fitpeaks::metrics::analytics::{AnalyticsError, LoadEntry};
use fitpeaks::metrics::{Fitness, TrainingLoadCalculator};
use fitpeaks::storage::AthleteProfileEntry;
use fitpeaks::{AthleteProfile, MetricsCalculator};

fn entry(day: u32, tss: f64) -> LoadEntry {
    LoadEntry {
        date: NaiveDate::from_ymd_opt(2024, 5, day).unwrap(),
        tss,
    }
}

#[test]
fn test_same_day_activities_share_load() {
    let entries = [entry(1, 84.0), entry(2, 42.0), entry(2, 30.0), entry(2, 70.0)];
    let loads = TrainingLoadCalculator::new().calculate(&entries).unwrap();

    assert_eq!(loads[1].fitness(), Fitness::new(2, 12));
    assert_eq!(loads[2].fitness(), loads[1].fitness());
    assert_eq!(loads[3].fitness(), loads[1].fitness());
    assert!(loads[1].first_for_day);
    assert!(!loads[2].first_for_day);
    assert!(!loads[3].first_for_day);
}

#[test]
fn test_load_uses_only_earlier_days() {
    // The first day has nothing behind it.
    let entries = [entry(1, 500.0), entry(9, 70.0)];
    let loads = TrainingLoadCalculator::new().calculate(&entries).unwrap();

    assert_eq!(loads[0].fitness(), Fitness::new(0, 0));
    // Day 1 is 8 days back: inside CTL, outside ATL.
    assert_eq!(loads[1].fitness(), Fitness::new(11, 0));
    assert_eq!(loads[1].fitness().tsb, 11);
}

#[test]
fn test_out_of_order_entries_rejected() {
    let result = TrainingLoadCalculator::new().calculate(&[entry(3, 10.0), entry(2, 10.0)]);
    assert!(matches!(result, Err(AnalyticsError::InvalidInput(_))));
}

#[test]
fn test_process_reports_latest_fitness() {
    let profile = AthleteProfile::new(vec![AthleteProfileEntry {
        start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        ftp: 250,
        rest_heart_rate: 50,
        threshold_heart_rate: 165,
        max_heart_rate: 185,
    }]);

    // Each ride scores TSS 64.
    let mut rides = vec![
        steady_ride("a.fit", at(5, 1, 7), 3600, 200, 15_000.0),
        steady_ride("b.fit", at(5, 2, 7), 3600, 200, 15_000.0),
        steady_ride("c.fit", at(5, 2, 18), 3600, 200, 15_000.0),
    ];

    let fitness = MetricsCalculator::new(&profile).process(&mut rides).unwrap();

    assert_eq!(fitness, Some(Fitness::new(1, 9)));
    assert!(rides.iter().all(|r| r.metrics.is_some()));
    assert_eq!(rides[1].load, rides[2].load);
    assert_eq!(MetricsCalculator::new(&profile).process(&mut []).unwrap(), None);
}
