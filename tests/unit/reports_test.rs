//! Report rendering over processed activities.

use super::{at, steady_ride};
use fitpeaks::reports::{render_detail, render_fitness, render_peaks, render_week, Painter, PeakKind};
use fitpeaks::{AthleteProfile, Database, MetricsCalculator};

#[test]
fn test_week_report_from_store() {
    let db = Database::open_in_memory().unwrap();
    db.store(&steady_ride("old.fit", at(2, 20, 7), 3600, 200, 30_000.0)).unwrap();
    db.store(&steady_ride("new.fit", at(3, 12, 7), 3600, 200, 30_000.0)).unwrap();

    let week_start = at(3, 10, 0).date();
    let mut history = db.load_since(at(1, 27, 0)).unwrap();
    let profile = AthleteProfile::empty();
    let fitness = MetricsCalculator::new(&profile).process(&mut history).unwrap();

    let text = render_week(&history, week_start, fitness, &Painter::plain());

    assert!(text.contains("Tue 12 Mar, 2024"));
    assert!(!text.contains("Tue 20 Feb, 2024"));
    assert!(text.contains("30.00km/h"));
    assert!(text.contains("CTL: Chronic training load"));
}

#[test]
fn test_empty_reports() {
    let painter = Painter::plain();
    assert_eq!(render_peaks(&[], PeakKind::HeartRate, &painter), "No data to report on\n");
    assert_eq!(render_fitness(None, &painter), "No data to report on\n");
    assert_eq!(render_detail(3, None, &painter), "Cannot find activity #3\n");
}

#[test]
fn test_power_report_lists_every_activity() {
    let rides = vec![
        steady_ride("a.fit", at(3, 11, 7), 900, 210, 8_000.0),
        steady_ride("b.fit", at(3, 13, 7), 900, 260, 8_000.0),
    ];
    let text = render_peaks(&rides, PeakKind::Power, &Painter::plain());

    assert!(text.contains("Mon 11 Mar, 2024"));
    assert!(text.contains("Wed 13 Mar, 2024"));
    assert!(text.contains("First"));
    assert!(text.contains("260"));
}
