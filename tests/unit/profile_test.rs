//! Athlete profile loading and strict date resolution.

use chrono::NaiveDate;
use fitpeaks::storage::{AthleteProfile, ProfileError};
use std::io::Write;

fn date(m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, m, d).unwrap()
}

const PROFILE: &str = r#"[
    {"date": "10-Jan-2024", "ftp": 250, "rhr": 50, "thr": 165, "mhr": 185},
    {"date": "01-Mar-2024", "ftp": 265, "rhr": 48, "thr": 167, "mhr": 185}
]"#;

#[test]
fn test_entry_takes_effect_the_next_day() {
    let profile = AthleteProfile::from_json(PROFILE).unwrap();

    assert_eq!(profile.ftp(date(1, 10)), None);
    assert_eq!(profile.ftp(date(1, 11)), Some(250));
    assert_eq!(profile.ftp(date(3, 1)), Some(250));
    assert_eq!(profile.ftp(date(3, 2)), Some(265));
}

#[test]
fn test_heart_rate_parameters() {
    let profile = AthleteProfile::from_json(PROFILE).unwrap();
    let hr = profile.heart_rate(date(6, 1)).unwrap();

    assert_eq!(hr.rest_heart_rate, 48);
    assert_eq!(hr.threshold_heart_rate, 167);
    assert_eq!(hr.max_heart_rate, 185);
}

#[test]
fn test_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(PROFILE.as_bytes()).unwrap();

    let profile = AthleteProfile::load(file.path()).unwrap();
    assert_eq!(profile.entries().len(), 2);
}

#[test]
fn test_missing_and_malformed_profiles() {
    let dir = tempfile::tempdir().unwrap();
    let missing = AthleteProfile::load(&dir.path().join("nope.json"));
    assert!(matches!(missing, Err(ProfileError::NotFound(_))));

    let bad_date = r#"[{"date": "2024-01-10", "ftp": 250, "rhr": 50, "thr": 165, "mhr": 185}]"#;
    assert!(matches!(
        AthleteProfile::from_json(bad_date),
        Err(ProfileError::InvalidDate(_))
    ));
    assert!(matches!(
        AthleteProfile::from_json("{"),
        Err(ProfileError::ParseError(_))
    ));
}
