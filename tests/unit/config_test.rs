//! TOML configuration.

use fitpeaks::storage::config::{load_config_from, save_config};
use fitpeaks::AppConfig;

#[test]
fn test_missing_config_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = load_config_from(&dir.path().join("config.toml")).unwrap();

    assert_eq!(config.reports.week_days, 7);
    assert_eq!(config.sync.name_prefix, "Zwift - ");
    assert_eq!(config.sync.start_slack_minutes, 5);
}

#[test]
fn test_partial_config_keeps_other_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[reports]\ncolor = false\n").unwrap();

    let config = load_config_from(&path).unwrap();
    assert!(!config.reports.color);
    assert_eq!(config.reports.week_days, 7);
}

#[test]
fn test_save_and_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let mut config = AppConfig::default();
    config.database_path = dir.path().join("rides.db");
    config.sync.start_slack_minutes = 10;
    save_config(&config, &path).unwrap();

    assert_eq!(load_config_from(&path).unwrap(), config);
}
