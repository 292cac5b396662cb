// src/config/tests.rs

use super::*;
use std::time::Duration;
use test_log::test;

#[test]
fn it_should_default_to_the_portrait_panel_at_double_scale() {
    let config = Config::default();
    assert_eq!(config.display.logical_width, 320);
    assert_eq!(config.display.logical_height, 172);
    assert_eq!(config.display.physical_size(), (172, 320));
    assert_eq!(config.display.window_size(), (640, 344));
    assert_eq!(config.timing.target_fps, 60);
    assert_eq!(config.timing.discovery_poll_interval(), Duration::from_millis(100));
    assert_eq!(config.timing.discovery_timeout(), Duration::from_secs(5));
    assert_eq!(config.timing.run_timeout(), None);
    assert!(config.validate().is_ok());
}

#[test]
fn it_should_fill_missing_fields_with_defaults() {
    let config: Config =
        serde_json::from_str(r#"{ "display": { "scale": 3 }, "timing": { "run_timeout_secs": 7 } }"#)
            .unwrap();
    assert_eq!(config.display.scale, 3);
    assert_eq!(config.display.logical_width, 320);
    assert_eq!(config.timing.run_timeout(), Some(Duration::from_secs(7)));
    assert_eq!(config.timing.target_fps, 60);
}

#[test]
fn it_should_treat_a_zero_run_timeout_as_no_timeout() {
    let mut timing = TimingConfig::default();
    timing.run_timeout_secs = Some(0);
    assert_eq!(timing.run_timeout(), None);

    timing.run_timeout_secs = Some(1);
    assert_eq!(timing.run_timeout(), Some(Duration::from_secs(1)));
}

#[test]
fn it_should_reject_a_zero_scale() {
    let mut config = Config::default();
    config.display.scale = 0;
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
}

#[test]
fn it_should_reject_zero_dimensions_and_rates() {
    let mut config = Config::default();
    config.display.logical_height = 0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.timing.target_fps = 0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.timing.discovery_poll_interval_ms = 0;
    assert!(config.validate().is_err());
}

#[test]
fn it_should_name_the_driver_in_the_window_title() {
    assert_eq!(
        DisplayConfig::default().window_title("color-bars"),
        "Simulator - color-bars"
    );
}

#[test]
fn it_should_load_a_config_file() {
    let path = std::env::temp_dir().join(format!("fbsim-config-{}.json", std::process::id()));
    std::fs::write(&path, r#"{ "timing": { "target_fps": 30 } }"#).unwrap();
    let loaded = Config::load(&path);
    std::fs::remove_file(&path).ok();

    let config = loaded.unwrap();
    assert_eq!(config.timing.target_fps, 30);
    assert_eq!(
        config.timing.frame_duration(),
        Duration::from_secs_f64(1.0 / 30.0)
    );
}

#[test]
fn it_should_report_unreadable_and_malformed_files() {
    let missing = std::env::temp_dir().join("fbsim-config-does-not-exist.json");
    assert!(matches!(Config::load(&missing), Err(ConfigError::Io { .. })));

    let path = std::env::temp_dir().join(format!("fbsim-bad-config-{}.json", std::process::id()));
    std::fs::write(&path, "{ not json").unwrap();
    let loaded = Config::load(&path);
    std::fs::remove_file(&path).ok();
    assert!(matches!(loaded, Err(ConfigError::Parse { .. })));
}
