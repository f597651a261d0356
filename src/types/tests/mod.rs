
use super::*;
use std::time::Duration;

// --- config.rs tests ---

#[test]
fn test_config_defaults() {
    let config = DriverConfig::default();
    assert_eq!(config.ptp_settle_interval, Duration::from_millis(10));
    assert_eq!(config.aux_poll_interval, Duration::from_millis(1));
    assert_eq!(config.aux_wait_timeout, Duration::from_millis(100));
    assert_eq!(config.mdio_poll_limit, 640);
    assert_eq!(config.tas_min_lead_ns, 0);
    assert_eq!(config.info_buffer_limit, 1024);
}

#[test]
fn test_config_builder() {
    let config = DriverConfig::builder()
        .ptp_settle_interval(Duration::from_millis(2))
        .aux_wait_timeout(Duration::from_millis(5))
        .mdio_poll_limit(8)
        .tas_min_lead_ns(1_000)
        .info_buffer_limit(16)
        .build();

    assert_eq!(config.ptp_settle_interval, Duration::from_millis(2));
    assert_eq!(config.aux_wait_timeout, Duration::from_millis(5));
    assert_eq!(config.mdio_poll_limit, 8);
    assert_eq!(config.tas_min_lead_ns, 1_000);
    assert_eq!(config.info_buffer_limit, 16);
}

#[test]
fn test_config_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("avb.json");

    let config = DriverConfig::builder()
        .aux_poll_interval(Duration::from_millis(3))
        .build();
    config.save(&path).unwrap();

    let loaded = DriverConfig::load(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_config_partial_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("partial.json");
    std::fs::write(&path, r#"{ "mdio_poll_limit": 12, "aux_wait_timeout": 250 }"#).unwrap();

    let loaded = DriverConfig::load(&path).unwrap();
    assert_eq!(loaded.mdio_poll_limit, 12);
    assert_eq!(loaded.aux_wait_timeout, Duration::from_millis(250));
    assert_eq!(loaded.ptp_settle_interval, Duration::from_millis(10));
}

#[test]
fn test_config_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = DriverConfig::load(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, crate::AvbError::ConfigIo(_)));
}

#[test]
fn test_config_load_malformed_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    std::fs::write(&path, "not json").unwrap();
    let err = DriverConfig::load(&path).unwrap_err();
    assert!(matches!(err, crate::AvbError::ConfigFormat(_)));
}

// --- clock.rs tests ---

#[test]
fn test_increment_timinca_encoding() {
    let inc = Increment::from_timinca(0x0800_0000);
    assert_eq!(inc.ns, 8);
    assert_eq!(inc.frac, 0);
    assert_eq!(inc.to_timinca(), 0x0800_0000);

    let inc = Increment::new(24, 0x12_3456);
    assert_eq!(inc.to_timinca(), 0x1812_3456);
    assert_eq!(inc.frac_2_32(), 0x1234_5600);
}

#[test]
fn test_increment_zero() {
    assert!(Increment::default().is_zero());
    assert!(!Increment::new(0, 1).is_zero());
}

#[test]
fn test_timestamping_control_flags() {
    let ctl = TimestampingControl {
        previous: 0x8000_0000,
        current: 0x0000_0111,
        freezes_on_disable: true,
    };
    assert!(ctl.clock_enabled());
    assert!(!ctl.clock_frozen());
    assert!(ctl.target_time_enabled());
    assert!(ctl.aux_capture_enabled());

    let disabled = TimestampingControl {
        previous: 0,
        current: 0xB800_0000,
        freezes_on_disable: false,
    };
    assert!(!disabled.clock_enabled());
    assert!(!disabled.clock_frozen());
}
