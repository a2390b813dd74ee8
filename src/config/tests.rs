use super::*;

#[test]
fn defaults_resolve_without_any_sources() {
    let settings = Settings::from_raw(RawSettings::default()).expect("valid settings");
    assert_eq!(settings.product.name, DEFAULT_PRODUCT_NAME);
    assert_eq!(settings.storage.directory, PathBuf::from(DEFAULT_STORAGE_DIR));
    assert_eq!(
        settings.storage.autosave_debounce,
        Duration::from_millis(DEFAULT_AUTOSAVE_DEBOUNCE_MS)
    );
    assert_eq!(settings.logging.level, LevelFilter::INFO);
    assert!(matches!(settings.logging.format, LogFormat::Compact));
}

#[test]
fn cli_overrides_take_highest_precedence() {
    let mut raw = RawSettings::default();
    raw.logging.level = Some("info".to_string());
    raw.storage.directory = Some(PathBuf::from("from-file"));

    let overrides = GlobalOverrides {
        storage_dir: Some(PathBuf::from("from-cli")),
        log_level: Some("debug".to_string()),
        ..Default::default()
    };
    raw.apply_overrides(&overrides);

    let settings = Settings::from_raw(raw).expect("valid settings");
    assert_eq!(settings.storage.directory, PathBuf::from("from-cli"));
    assert_eq!(settings.logging.level, LevelFilter::DEBUG);
}

#[test]
fn cli_json_logging_enforces_format() {
    let mut raw = RawSettings::default();
    let overrides = GlobalOverrides {
        log_json: Some(true),
        ..Default::default()
    };
    raw.apply_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");
    assert!(matches!(settings.logging.format, LogFormat::Json));
}

#[test]
fn blank_product_name_falls_back_to_default() {
    let mut raw = RawSettings::default();
    raw.product.name = Some("   ".to_string());
    let settings = Settings::from_raw(raw).expect("valid settings");
    assert_eq!(settings.product.name, DEFAULT_PRODUCT_NAME);
}

#[test]
fn zero_debounce_is_rejected() {
    let mut raw = RawSettings::default();
    raw.storage.autosave_debounce_ms = Some(0);
    let error = Settings::from_raw(raw).expect_err("invalid settings");
    assert!(matches!(error, LoadError::Invalid { key, .. } if key == "storage.autosave_debounce_ms"));
}

#[test]
fn invalid_log_level_is_rejected() {
    let mut raw = RawSettings::default();
    raw.logging.level = Some("chatty".to_string());
    assert!(Settings::from_raw(raw).is_err());
}
