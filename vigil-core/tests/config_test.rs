//! Config loading: defaults, TOML merge, validation failures.

use vigil_core::config::AuditConfig;
use vigil_core::errors::ConfigError;

#[test]
fn defaults_are_valid() {
    let config = AuditConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.process.max_idle_ratio, 0.25);
    assert_eq!(config.process.max_dwell_sec, 300.0);
    assert_eq!(config.scoring.score_threshold, 70.0);
    assert!(!config.summary.enabled);
}

#[test]
fn toml_overrides_defaults() {
    let config = AuditConfig::from_toml(
        r#"
        [process]
        max_idle_ratio = 0.4
        max_dwell_sec = 120.0

        [scoring]
        score_threshold = 50.0
        "#,
    )
    .unwrap();
    assert_eq!(config.process.max_idle_ratio, 0.4);
    assert_eq!(config.process.max_dwell_sec, 120.0);
    assert_eq!(config.scoring.score_threshold, 50.0);
    // Untouched sections keep their defaults.
    assert_eq!(config.process.gap_threshold_sec, 30.0);
    assert_eq!(config.evaluator.snippet_max_chars, 160);
}

#[test]
fn out_of_range_idle_ratio_is_rejected() {
    let err = AuditConfig::from_toml(
        r#"
        [process]
        max_idle_ratio = 1.5
        "#,
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::ValidationFailed { ref field, .. }
        if field == "process.max_idle_ratio"));
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let err = AuditConfig::from_toml("process = not valid").unwrap_err();
    assert!(matches!(err, ConfigError::ParseError { .. }));
}

#[test]
fn load_without_project_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = AuditConfig::load(dir.path()).unwrap();
    assert_eq!(config.process.max_idle_ratio, 0.25);
}

#[test]
fn load_reads_project_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("vigil.toml"),
        "[scoring]\nscore_threshold = 60.0\n",
    )
    .unwrap();
    let config = AuditConfig::load(dir.path()).unwrap();
    assert_eq!(config.scoring.score_threshold, 60.0);
}

#[test]
fn roundtrips_through_toml() {
    let config = AuditConfig::default();
    let text = config.to_toml().unwrap();
    let back = AuditConfig::from_toml(&text).unwrap();
    assert_eq!(back.process.max_idle_ratio, config.process.max_idle_ratio);
    assert_eq!(back.summary.model, config.summary.model);
}
