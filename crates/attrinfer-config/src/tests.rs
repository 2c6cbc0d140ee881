use pretty_assertions::assert_eq;

use crate::EngineConfig;

#[test]
fn defaults_are_lenient() {
    let config = EngineConfig::default();
    assert!(!config.strict_scores);
    assert!(!config.log_grouping_decisions);
}

#[test]
fn parses_toml() {
    let config = EngineConfig::from_toml_str(
        r#"
        strict_scores = true
        log_grouping_decisions = true
        "#,
    )
    .unwrap();
    assert_eq!(
        config,
        EngineConfig {
            strict_scores: true,
            log_grouping_decisions: true,
        }
    );
}

#[test]
fn missing_file_is_an_io_error_not_a_panic() {
    let err = EngineConfig::load("/nonexistent/attrinfer.toml").unwrap_err();
    assert!(matches!(err, crate::ConfigError::Io(_)));
}

#[test]
fn builder_methods_compose() {
    let config = EngineConfig::new()
        .with_strict_scores(true)
        .with_log_grouping_decisions(false);
    assert_eq!(
        config,
        EngineConfig {
            strict_scores: true,
            log_grouping_decisions: false,
        }
    );
}
