//! Configuration parsing and validation

use copay_match::{DistanceMetric, MatchError, MatchingConfig, StudyConfig};

#[test]
fn test_json_round_trip() {
    let mut config = StudyConfig::default();
    config.matching.distance = DistanceMetric::Euclidean;
    config.bootstrap.use_parallel = true;
    config.provinces = vec![1, 7];

    let json = serde_json::to_string(&config).unwrap();
    assert!(json.contains("\"euclidean\""));
    assert_eq!(StudyConfig::from_json_str(&json).unwrap(), config);
}

#[test]
fn test_empty_document_gives_defaults() {
    assert_eq!(StudyConfig::from_json_str("{}").unwrap(), StudyConfig::default());
}

#[test]
fn test_validation_errors() {
    assert!(matches!(
        StudyConfig::from_json_str(r#"{"matching": {"neighbours": 0}}"#),
        Err(MatchError::InvalidConfig(_))
    ));
    assert!(matches!(
        StudyConfig::from_json_str(r#"{"bootstrap": {"alpha": 0.0}}"#),
        Err(MatchError::InvalidConfig(_))
    ));
    assert!(matches!(
        StudyConfig::from_json_str(r#"{"matching": {"caliper": "wide"}}"#),
        Err(MatchError::Serialization(_))
    ));
    // Bootstrap settings are not checked when the bootstrap is off
    assert!(StudyConfig::from_json_str(r#"{"run_bootstrap": false, "bootstrap": {"replications": 0}}"#).is_ok());
}

#[test]
fn test_display_lists_settings() {
    let text = MatchingConfig::builder().caliper(0.75).build().to_string();
    assert!(text.contains("Caliper: 0.75"));
    assert!(text.contains("Random seed: 42"));
}
