/*!
 * Tests for configuration loading, saving, and validation
 */

use localcat::app_config::{Config, NormalizationMode};

use crate::common;

#[test]
fn test_config_saveAndLoad_shouldRoundTrip() {
    let dir = common::create_temp_dir().unwrap();
    let path = dir.path().join("localcat.json");

    let config = Config {
        case_sensitive: false,
        fuzzy_threshold: 0.85,
        fuzzy_top_k: 3,
        normalization_mode: NormalizationMode::WhitespaceCasePunctuation,
        ..Default::default()
    };
    config.save(&path).unwrap();

    let loaded = Config::from_file(&path).unwrap();
    assert!(!loaded.case_sensitive);
    assert!((loaded.fuzzy_threshold - 0.85).abs() < f32::EPSILON);
    assert_eq!(loaded.fuzzy_top_k, 3);
    assert_eq!(
        loaded.normalization_mode,
        NormalizationMode::WhitespaceCasePunctuation
    );
}

#[test]
fn test_config_fromFile_withMissingFile_shouldFail() {
    let dir = common::create_temp_dir().unwrap();
    let result = Config::from_file(dir.path().join("absent.json"));
    assert!(result.is_err());
}

#[test]
fn test_config_fromFile_withInvalidJson_shouldFail() {
    let dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(dir.path(), "bad.json", "{not json").unwrap();
    assert!(Config::from_file(path).is_err());
}

#[test]
fn test_config_fromFile_withOutOfRangeThreshold_shouldFailValidation() {
    let dir = common::create_temp_dir().unwrap();
    let path =
        common::create_test_file(dir.path(), "bad.json", r#"{"fuzzy_threshold": 2.0}"#).unwrap();
    assert!(Config::from_file(path).is_err());
}

#[test]
fn test_config_normalizationModes_shouldSerializeAsSpecStrings() {
    let json = serde_json::to_string(&NormalizationMode::WhitespaceCase).unwrap();
    assert_eq!(json, r#""whitespace+case""#);

    let parsed: NormalizationMode =
        serde_json::from_str(r#""whitespace+case+punctuation""#).unwrap();
    assert_eq!(parsed, NormalizationMode::WhitespaceCasePunctuation);
}
