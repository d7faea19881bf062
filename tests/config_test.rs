//! Config file round trips through the filesystem

use ecolumina_capture::quality::ResampleFilter;
use ecolumina_capture::{CaptureMode, ConfigError, EcoLuminaConfig};
use std::fs;

#[test]
fn test_config_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("ecolumina.toml");

    let mut config = EcoLuminaConfig::default();
    config.detector.threshold = 45.0;
    config.detector.filter = ResampleFilter::CatmullRom;
    config.capture.default_mode = CaptureMode::LenientSkipCheck;

    config.save_to_file(&path).unwrap();
    assert!(path.exists());

    let loaded = EcoLuminaConfig::load_from_file(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_load_rejects_invalid_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    fs::write(&path, "[detector]\ndownscale_factor = 0.0\n").unwrap();

    let err = EcoLuminaConfig::load_from_file(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
    assert!(err.to_string().contains("Downscale factor"));
}

#[test]
fn test_load_rejects_malformed_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "[detector\nthreshold = ").unwrap();

    assert!(matches!(
        EcoLuminaConfig::load_from_file(&path),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn test_unknown_mode_is_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mode.toml");
    fs::write(&path, "[capture]\ndefault_mode = \"sometimes\"\n").unwrap();

    assert!(matches!(
        EcoLuminaConfig::load_from_file(&path),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn test_lenient_mode_parses() {
    let config: EcoLuminaConfig =
        toml::from_str("[capture]\ndefault_mode = \"lenient_skip_check\"\njpeg_quality = 80\n")
            .unwrap();
    assert_eq!(config.capture.default_mode, CaptureMode::LenientSkipCheck);
    assert_eq!(config.capture.jpeg_quality, 80);
    assert!(config.validate().is_ok());
}
