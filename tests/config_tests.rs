// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for configuration module

use gesture_capture::Config;

#[test]
fn test_config_default() {
    let config = Config::default();

    // 3 fps capture with full-quality JPEG uploads
    assert_eq!(config.fps, 3, "Default capture rate should be 3 fps");
    assert_eq!(
        config.jpeg_quality, 100,
        "Default JPEG quality should be 100"
    );
    assert!(config.validate().is_ok(), "Defaults should validate");
}

#[test]
fn test_config_json_roundtrip() {
    let config = Config {
        fps: 10,
        jpeg_quality: 75,
        width: 1280,
        height: 720,
    };

    let json = serde_json::to_string(&config).expect("serialize");
    let restored: Config = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(config, restored);
}

#[test]
fn test_config_load_from_file() {
    let path = std::env::temp_dir().join(format!(
        "gesture-capture-config-{}.json",
        std::process::id()
    ));
    std::fs::write(&path, r#"{"fps": 7, "jpeg_quality": 60}"#).expect("write config");

    let config = Config::load(&path).expect("load config");
    assert_eq!(config.fps, 7);
    assert_eq!(config.jpeg_quality, 60);
    // unspecified fields fall back to defaults
    assert_eq!(config.width, 640);
    assert_eq!(config.height, 480);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_config_load_rejects_invalid_values() {
    let path = std::env::temp_dir().join(format!(
        "gesture-capture-bad-config-{}.json",
        std::process::id()
    ));
    std::fs::write(&path, r#"{"fps": 0}"#).expect("write config");

    assert!(Config::load(&path).is_err(), "fps 0 must be rejected");

    let _ = std::fs::remove_file(&path);
}
