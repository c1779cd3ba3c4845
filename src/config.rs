// SPDX-License-Identifier: GPL-3.0-only

//! User configuration for the capture pipeline

use crate::constants::{
    DEFAULT_FPS, DEFAULT_JPEG_QUALITY, DEFAULT_PREVIEW_HEIGHT, DEFAULT_PREVIEW_WIDTH,
};
use crate::errors::{PipelineError, PipelineResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Pipeline configuration
///
/// Loaded from a JSON file or built from CLI arguments. Missing fields fall
/// back to their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Capture tick rate in frames per second
    pub fps: u32,
    /// JPEG quality for recognizer uploads, 1-100
    ///
    /// The JPEG encoder's valid range starts at 1, so 0 is rejected by
    /// [`validate`](Self::validate) rather than silently clamped.
    pub jpeg_quality: u8,
    /// Preview width in pixels
    pub width: u32,
    /// Preview height in pixels
    pub height: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fps: DEFAULT_FPS,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            width: DEFAULT_PREVIEW_WIDTH,
            height: DEFAULT_PREVIEW_HEIGHT,
        }
    }
}

impl Config {
    /// Load and validate a configuration from a JSON file
    pub fn load(path: &Path) -> PipelineResult<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| PipelineError::Config(format!("read {}: {}", path.display(), e)))?;
        let config: Config = serde_json::from_str(&raw)
            .map_err(|e| PipelineError::Config(format!("parse {}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that all fields are usable by the pipeline
    pub fn validate(&self) -> PipelineResult<()> {
        if self.fps == 0 {
            return Err(PipelineError::Config("fps must be at least 1".into()));
        }
        if self.jpeg_quality == 0 || self.jpeg_quality > 100 {
            return Err(PipelineError::Config(
                "jpeg_quality must be between 1 and 100".into(),
            ));
        }
        if self.width == 0 || self.height == 0 {
            return Err(PipelineError::Config(
                "preview resolution must be non-zero".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.fps, 3);
        assert_eq!(config.jpeg_quality, 100);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: Config = serde_json::from_str(r#"{"fps": 5}"#).unwrap();
        assert_eq!(config.fps, 5);
        assert_eq!(config.width, DEFAULT_PREVIEW_WIDTH);
        assert_eq!(config.height, DEFAULT_PREVIEW_HEIGHT);
    }

    #[test]
    fn zero_fps_is_rejected() {
        let config = Config {
            fps: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn out_of_range_quality_is_rejected() {
        let config = Config {
            jpeg_quality: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
