// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Converter configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, ScriptpressError};
use crate::types::FailurePolicy;

/// Settings for a converter instance.
///
/// Missing fields in a config file fall back to [`Default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    /// Directory the output files are written to.
    pub output_dir: PathBuf,
    /// Shared file name (without extension) for every output.
    pub file_stem: String,
    /// Directory holding downloaded font files. Defaults to `fonts` beside
    /// the executable; a relative path given explicitly is taken as is.
    pub font_dir: PathBuf,
    /// Upper bound on a single font download.
    pub download_timeout_secs: u64,
    /// JPEG encoder quality (1-100).
    pub jpeg_quality: u8,
    /// What happens to finished outputs when another emitter fails.
    pub failure_policy: FailurePolicy,
    /// Skip detection and render with this script profile key.
    pub forced_script: Option<String>,
    pub canvas: CanvasConfig,
    pub pdf: PdfConfig,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            file_stem: "output".to_string(),
            font_dir: default_font_dir(),
            download_timeout_secs: 30,
            jpeg_quality: 90,
            failure_policy: FailurePolicy::Rollback,
            forced_script: None,
            canvas: CanvasConfig::default(),
            pdf: PdfConfig::default(),
        }
    }
}

/// `fonts` next to the running executable, or in the working directory when
/// the executable path cannot be determined.
pub fn default_font_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("fonts")))
        .unwrap_or_else(|| PathBuf::from("fonts"))
}

impl ConvertConfig {
    /// Read a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&data)?;
        config.validate()?;
        debug!(path = %path.as_ref().display(), "loaded converter config");
        Ok(config)
    }

    /// Write this config as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }

    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }

    /// Reject values no emitter can work with.
    pub fn validate(&self) -> Result<()> {
        if self.file_stem.trim().is_empty() {
            return Err(ScriptpressError::Config("file_stem must not be empty".into()));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(ScriptpressError::Config(format!(
                "jpeg_quality must be within 1..=100, got {}",
                self.jpeg_quality
            )));
        }
        if self.canvas.max_line_width() <= 0.0 {
            return Err(ScriptpressError::Config(
                "canvas padding leaves no room for text".into(),
            ));
        }
        if self.canvas.max_height < self.canvas.min_height
            || self.canvas.max_height > MAX_RASTER_HEIGHT
        {
            return Err(ScriptpressError::Config(format!(
                "canvas max_height must be within {}..={MAX_RASTER_HEIGHT}",
                self.canvas.min_height
            )));
        }
        if self.canvas.font_size <= 0.0 || self.pdf.font_size <= 0.0 {
            return Err(ScriptpressError::Config("font sizes must be positive".into()));
        }
        Ok(())
    }
}

/// Largest image dimension the JPEG encoder accepts.
pub const MAX_RASTER_HEIGHT: u32 = 65_535;

/// Raster canvas geometry, in pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: u32,
    pub min_height: u32,
    pub font_size: f32,
    /// Line height as a multiple of `font_size`.
    pub line_height_factor: f32,
    pub padding: u32,
    /// Tallest canvas that will be rendered. JPEG cannot encode more than
    /// 65 535 rows.
    pub max_height: u32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 1200,
            min_height: 400,
            font_size: 32.0,
            line_height_factor: 1.8,
            padding: 60,
            max_height: MAX_RASTER_HEIGHT,
        }
    }
}

impl CanvasConfig {
    pub fn line_height(&self) -> f32 {
        self.font_size * self.line_height_factor
    }

    /// Widest a line may measure before it wraps.
    pub fn max_line_width(&self) -> f32 {
        self.width as f32 - 2.0 * self.padding as f32
    }

    /// Canvas height for `line_count` lines: room for the lines plus three
    /// paddings, never below `min_height`.
    pub fn height_for(&self, line_count: usize) -> u32 {
        let needed = line_count as f32 * self.line_height() + 3.0 * self.padding as f32;
        (needed.ceil() as u32).max(self.min_height)
    }
}

/// PDF page layout, in points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    pub margin_pt: f32,
    pub font_size: f32,
    pub line_height_factor: f32,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            margin_pt: 50.0,
            font_size: 12.0,
            line_height_factor: 1.2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canvas_height_has_a_floor() {
        let canvas = CanvasConfig::default();
        assert_eq!(canvas.height_for(0), 400);
        assert_eq!(canvas.height_for(2), 400);
        // 10 lines * 57.6 + 180 = 756
        assert_eq!(canvas.height_for(10), 756);
    }

    #[test]
    fn max_height_is_capped_at_the_jpeg_limit() {
        let mut config = ConvertConfig::default();
        assert_eq!(config.canvas.max_height, 65_535);
        config.canvas.max_height = 70_000;
        assert!(matches!(config.validate(), Err(ScriptpressError::Config(_))));
        config.canvas.max_height = 100;
        assert!(config.validate().is_err());
    }

    #[test]
    fn default_canvas_leaves_1080_for_text() {
        assert_eq!(CanvasConfig::default().max_line_width(), 1080.0);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: ConvertConfig =
            serde_json::from_str(r#"{ "file_stem": "report", "canvas": { "padding": 20 } }"#)
                .unwrap();
        assert_eq!(config.file_stem, "report");
        assert_eq!(config.canvas.padding, 20);
        assert_eq!(config.canvas.width, 1200);
        assert_eq!(config.failure_policy, FailurePolicy::Rollback);
        assert_eq!(config.download_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn font_dir_defaults_to_beside_the_executable() {
        let exe = std::env::current_exe().unwrap();
        let expected = exe.parent().unwrap().join("fonts");
        assert_eq!(ConvertConfig::default().font_dir, expected);

        // Missing from a config file: same default. Given explicitly: kept.
        let config: ConvertConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.font_dir, expected);
        let config: ConvertConfig = serde_json::from_str(r#"{ "font_dir": "fonts" }"#).unwrap();
        assert_eq!(config.font_dir, PathBuf::from("fonts"));
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scriptpress.json");
        let config = ConvertConfig {
            forced_script: Some("arabic".into()),
            failure_policy: FailurePolicy::KeepPartial,
            ..Default::default()
        };
        config.save(&path).unwrap();
        assert_eq!(ConvertConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn bad_quality_is_rejected() {
        let config = ConvertConfig {
            jpeg_quality: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ScriptpressError::Config(_))));
    }
}
