// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Scriptpress.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::OutputFormat;

/// Top-level error type for all Scriptpress operations.
#[derive(Debug, Error)]
pub enum ScriptpressError {
    // -- Font acquisition (recoverable) --
    #[error("font acquisition failed for {profile}: {reason}")]
    FontAcquisition { profile: String, reason: String },

    #[error("font download for {profile} timed out after {seconds}s")]
    FontTimeout { profile: String, seconds: u64 },

    // -- Batch preparation --
    #[error("could not create output directory {}: {source}", path.display())]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // -- Emitters --
    #[error("{format} emitter failed: {reason}")]
    Emitter { format: OutputFormat, reason: String },

    #[error("PDF operation failed: {0}")]
    PdfError(String),

    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("archive packaging failed: {0}")]
    Archive(String),

    // -- Configuration --
    #[error("invalid configuration: {0}")]
    Config(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ScriptpressError {
    /// Whether the conversion can continue with a degraded result.
    ///
    /// Only font acquisition failures are recoverable: the renderers fall
    /// back to a system or built-in font.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::FontAcquisition { .. } | Self::FontTimeout { .. })
    }

    /// Wrap any error raised inside an emitter so the caller can tell which
    /// output format failed.
    pub fn into_emitter(self, format: OutputFormat) -> Self {
        match self {
            already @ Self::Emitter { .. } => already,
            other => Self::Emitter {
                format,
                reason: other.to_string(),
            },
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ScriptpressError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn font_errors_are_recoverable() {
        let err = ScriptpressError::FontTimeout {
            profile: "Noto Sans".into(),
            seconds: 30,
        };
        assert!(err.is_recoverable());
        assert!(!ScriptpressError::Config("bad".into()).is_recoverable());
    }

    #[test]
    fn into_emitter_keeps_the_failing_format() {
        let err = ScriptpressError::ImageError("encoder exploded".into()).into_emitter(OutputFormat::Png);
        match err {
            ScriptpressError::Emitter { format, reason } => {
                assert_eq!(format, OutputFormat::Png);
                assert!(reason.contains("encoder exploded"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn into_emitter_does_not_double_wrap() {
        let err = ScriptpressError::Emitter {
            format: OutputFormat::Pdf,
            reason: "disk full".into(),
        }
        .into_emitter(OutputFormat::Png);
        assert!(matches!(err, ScriptpressError::Emitter { format: OutputFormat::Pdf, .. }));
    }
}
