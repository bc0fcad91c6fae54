// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Scriptpress converter.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Output formats produced by a conversion, in declaration order.
///
/// The declaration order is also the order of paths in a conversion report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Docx,
    Xlsx,
    Pdf,
    Jpeg,
    Png,
}

impl OutputFormat {
    /// Every format, in report order.
    pub const ALL: [OutputFormat; 6] = [
        Self::Text,
        Self::Docx,
        Self::Xlsx,
        Self::Pdf,
        Self::Jpeg,
        Self::Png,
    ];

    /// File extension used for the output file.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Docx => "docx",
            Self::Xlsx => "xlsx",
            Self::Pdf => "pdf",
            Self::Jpeg => "jpg",
            Self::Png => "png",
        }
    }

    /// MIME type of the produced file.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Text => "text/plain; charset=utf-8",
            Self::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            Self::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            Self::Pdf => "application/pdf",
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }

    /// Infer the output format from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "txt" => Some(Self::Text),
            "docx" => Some(Self::Docx),
            "xlsx" => Some(Self::Xlsx),
            "pdf" => Some(Self::Pdf),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            _ => None,
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Text => "text",
            Self::Docx => "document",
            Self::Xlsx => "spreadsheet",
            Self::Pdf => "PDF",
            Self::Jpeg => "JPEG image",
            Self::Png => "PNG image",
        };
        f.write_str(label)
    }
}

/// What to do with already-written outputs when another emitter fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Wait for every emitter, then delete whatever this batch wrote.
    #[default]
    Rollback,
    /// Leave successful outputs on disk.
    KeepPartial,
}

/// One conversion: the input text and where its outputs go.
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    pub text: String,
    pub output_dir: PathBuf,
    /// File name without extension shared by all outputs.
    pub file_stem: String,
}

impl ConversionRequest {
    pub fn new(text: impl Into<String>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            text: text.into(),
            output_dir: output_dir.into(),
            file_stem: "output".to_string(),
        }
    }

    pub fn with_stem(mut self, stem: impl Into<String>) -> Self {
        self.file_stem = stem.into();
        self
    }

    /// Destination path for one output format.
    pub fn path_for(&self, format: OutputFormat) -> PathBuf {
        self.output_dir
            .join(format!("{}.{}", self.file_stem, format.extension()))
    }
}

/// Outcome of a successful conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionReport {
    /// Produced files, in [`OutputFormat::ALL`] order.
    pub paths: Vec<PathBuf>,
    /// Key of the script profile used for rendering.
    pub script: &'static str,
    /// True when rendering used a fallback instead of the profile's font.
    pub font_degraded: bool,
}

impl ConversionReport {
    pub fn path(&self, format: OutputFormat) -> Option<&Path> {
        let idx = OutputFormat::ALL.iter().position(|f| *f == format)?;
        self.paths.get(idx).map(PathBuf::as_path)
    }
}
