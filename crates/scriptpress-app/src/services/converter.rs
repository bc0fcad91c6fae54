// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Conversion orchestrator — one input text to all six output formats.
//
// The script is classified and the font resolved once per request; the six
// emitters then run concurrently (CPU-bound ones on the blocking pool) and
// are joined in declaration order, so the report never depends on which
// emitter happened to finish first.

use std::path::PathBuf;
use std::sync::Arc;

use scriptpress_core::config::ConvertConfig;
use scriptpress_core::error::{Result, ScriptpressError};
use scriptpress_core::script::{ScriptProfile, classify, profile_by_key};
use scriptpress_core::types::{ConversionReport, ConversionRequest, FailurePolicy, OutputFormat};
use scriptpress_document::{DocxWriter, PdfWriter, TextRasterizer, XlsxWriter};
use scriptpress_fonts::{CachedFontResolver, FontCache, FontResolver, ResolvedFont};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

/// Runs conversions against one configuration and font resolver.
pub struct Converter<R = CachedFontResolver> {
    config: ConvertConfig,
    resolver: Arc<R>,
}

impl Converter<CachedFontResolver> {
    /// Converter backed by the HTTP font cache in `config.font_dir`.
    pub fn from_config(config: ConvertConfig) -> Result<Self> {
        config.validate()?;
        let cache = FontCache::http(&config.font_dir, config.download_timeout())?;
        let resolver = CachedFontResolver::new(Arc::new(cache));
        Ok(Self::new(config, Arc::new(resolver)))
    }
}

impl<R: FontResolver> Converter<R> {
    pub fn new(config: ConvertConfig, resolver: Arc<R>) -> Self {
        Self { config, resolver }
    }

    pub fn config(&self) -> &ConvertConfig {
        &self.config
    }

    /// Convert `text` into the configured output directory and stem.
    pub async fn convert_text(&self, text: &str) -> Result<ConversionReport> {
        let request = ConversionRequest::new(text, self.config.output_dir.clone())
            .with_stem(self.config.file_stem.clone());
        self.convert_all(&request).await
    }

    /// Write every output format for `request`.
    ///
    /// Paths come back in [`OutputFormat::ALL`] order. When an emitter fails
    /// the first failure in that order is returned after all emitters have
    /// settled; with [`FailurePolicy::Rollback`] the files this batch wrote
    /// are removed first.
    #[instrument(skip(self, request), fields(text_len = request.text.len(), dir = %request.output_dir.display()))]
    pub async fn convert_all(&self, request: &ConversionRequest) -> Result<ConversionReport> {
        let profile = self.select_profile(&request.text)?;
        let right_to_left = profile.right_to_left;

        tokio::fs::create_dir_all(&request.output_dir)
            .await
            .map_err(|source| {
                error!(stage = "prepare", dir = %request.output_dir.display(), error = %source, "cannot create output directory");
                ScriptpressError::DirectoryCreation {
                    path: request.output_dir.clone(),
                    source,
                }
            })?;

        let font = self.resolver.resolve(profile).await;
        if font.is_degraded() {
            warn!(stage = "font", script = profile.key, family = %font.family, "rendering with a fallback font");
        }

        info!(script = profile.key, rtl = right_to_left, "dispatching emitters");

        let text: Arc<str> = Arc::from(request.text.as_str());
        let tasks: Vec<(OutputFormat, PathBuf, JoinHandle<Result<()>>)> = OutputFormat::ALL
            .into_iter()
            .map(|format| {
                let path = request.path_for(format);
                let handle = self.spawn_emitter(
                    format,
                    Arc::clone(&text),
                    path.clone(),
                    right_to_left,
                    &font,
                    &request.file_stem,
                );
                (format, path, handle)
            })
            .collect();

        let mut written: Vec<PathBuf> = Vec::with_capacity(tasks.len());
        let mut first_failure: Option<ScriptpressError> = None;

        for (format, path, handle) in tasks {
            let outcome = match handle.await {
                Ok(result) => result.map_err(|e| e.into_emitter(format)),
                Err(join_err) => Err(ScriptpressError::Emitter {
                    format,
                    reason: format!("emitter task aborted: {join_err}"),
                }),
            };
            match outcome {
                Ok(()) => {
                    debug!(%format, path = %path.display(), "output written");
                    written.push(path);
                }
                Err(e) => {
                    error!(stage = "emit", %format, error = %e, "emitter failed");
                    first_failure.get_or_insert(e);
                }
            }
        }

        if let Some(err) = first_failure {
            if self.config.failure_policy == FailurePolicy::Rollback {
                rollback(&written).await;
            }
            return Err(err);
        }

        info!(script = profile.key, outputs = written.len(), "conversion complete");
        Ok(ConversionReport {
            paths: written,
            script: profile.key,
            font_degraded: font.is_degraded(),
        })
    }

    fn select_profile(&self, text: &str) -> Result<&'static ScriptProfile> {
        match self.config.forced_script.as_deref() {
            Some(key) => profile_by_key(key).ok_or_else(|| {
                ScriptpressError::Config(format!("unknown script profile '{key}'"))
            }),
            None => Ok(classify(text)),
        }
    }

    fn spawn_emitter(
        &self,
        format: OutputFormat,
        text: Arc<str>,
        path: PathBuf,
        right_to_left: bool,
        font: &ResolvedFont,
        title: &str,
    ) -> JoinHandle<Result<()>> {
        match format {
            OutputFormat::Text => tokio::spawn(async move {
                tokio::fs::write(&path, text.as_bytes())
                    .await
                    .map_err(ScriptpressError::from)
            }),
            OutputFormat::Docx => tokio::task::spawn_blocking(move || {
                DocxWriter::new()
                    .right_to_left(right_to_left)
                    .write_text_to_file(&text, &path)
            }),
            OutputFormat::Xlsx => tokio::task::spawn_blocking(move || {
                XlsxWriter::new().write_text_to_file(&text, &path)
            }),
            OutputFormat::Pdf => {
                let mut writer = PdfWriter::new(self.config.pdf.clone());
                writer.set_title(title);
                let font = font.clone();
                tokio::task::spawn_blocking(move || {
                    writer.write_text_to_file(&text, right_to_left, &font, &path)
                })
            }
            OutputFormat::Jpeg => {
                let canvas = self.config.canvas.clone();
                let quality = self.config.jpeg_quality;
                let font = font.clone();
                tokio::task::spawn_blocking(move || {
                    TextRasterizer::new(canvas, &font).write_jpeg_to_file(&text, right_to_left, quality, &path)
                })
            }
            OutputFormat::Png => {
                let canvas = self.config.canvas.clone();
                let font = font.clone();
                tokio::task::spawn_blocking(move || {
                    TextRasterizer::new(canvas, &font).write_png_to_file(&text, right_to_left, &path)
                })
            }
        }
    }
}

/// Remove the outputs of a failed batch.
async fn rollback(written: &[PathBuf]) {
    for path in written {
        match tokio::fs::remove_file(path).await {
            Ok(()) => debug!(path = %path.display(), "rolled back output"),
            Err(e) => warn!(stage = "emit", path = %path.display(), error = %e, "could not roll back output"),
        }
    }
    info!(removed = written.len(), "rolled back partial conversion");
}
