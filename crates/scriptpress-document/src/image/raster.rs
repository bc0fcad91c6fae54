// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text rasterizer — greedy-wraps the input against the resolved font, lays
// the lines out on a fixed-width canvas and draws them with `imageproc`.
//
// Layout is separate from drawing so alignment can be checked without any
// font installed.

use std::path::Path;

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_text_mut};
use imageproc::rect::Rect;
use scriptpress_core::config::CanvasConfig;
use scriptpress_core::error::{Result, ScriptpressError};
use scriptpress_core::wrap::wrap;
use scriptpress_fonts::ResolvedFont;
use tracing::{debug, info, instrument, warn};

use crate::bidi::visual_order;
use crate::face::{FontFace, Measurer};

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const INK: Rgb<u8> = Rgb([0, 0, 0]);
const PLACEHOLDER: Rgb<u8> = Rgb([96, 96, 96]);

/// One line positioned on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    /// Line text in visual (drawing) order.
    pub text: String,
    /// Left edge of the line.
    pub x: f32,
    /// Vertical centre of the line box.
    pub center_y: f32,
    pub width: f32,
}

/// Canvas size and line positions for one text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLayout {
    pub width: u32,
    pub height: u32,
    pub lines: Vec<PlacedLine>,
}

/// Renders text to PNG/JPEG at a fixed canvas width.
pub struct TextRasterizer {
    canvas: CanvasConfig,
    measurer: Measurer,
}

impl TextRasterizer {
    /// Use the resolved font, or average-advance metrics when it is missing
    /// or unparseable.
    pub fn new(canvas: CanvasConfig, font: &ResolvedFont) -> Self {
        let measurer = FontFace::from_resolved(font, canvas.font_size)
            .map(Measurer::Face)
            .unwrap_or_else(|| Measurer::approximate(canvas.font_size));
        Self { canvas, measurer }
    }

    pub fn with_measurer(canvas: CanvasConfig, measurer: Measurer) -> Self {
        Self { canvas, measurer }
    }

    pub fn canvas(&self) -> &CanvasConfig {
        &self.canvas
    }

    /// Wrapped lines in logical order.
    pub fn wrap(&self, text: &str) -> Vec<String> {
        wrap(text, |line| self.measurer.width(line), self.canvas.max_line_width())
    }

    /// Position every wrapped line. Right-to-left lines end at
    /// `width - padding`; others start at `padding`.
    pub fn layout(&self, text: &str, right_to_left: bool) -> TextLayout {
        let lines = self.wrap(text);
        let width = self.canvas.width;
        let height = self.canvas.height_for(lines.len());
        let line_height = self.canvas.line_height();
        let padding = self.canvas.padding as f32;

        let placed = lines
            .iter()
            .enumerate()
            .map(|(idx, line)| {
                let visual = visual_order(line, right_to_left);
                let line_width = self.measurer.width(&visual);
                let x = if right_to_left {
                    width as f32 - padding - line_width
                } else {
                    padding
                };
                PlacedLine {
                    text: visual,
                    x,
                    center_y: padding + idx as f32 * line_height + line_height / 2.0,
                    width: line_width,
                }
            })
            .collect();

        TextLayout {
            width,
            height,
            lines: placed,
        }
    }

    /// Draw `text` onto a fresh white canvas.
    ///
    /// Fails without allocating when the text needs a canvas taller than
    /// `max_height`.
    #[instrument(skip(self, text), fields(text_len = text.len(), rtl = right_to_left))]
    pub fn render(&self, text: &str, right_to_left: bool) -> Result<RgbImage> {
        let layout = self.layout(text, right_to_left);
        if layout.height > self.canvas.max_height {
            return Err(ScriptpressError::ImageError(format!(
                "{} lines need a {}px tall canvas, over the {}px limit",
                layout.lines.len(),
                layout.height,
                self.canvas.max_height
            )));
        }
        let mut image = RgbImage::from_pixel(layout.width, layout.height, BACKGROUND);

        match self.measurer.face() {
            Some(face) => {
                let half_box = face.line_box() / 2.0;
                for line in &layout.lines {
                    draw_text_mut(
                        &mut image,
                        INK,
                        line.x.round() as i32,
                        (line.center_y - half_box).round() as i32,
                        face.scale(),
                        face.font(),
                        &line.text,
                    );
                }
            }
            None => {
                // Without glyphs, mark where each line would be.
                warn!("no font face available, drawing line placeholders");
                let bar = (self.canvas.font_size / 2.0).max(1.0);
                for line in &layout.lines {
                    let bar_width = line.width.round() as u32;
                    if bar_width == 0 {
                        continue;
                    }
                    let rect = Rect::at(line.x.round() as i32, (line.center_y - bar / 2.0).round() as i32)
                        .of_size(bar_width, bar.round() as u32);
                    draw_filled_rect_mut(&mut image, rect, PLACEHOLDER);
                }
            }
        }

        debug!(
            width = layout.width,
            height = layout.height,
            lines = layout.lines.len(),
            "text rasterized"
        );
        Ok(image)
    }

    // -- Output ---------------------------------------------------------------

    /// Render and encode as PNG.
    pub fn create_png(&self, text: &str, right_to_left: bool) -> Result<Vec<u8>> {
        to_png_bytes(&self.render(text, right_to_left)?)
    }

    /// Render and encode as JPEG with the given quality (1-100).
    pub fn create_jpeg(&self, text: &str, right_to_left: bool, quality: u8) -> Result<Vec<u8>> {
        to_jpeg_bytes(&self.render(text, right_to_left)?, quality)
    }

    pub fn write_png_to_file(&self, text: &str, right_to_left: bool, path: impl AsRef<Path>) -> Result<()> {
        let bytes = self.create_png(text, right_to_left)?;
        std::fs::write(path.as_ref(), &bytes)?;
        info!("Wrote PNG to {}", path.as_ref().display());
        Ok(())
    }

    pub fn write_jpeg_to_file(
        &self,
        text: &str,
        right_to_left: bool,
        quality: u8,
        path: impl AsRef<Path>,
    ) -> Result<()> {
        let bytes = self.create_jpeg(text, right_to_left, quality)?;
        std::fs::write(path.as_ref(), &bytes)?;
        info!("Wrote JPEG to {}", path.as_ref().display());
        Ok(())
    }
}

/// Encode an RGB image as PNG bytes.
pub fn to_png_bytes(image: &RgbImage) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut buffer);
    DynamicImage::ImageRgb8(image.clone())
        .write_to(&mut cursor, ImageFormat::Png)
        .map_err(|err| ScriptpressError::ImageError(format!("PNG encoding failed: {}", err)))?;
    Ok(buffer)
}

/// Encode an RGB image as JPEG bytes with the given quality (1-100).
pub fn to_jpeg_bytes(image: &RgbImage, quality: u8) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, quality);
    image.write_with_encoder(encoder).map_err(|err| {
        ScriptpressError::ImageError(format!("JPEG encoding failed: {}", err))
    })?;
    Ok(buffer)
}
