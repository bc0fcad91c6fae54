// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Parsed font faces and text measurement.
//
// Sizes are em sizes, as in CSS and PDF: a 32px face has a 32-unit em square.
// `ab_glyph` scales by line height instead, so the em size is converted with
// the face's units-per-em before measuring or drawing.

use ab_glyph::{Font, FontArc, FontVec, GlyphId, PxScale, ScaleFont};
use scriptpress_core::error::{Result, ScriptpressError};
use scriptpress_fonts::ResolvedFont;
use tracing::warn;

/// A parsed font at a fixed em size.
#[derive(Clone)]
pub struct FontFace {
    font: FontArc,
    scale: PxScale,
    family: String,
}

impl FontFace {
    /// Parse font bytes and size the face to `em_size` units.
    pub fn from_bytes(data: Vec<u8>, index: u32, em_size: f32, family: impl Into<String>) -> Result<Self> {
        let font = FontVec::try_from_vec_and_index(data, index)
            .map_err(|e| ScriptpressError::ImageError(format!("invalid font data: {e}")))?;
        let font = FontArc::new(font);
        let scale = em_scale(&font, em_size);
        Ok(Self {
            font,
            scale,
            family: family.into(),
        })
    }

    /// Parse the bytes of a resolved font, logging and returning `None` when
    /// there are none or they cannot be parsed.
    pub fn from_resolved(resolved: &ResolvedFont, em_size: f32) -> Option<Self> {
        let bytes = resolved.bytes()?;
        match Self::from_bytes(bytes.to_vec(), resolved.index, em_size, resolved.family.clone()) {
            Ok(face) => Some(face),
            Err(e) => {
                warn!(family = %resolved.family, error = %e, "font could not be parsed");
                None
            }
        }
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn font(&self) -> &FontArc {
        &self.font
    }

    pub fn scale(&self) -> PxScale {
        self.scale
    }

    /// Advance width of `text`, including kerning.
    pub fn width(&self, text: &str) -> f32 {
        let scaled = self.font.as_scaled(self.scale);
        let mut width = 0.0;
        let mut previous: Option<GlyphId> = None;
        for ch in text.chars() {
            let id = scaled.glyph_id(ch);
            if let Some(prev) = previous {
                width += scaled.kern(prev, id);
            }
            width += scaled.h_advance(id);
            previous = Some(id);
        }
        width
    }

    /// Ascent minus descent: the height of one unspaced line.
    pub fn line_box(&self) -> f32 {
        self.font.as_scaled(self.scale).height()
    }
}

/// Measures text either with a real face or with a fixed average advance.
#[derive(Clone)]
pub enum Measurer {
    Face(FontFace),
    /// Every character advances by `advance` units.
    Approximate { advance: f32 },
}

impl Measurer {
    /// Average-advance fallback: half the em size per character.
    pub fn approximate(em_size: f32) -> Self {
        Self::Approximate {
            advance: 0.5 * em_size,
        }
    }

    pub fn width(&self, text: &str) -> f32 {
        match self {
            Self::Face(face) => face.width(text),
            Self::Approximate { advance } => text.chars().count() as f32 * advance,
        }
    }

    pub fn face(&self) -> Option<&FontFace> {
        match self {
            Self::Face(face) => Some(face),
            Self::Approximate { .. } => None,
        }
    }
}

fn em_scale(font: &FontArc, em_size: f32) -> PxScale {
    match font.units_per_em() {
        Some(upem) if upem > 0.0 => PxScale::from(em_size * font.height_unscaled() / upem),
        _ => PxScale::from(em_size),
    }
}
