// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF writer — lay text out on A4 pages using `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised via
// `PdfDocument::save()`.
//
// printpdf neither wraps, aligns nor reorders bidirectional text, so lines
// are wrapped with the same metrics the font will be drawn with, reordered
// into visual order, and right-aligned by hand for right-to-left scripts.

use std::path::Path;

use printpdf::font::ParsedFont;
use printpdf::{
    BuiltinFont, FontId, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Point, Pt,
    TextItem,
};
use scriptpress_core::config::PdfConfig;
use scriptpress_core::error::Result;
use scriptpress_core::wrap::wrap_paragraphs;
use scriptpress_fonts::ResolvedFont;
use tracing::{debug, info, instrument, warn};

use crate::bidi::visual_order;
use crate::face::{FontFace, Measurer};

/// A4 in millimetres.
const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;

/// Font the page operations are written with.
enum PageFont {
    Embedded(FontId),
    Helvetica,
}

/// One line positioned on a page, in points from the bottom-left corner.
#[derive(Debug, Clone, PartialEq)]
pub struct PdfLine {
    /// Line text in visual (drawing) order.
    pub text: String,
    pub x: f32,
    /// Baseline.
    pub y: f32,
    pub width: f32,
}

/// Creates PDF documents from plain text.
pub struct PdfWriter {
    layout: PdfConfig,
    /// Title metadata embedded in the PDF /Info dictionary.
    title: Option<String>,
}

impl PdfWriter {
    pub fn new(layout: PdfConfig) -> Self {
        Self {
            layout,
            title: None,
        }
    }

    /// Set a title for the PDF metadata.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    /// Page dimensions in points.
    fn page_dimensions_pt(&self) -> (f32, f32) {
        (Mm(PAGE_WIDTH_MM).into_pt().0, Mm(PAGE_HEIGHT_MM).into_pt().0)
    }

    /// How many lines fit between the top and bottom margins.
    pub fn lines_per_page(&self) -> usize {
        let (_, page_h_pt) = self.page_dimensions_pt();
        let usable_height = page_h_pt - 2.0 * self.layout.margin_pt;
        let line_height = self.layout.font_size * self.layout.line_height_factor;
        ((usable_height / line_height) as usize).max(1)
    }

    /// Wrap `text` to the usable width and place every line, one `Vec` per
    /// page. Blank lines take up a slot but produce no entry. Right-to-left
    /// lines end at the right margin; others start at the left margin.
    pub fn place_lines(&self, text: &str, right_to_left: bool, measurer: &Measurer) -> Vec<Vec<PdfLine>> {
        let (page_w_pt, page_h_pt) = self.page_dimensions_pt();
        let margin = self.layout.margin_pt;
        let font_size = self.layout.font_size;
        let line_height = font_size * self.layout.line_height_factor;
        let usable_width = page_w_pt - 2.0 * margin;

        let lines = wrap_paragraphs(text, |line| measurer.width(line), usable_width);

        let mut pages: Vec<Vec<PdfLine>> = lines
            .chunks(self.lines_per_page())
            .map(|chunk| {
                chunk
                    .iter()
                    .enumerate()
                    .filter(|(_, line)| !line.is_empty())
                    .map(|(line_idx, line)| {
                        let visual = visual_order(line, right_to_left);
                        let width = measurer.width(&visual);
                        let x = if right_to_left {
                            page_w_pt - margin - width
                        } else {
                            margin
                        };
                        PdfLine {
                            text: visual,
                            x,
                            // Baseline of the first line sits one font size below the top margin.
                            y: page_h_pt - margin - font_size - line_idx as f32 * line_height,
                            width,
                        }
                    })
                    .collect()
            })
            .collect();

        // `wrap_paragraphs` always yields a line, but guard the page list anyway.
        if pages.is_empty() {
            pages.push(Vec::new());
        }
        pages
    }

    /// Create a PDF from plain text.
    ///
    /// Paragraphs are wrapped to the usable page width and pages break
    /// automatically. Right-to-left text is right-aligned. When `font` has no
    /// usable bytes the built-in Helvetica is used with estimated metrics.
    #[instrument(skip(self, text, font), fields(text_len = text.len(), family = %font.family))]
    pub fn create_from_text(&self, text: &str, right_to_left: bool, font: &ResolvedFont) -> Result<Vec<u8>> {
        let title = self.title.as_deref().unwrap_or("Scriptpress Document");
        let mut doc = PdfDocument::new(title);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let embedded = FontFace::from_resolved(font, self.layout.font_size).and_then(|face| {
            let parsed = ParsedFont::from_bytes(font.bytes()?, font.index as usize, &mut warnings)?;
            Some((doc.add_font(&parsed), face))
        });

        let (page_font, measurer) = match embedded {
            Some((font_id, face)) => (PageFont::Embedded(font_id), Measurer::Face(face)),
            None => {
                warn!(family = %font.family, "embedding not possible, using built-in Helvetica");
                (
                    PageFont::Helvetica,
                    Measurer::approximate(self.layout.font_size),
                )
            }
        };

        info!(title, rtl = right_to_left, "Creating text PDF");

        let font_size = self.layout.font_size;
        let layout = self.place_lines(text, right_to_left, &measurer);
        let total_lines: usize = layout.iter().map(Vec::len).sum();

        let pages: Vec<PdfPage> = layout
            .into_iter()
            .map(|lines| {
                let mut ops: Vec<Op> = Vec::new();
                for line in lines {
                    push_text(&mut ops, &page_font, font_size, line.x, line.y, line.text);
                }
                PdfPage::new(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), ops)
            })
            .collect();

        doc.with_pages(pages);

        debug!(
            total_lines,
            pages = doc.pages.len(),
            "Text layout complete"
        );

        let output = doc.save(&PdfSaveOptions::default(), &mut warnings);
        if !warnings.is_empty() {
            debug!(count = warnings.len(), "printpdf reported warnings");
        }

        Ok(output)
    }

    /// Create a text PDF and write it directly to a file.
    pub fn write_text_to_file(
        &self,
        text: &str,
        right_to_left: bool,
        font: &ResolvedFont,
        path: impl AsRef<Path>,
    ) -> Result<()> {
        let bytes = self.create_from_text(text, right_to_left, font)?;
        std::fs::write(path.as_ref(), &bytes)?;
        info!("Wrote text PDF to {}", path.as_ref().display());
        Ok(())
    }
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new(PdfConfig::default())
    }
}

fn push_text(ops: &mut Vec<Op>, font: &PageFont, size: f32, x: f32, y: f32, text: String) {
    ops.push(Op::StartTextSection);
    ops.push(Op::SetTextCursor {
        pos: Point { x: Pt(x), y: Pt(y) },
    });
    match font {
        PageFont::Embedded(id) => {
            ops.push(Op::SetFontSize {
                size: Pt(size),
                font: id.clone(),
            });
            ops.push(Op::WriteText {
                items: vec![TextItem::Text(text)],
                font: id.clone(),
            });
        }
        PageFont::Helvetica => {
            ops.push(Op::SetFontSizeBuiltinFont {
                size: Pt(size),
                font: BuiltinFont::Helvetica,
            });
            ops.push(Op::WriteTextBuiltinFont {
                items: vec![TextItem::Text(text)],
                font: BuiltinFont::Helvetica,
            });
        }
    }
    ops.push(Op::EndTextSection);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn missing_font() -> ResolvedFont {
        ResolvedFont::missing("Noto Sans")
    }

    #[test]
    fn output_is_a_pdf() {
        let bytes = PdfWriter::default()
            .create_from_text("Hello world, this is a test.", false, &missing_font())
            .unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
    }

    #[test]
    fn empty_text_still_produces_one_page() {
        let bytes = PdfWriter::default()
            .create_from_text("", false, &missing_font())
            .unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
    }

    #[test]
    fn a4_fits_fifty_one_lines() {
        // (841.89 - 2 * 50) / (12 * 1.2)
        assert_eq!(PdfWriter::default().lines_per_page(), 51);
    }

    #[test]
    fn long_text_breaks_across_pages() {
        let text = "paragraph\n".repeat(200);
        let single = PdfWriter::default()
            .create_from_text("paragraph", false, &missing_font())
            .unwrap();
        let many = PdfWriter::default()
            .create_from_text(&text, false, &missing_font())
            .unwrap();
        assert!(many.starts_with(b"%PDF-"));
        assert!(many.len() > single.len());
    }

    fn approximate() -> Measurer {
        Measurer::approximate(PdfConfig::default().font_size)
    }

    #[test]
    fn ltr_lines_start_at_the_left_margin() {
        let pages = PdfWriter::default().place_lines(&"word ".repeat(300), false, &approximate());
        let lines = &pages[0];
        assert!(lines.len() > 1);
        for line in lines {
            assert_eq!(line.x, 50.0);
            assert!(line.width < 595.28 - 100.0);
        }
    }

    #[test]
    fn rtl_lines_end_at_the_right_margin() {
        let writer = PdfWriter::default();
        let (page_w, _) = writer.page_dimensions_pt();
        let pages = writer.place_lines(&"שלום עולם ".repeat(40), true, &approximate());

        let lines = &pages[0];
        assert!(lines.len() > 1);
        for line in lines {
            assert!((line.x + line.width - (page_w - 50.0)).abs() < 1e-3);
        }
        // Visual order: the first logical word is drawn rightmost.
        assert!(lines[0].text.ends_with("שלום".chars().rev().collect::<String>().as_str()));
    }

    #[test]
    fn lines_break_onto_a_new_page_after_lines_per_page() {
        let writer = PdfWriter::default();
        let (_, page_h) = writer.page_dimensions_pt();
        // 200 paragraphs plus the empty one after the final newline.
        let pages = writer.place_lines(&"paragraph\n".repeat(200), false, &approximate());

        assert_eq!(pages.len(), 4);
        assert_eq!(pages[0].len(), writer.lines_per_page());
        assert_eq!(pages[3].len(), 200 - 3 * 51);

        let top = page_h - 50.0 - 12.0;
        assert!((pages[0][0].y - top).abs() < 1e-3);
        assert!((pages[1][0].y - top).abs() < 1e-3);
        assert!((pages[0][50].y - (top - 50.0 * 14.4)).abs() < 1e-3);
    }

    #[test]
    fn rtl_text_is_accepted_with_builtin_fallback() {
        let bytes = PdfWriter::default()
            .create_from_text("שלום עולם", true, &missing_font())
            .unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
    }

    #[test]
    fn writes_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.pdf");
        let mut writer = PdfWriter::default();
        writer.set_title("output");
        writer
            .write_text_to_file("hi", false, &missing_font(), &path)
            .unwrap();
        assert!(std::fs::read(&path).unwrap().starts_with(b"%PDF-"));
    }
}
