// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// scriptpress-document — Format emitters for the Scriptpress converter.
//
// Provides minimal OOXML writers (DOCX, XLSX), a PDF writer with
// direction-aware alignment, and a text rasterizer for PNG/JPEG output. Text
// is measured with the resolved font so wrapping matches what is drawn.

pub mod bidi;
pub mod face;
pub mod image;
pub mod office;
pub mod pdf;

// Re-export the primary structs so callers can use `scriptpress_document::PdfWriter` etc.
pub use face::FontFace;
pub use self::image::raster::TextRasterizer;
pub use office::docx::DocxWriter;
pub use office::xlsx::XlsxWriter;
pub use pdf::writer::PdfWriter;
