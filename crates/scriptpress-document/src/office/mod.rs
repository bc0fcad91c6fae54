// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Office module — minimal OOXML packages (DOCX and XLSX) holding the input
// text.

pub mod docx;
mod package;
pub mod xlsx;

pub use docx::DocxWriter;
pub use xlsx::XlsxWriter;
