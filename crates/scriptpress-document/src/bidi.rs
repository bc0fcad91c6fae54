// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Visual reordering of wrapped lines.
//
// Neither `printpdf` nor `imageproc` reorders bidirectional text, so lines are
// converted from logical to visual order before drawing.

use unicode_bidi::{BidiInfo, Level};

/// Reorder one line for left-to-right glyph placement.
///
/// `right_to_left` sets the paragraph base direction. Only call this on a
/// single line: reordering a multi-line string would move text across lines.
pub fn visual_order(line: &str, right_to_left: bool) -> String {
    if line.is_empty() {
        return String::new();
    }

    let base = if right_to_left { Level::rtl() } else { Level::ltr() };
    let info = BidiInfo::new(line, Some(base));

    let mut visual = String::with_capacity(line.len());
    for paragraph in &info.paragraphs {
        visual.push_str(&info.reorder_line(paragraph, paragraph.range.clone()));
    }
    visual
}
