// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Greedy line wrapping against an injected width measure.
//
// The wrapper knows nothing about fonts or canvases: callers pass a closure
// that measures a candidate line in whatever unit their renderer uses.

/// Greedily pack the words of `text` into lines narrower than `max_width`.
///
/// Words are separated by runs of whitespace. Each word after the first is
/// tentatively appended with a single space; the append is kept only if the
/// measured candidate is strictly below `max_width`, otherwise the current
/// line is closed and the word starts a new one. Words are never split, so a
/// word wider than `max_width` sits alone on its own line.
///
/// Text without words yields a single empty line.
pub fn wrap<M>(text: &str, measure: M, max_width: f32) -> Vec<String>
where
    M: Fn(&str) -> f32,
{
    let mut words = text.split_whitespace();
    let Some(first) = words.next() else {
        return vec![String::new()];
    };

    let mut lines = Vec::new();
    let mut current = first.to_string();

    for word in words {
        let candidate = format!("{current} {word}");
        if measure(&candidate) < max_width {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }

    lines.push(current);
    lines
}

/// Wrap each `\n`-separated paragraph independently.
///
/// Hard line breaks in the input survive; a blank paragraph becomes one empty
/// line.
pub fn wrap_paragraphs<M>(text: &str, measure: M, max_width: f32) -> Vec<String>
where
    M: Fn(&str) -> f32,
{
    text.split('\n')
        .flat_map(|paragraph| wrap(paragraph.trim_end_matches('\r'), &measure, max_width))
        .collect()
}
