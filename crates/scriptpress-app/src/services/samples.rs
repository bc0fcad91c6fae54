// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Built-in sample corpus (John 1:1-3 in three scripts) for smoke-testing a
// machine's fonts and emitters end to end.

use std::path::Path;

use scriptpress_core::error::Result;
use scriptpress_core::types::{ConversionReport, ConversionRequest};
use scriptpress_fonts::FontResolver;
use tracing::{error, info};

use super::converter::Converter;

/// `(name, text)` pairs; each sample is converted into `<root>/<name>/`.
pub const SAMPLES: [(&str, &str); 3] = [
    (
        "russian",
        "В начале было Слово, и Слово было у Бога, и Слово было Бог.\n\
         Оно было в начале у Бога. Всё через Него начало быть, и без Него ничто не начало быть, что начало быть.",
    ),
    (
        "amharic",
        "ቃል ሥጋ ሆነ\n\
         በመጀመሪያ ቃል ነበረ፤ ቃልም ከእግዚአብሔር ጋራ ነበረ፤ ቃልም እግዚአብሔር ነበረ። እርሱም በመጀመሪያ ከእግዚአብሔር ጋራ ነበረ።",
    ),
    (
        "arabic",
        "فِي الْبَدْءِ كَانَ الْكَلِمَةُ، وَالْكَلِمَةُ كَانَ عِنْدَ اللهِ، وَكَانَ الْكَلِمَةُ اللهَ.\n\
         هَذَا كَانَ فِي الْبَدْءِ عِنْدَ اللهِ.",
    ),
];

/// Convert every sample, one after another. A failed sample is logged and
/// the rest still run.
pub async fn convert_samples<R: FontResolver>(
    converter: &Converter<R>,
    root: &Path,
) -> Vec<(&'static str, Result<ConversionReport>)> {
    let mut outcomes = Vec::with_capacity(SAMPLES.len());
    for (name, text) in SAMPLES {
        let request = ConversionRequest::new(text, root.join(name))
            .with_stem(converter.config().file_stem.clone());
        let outcome = converter.convert_all(&request).await;
        match &outcome {
            Ok(report) => info!(sample = name, script = report.script, "sample converted"),
            Err(e) => error!(sample = name, error = %e, "sample conversion failed"),
        }
        outcomes.push((name, outcome));
    }
    outcomes
}
