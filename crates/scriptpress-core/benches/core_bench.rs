// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for script detection and greedy wrapping.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use scriptpress_core::{classify, wrap};

const RUSSIAN: &str = "В начале было Слово, и Слово было у Бога, и Слово было Бог. \
Оно было в начале у Бога. Всё через Него начало быть, и без Него ничто не начало быть, что начало быть.";

const ARABIC: &str = "فِي الْبَدْءِ كَانَ الْكَلِمَةُ، وَالْكَلِمَةُ كَانَ عِنْدَ اللهِ، وَكَانَ الْكَلِمَةُ اللهَ. \
هَذَا كَانَ فِي الْبَدْءِ عِنْدَ اللهِ.";

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_classify(c: &mut Criterion) {
    let long_text = RUSSIAN.repeat(50);
    c.bench_function("classify (cyrillic, ~6k chars)", |b| {
        b.iter(|| classify(black_box(&long_text)));
    });
    c.bench_function("classify (arabic sample)", |b| {
        b.iter(|| classify(black_box(ARABIC)));
    });
}

/// Wrap against a fixed-advance measurer, roughly a 32px face on a 1080px
/// line.
fn bench_wrap(c: &mut Criterion) {
    let long_text = RUSSIAN.repeat(50);
    let measure = |s: &str| s.chars().count() as f32 * 16.0;
    c.bench_function("wrap (~6k chars, 1080 wide)", |b| {
        b.iter(|| wrap(black_box(&long_text), measure, 1080.0));
    });
}

criterion_group!(benches, bench_classify, bench_wrap);
criterion_main!(benches);
