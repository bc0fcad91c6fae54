// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// scriptpress-fonts — Font acquisition for the Scriptpress converter.
//
// Downloads each profile's Noto font at most once per machine, coalesces
// concurrent first requests per font family, and resolves a usable font for
// the renderers (downloaded, system sans-serif, or none).

pub mod cache;
pub mod fetch;
pub mod resolver;

pub use cache::FontCache;
pub use fetch::{FontFetcher, HttpFontFetcher};
pub use resolver::{CachedFontResolver, FontResolver, FontSource, ResolvedFont};
