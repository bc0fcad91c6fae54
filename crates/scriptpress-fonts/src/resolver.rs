// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Font resolution — turns a script profile into font bytes the renderers can
// use, without the renderers ever touching the network.
//
// Resolution order: the profile's downloaded Noto font, then any system
// sans-serif face found by `fontdb`, then nothing (renderers fall back to
// built-in PDF fonts and approximate metrics).

use std::future::Future;
use std::sync::Arc;

use scriptpress_core::script::ScriptProfile;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::cache::FontCache;
use crate::fetch::{FontFetcher, HttpFontFetcher};

/// Where a resolved font came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontSource {
    /// The profile's own font, from the cache.
    Profile,
    /// A system face used because the profile's font was unavailable.
    System,
    /// No font at all.
    Missing,
}

/// Font bytes ready for parsing by a renderer.
#[derive(Debug, Clone)]
pub struct ResolvedFont {
    /// Family name for logs and document metadata.
    pub family: String,
    data: Option<Arc<Vec<u8>>>,
    /// Face index inside a font collection.
    pub index: u32,
    pub source: FontSource,
}

impl ResolvedFont {
    pub fn new(family: impl Into<String>, data: Vec<u8>, index: u32, source: FontSource) -> Self {
        Self {
            family: family.into(),
            data: Some(Arc::new(data)),
            index,
            source,
        }
    }

    /// No usable font.
    pub fn missing(family: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            data: None,
            index: 0,
            source: FontSource::Missing,
        }
    }

    pub fn bytes(&self) -> Option<&[u8]> {
        self.data.as_deref().map(Vec::as_slice)
    }

    pub fn shared_bytes(&self) -> Option<Arc<Vec<u8>>> {
        self.data.clone()
    }

    /// True unless the profile's own font is in use.
    pub fn is_degraded(&self) -> bool {
        self.source != FontSource::Profile
    }
}

/// Produces a readable font for a script profile.
pub trait FontResolver: Send + Sync {
    fn resolve(&self, profile: &'static ScriptProfile) -> impl Future<Output = ResolvedFont> + Send;
}

/// Resolves through a [`FontCache`], falling back to a system face.
pub struct CachedFontResolver<F = HttpFontFetcher> {
    cache: Arc<FontCache<F>>,
    use_system_fallback: bool,
    system_font: OnceCell<Option<ResolvedFont>>,
}

impl<F: FontFetcher> CachedFontResolver<F> {
    pub fn new(cache: Arc<FontCache<F>>) -> Self {
        Self {
            cache,
            use_system_fallback: true,
            system_font: OnceCell::new(),
        }
    }

    /// Disable the `fontdb` system scan (useful on headless builders).
    pub fn without_system_fallback(mut self) -> Self {
        self.use_system_fallback = false;
        self
    }

    pub fn cache(&self) -> &Arc<FontCache<F>> {
        &self.cache
    }

    async fn fallback(&self, profile: &ScriptProfile) -> ResolvedFont {
        if self.use_system_fallback {
            let system = self
                .system_font
                .get_or_init(|| async {
                    tokio::task::spawn_blocking(system_sans_serif)
                        .await
                        .unwrap_or_else(|e| {
                            warn!(error = %e, "system font scan panicked");
                            None
                        })
                })
                .await;
            if let Some(font) = system {
                info!(family = %font.family, "using system font fallback");
                return font.clone();
            }
        }
        warn!(font = profile.name, "no font available, renderers will use built-in fallbacks");
        ResolvedFont::missing(profile.name)
    }
}

impl<F: FontFetcher> FontResolver for CachedFontResolver<F> {
    async fn resolve(&self, profile: &'static ScriptProfile) -> ResolvedFont {
        match self.cache.ensure_font(profile).await {
            Ok(path) => match tokio::fs::read(&path).await {
                Ok(bytes) => match first_face_index(&bytes) {
                    Some(index) => {
                        debug!(path = %path.display(), bytes = bytes.len(), "font resolved");
                        return ResolvedFont::new(profile.name, bytes, index, FontSource::Profile);
                    }
                    None => warn!(
                        stage = "font",
                        path = %path.display(),
                        bytes = bytes.len(),
                        "cached font has no parseable face, degrading"
                    ),
                },
                Err(e) => {
                    warn!(stage = "font", path = %path.display(), error = %e, "cached font unreadable")
                }
            },
            Err(e) => warn!(
                stage = "font",
                error = %e,
                recoverable = e.is_recoverable(),
                "font acquisition failed, degrading"
            ),
        }
        self.fallback(profile).await
    }
}

/// Index of the first face `fontdb` can parse in `data`.
fn first_face_index(data: &[u8]) -> Option<u32> {
    let mut db = fontdb::Database::new();
    db.load_font_data(data.to_vec());
    db.faces().next().map(|face| face.index)
}

/// A sans-serif face from the system font database.
///
/// Tries common Linux families first because `fontdb` maps the generic
/// sans-serif family to Arial, then any face whose family name contains
/// "Sans".
pub fn system_sans_serif() -> Option<ResolvedFont> {
    let mut db = fontdb::Database::new();
    db.load_system_fonts();

    let query = fontdb::Query {
        families: &[
            fontdb::Family::Name("Noto Sans"),
            fontdb::Family::Name("DejaVu Sans"),
            fontdb::Family::Name("Liberation Sans"),
            fontdb::Family::SansSerif,
        ],
        ..fontdb::Query::default()
    };
    let id = db.query(&query).or_else(|| {
        db.faces()
            .find(|face| face.families.iter().any(|(name, _)| name.contains("Sans")))
            .map(|face| face.id)
    })?;

    let family = db
        .face(id)
        .and_then(|face| face.families.first().map(|(name, _)| name.clone()))
        .unwrap_or_else(|| "sans-serif".to_string());

    let (data, index) = db.with_face_data(id, |data, index| (data.to_vec(), index))?;
    debug!(%family, faces = db.len(), "system sans-serif face selected");
    Some(ResolvedFont::new(family, data, index, FontSource::System))
}
