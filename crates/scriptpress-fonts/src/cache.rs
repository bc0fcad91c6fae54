// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Process-wide font cache with single-flight downloads.
//
// Lookup order for a profile:
//   1. in-memory entry for the font family name (no I/O)
//   2. a non-empty `<font_dir>/<FamilyName>.ttf` already on disk (no network)
//   3. download to `<FamilyName>.ttf.part`, then rename into place
//
// Every family name owns one `OnceCell`. Concurrent first requests for the
// same family await the same initialisation, so at most one download is in
// flight per family. A failed attempt leaves the cell empty and the next
// caller retries.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use scriptpress_core::error::{Result, ScriptpressError};
use scriptpress_core::script::ScriptProfile;
use tokio::sync::OnceCell;
use tracing::{debug, info, instrument, warn};

use crate::fetch::{FontFetcher, HttpFontFetcher};

type Slot = Arc<OnceCell<PathBuf>>;

/// Maps font family names to local font files.
///
/// Entries are inserted once and never evicted. Share the cache between
/// tasks with an `Arc`.
pub struct FontCache<F = HttpFontFetcher> {
    font_dir: PathBuf,
    fetcher: F,
    timeout: Duration,
    slots: Mutex<HashMap<&'static str, Slot>>,
}

impl FontCache<HttpFontFetcher> {
    /// Cache backed by the HTTPS fetcher.
    pub fn http(font_dir: impl Into<PathBuf>, timeout: Duration) -> Result<Self> {
        Ok(Self::new(font_dir, HttpFontFetcher::new()?, timeout))
    }
}

impl<F: FontFetcher> FontCache<F> {
    pub fn new(font_dir: impl Into<PathBuf>, fetcher: F, timeout: Duration) -> Self {
        Self {
            font_dir: font_dir.into(),
            fetcher,
            timeout,
            slots: Mutex::new(HashMap::new()),
        }
    }

    pub fn font_dir(&self) -> &Path {
        &self.font_dir
    }

    /// Path of the font for `name`, if it has already been materialised in
    /// this process.
    pub fn cached(&self, name: &str) -> Option<PathBuf> {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.get(name).and_then(|slot| slot.get().cloned())
    }

    /// Number of font families materialised so far.
    pub fn len(&self) -> usize {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.values().filter(|slot| slot.initialized()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot(&self, name: &'static str) -> Slot {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(slots.entry(name).or_default())
    }

    /// Make sure the font for `profile` exists locally and return its path.
    #[instrument(skip(self, profile), fields(font = profile.name))]
    pub async fn ensure_font(&self, profile: &ScriptProfile) -> Result<PathBuf> {
        let slot = self.slot(profile.name);
        if let Some(path) = slot.get() {
            debug!("font cache hit");
            return Ok(path.clone());
        }

        let path = slot.get_or_try_init(|| self.materialise(profile)).await?;
        Ok(path.clone())
    }

    async fn materialise(&self, profile: &ScriptProfile) -> Result<PathBuf> {
        let dest = self.font_dir.join(profile.font_file_name());

        match tokio::fs::metadata(&dest).await {
            Ok(meta) if meta.len() > 0 => {
                info!(path = %dest.display(), "using font already on disk");
                return Ok(dest);
            }
            Ok(_) => warn!(path = %dest.display(), "font file on disk is empty, downloading again"),
            Err(_) => {}
        }

        tokio::fs::create_dir_all(&self.font_dir)
            .await
            .map_err(|e| acquisition(profile, format!("cannot create font directory: {e}")))?;

        let partial = dest.with_extension("ttf.part");
        info!(url = profile.source_uri, "downloading font");

        let result = self.download(profile, &partial, &dest).await;
        if result.is_err() {
            // Never leave a truncated file where the next run would trust it.
            if let Err(e) = tokio::fs::remove_file(&partial).await {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!(path = %partial.display(), error = %e, "could not remove partial font file");
                }
            }
        }
        result
    }

    async fn download(&self, profile: &ScriptProfile, partial: &Path, dest: &Path) -> Result<PathBuf> {
        let fetched = tokio::time::timeout(
            self.timeout,
            self.fetcher.fetch(profile.source_uri, partial),
        )
        .await;

        let bytes = match fetched {
            Err(_elapsed) => {
                return Err(ScriptpressError::FontTimeout {
                    profile: profile.name.to_string(),
                    seconds: self.timeout.as_secs(),
                });
            }
            Ok(Err(e)) => return Err(acquisition(profile, e.to_string())),
            Ok(Ok(0)) => return Err(acquisition(profile, "empty response body".into())),
            Ok(Ok(bytes)) => bytes,
        };

        tokio::fs::rename(partial, dest)
            .await
            .map_err(|e| acquisition(profile, format!("cannot move font into place: {e}")))?;

        info!(bytes, path = %dest.display(), "font downloaded");
        Ok(dest.to_path_buf())
    }
}

fn acquisition(profile: &ScriptProfile, reason: String) -> ScriptpressError {
    ScriptpressError::FontAcquisition {
        profile: profile.name.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scriptpress_core::script::{ARABIC, CYRILLIC, DEFAULT, HEBREW};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Writes a fake font after a short delay and counts calls.
    #[derive(Default)]
    struct CountingFetcher {
        calls: AtomicUsize,
        delay: Duration,
    }

    impl FontFetcher for CountingFetcher {
        async fn fetch(&self, _url: &str, dest: &Path) -> Result<u64> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            tokio::fs::write(dest, b"fake-ttf").await?;
            Ok(8)
        }
    }

    /// Writes half a file, then fails.
    struct BrokenFetcher;

    impl FontFetcher for BrokenFetcher {
        async fn fetch(&self, _url: &str, dest: &Path) -> Result<u64> {
            tokio::fs::write(dest, b"half").await?;
            Err(ScriptpressError::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "connection reset by peer",
            )))
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_requests_share_one_download() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = CountingFetcher {
            delay: Duration::from_millis(50),
            ..Default::default()
        };
        let cache = Arc::new(FontCache::new(dir.path(), fetcher, Duration::from_secs(5)));

        let mut handles = Vec::new();
        for _ in 0..16 {
            let cache = Arc::clone(&cache);
            handles.push(tokio::spawn(async move { cache.ensure_font(&ARABIC).await }));
        }
        for handle in handles {
            let path = handle.await.unwrap().unwrap();
            assert_eq!(path, dir.path().join("NotoSansArabic.ttf"));
        }

        assert_eq!(cache.fetcher.calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn second_request_is_served_from_memory() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FontCache::new(dir.path(), CountingFetcher::default(), Duration::from_secs(5));

        cache.ensure_font(&HEBREW).await.unwrap();
        std::fs::remove_file(dir.path().join("NotoSansHebrew.ttf")).unwrap();
        let path = cache.ensure_font(&HEBREW).await.unwrap();

        // The entry is trusted for the life of the process.
        assert_eq!(path, dir.path().join("NotoSansHebrew.ttf"));
        assert_eq!(cache.fetcher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn font_on_disk_skips_the_network() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("NotoSans.ttf"), b"already here").unwrap();
        let cache = FontCache::new(dir.path(), CountingFetcher::default(), Duration::from_secs(5));

        let path = cache.ensure_font(&CYRILLIC).await.unwrap();
        assert_eq!(path, dir.path().join("NotoSans.ttf"));
        assert_eq!(cache.fetcher.calls.load(Ordering::SeqCst), 0);
        assert_eq!(cache.cached("Noto Sans"), Some(path));
    }

    #[tokio::test]
    async fn empty_file_on_disk_is_downloaded_again() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("NotoSansArabic.ttf"), b"").unwrap();
        let cache = FontCache::new(dir.path(), CountingFetcher::default(), Duration::from_secs(5));

        let path = cache.ensure_font(&ARABIC).await.unwrap();
        assert_eq!(cache.fetcher.calls.load(Ordering::SeqCst), 1);
        assert_eq!(std::fs::read(&path).unwrap(), b"fake-ttf");
    }

    #[tokio::test]
    async fn profiles_sharing_a_family_share_an_entry() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FontCache::new(dir.path(), CountingFetcher::default(), Duration::from_secs(5));

        cache.ensure_font(&CYRILLIC).await.unwrap();
        cache.ensure_font(&DEFAULT).await.unwrap();
        assert_eq!(cache.fetcher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_download_leaves_no_partial_file_and_can_retry() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FontCache::new(dir.path(), BrokenFetcher, Duration::from_secs(5));

        let err = cache.ensure_font(&ARABIC).await.unwrap_err();
        assert!(matches!(err, ScriptpressError::FontAcquisition { .. }));
        assert!(err.is_recoverable());
        assert!(!dir.path().join("NotoSansArabic.ttf").exists());
        assert!(!dir.path().join("NotoSansArabic.ttf.part").exists());
        assert!(cache.cached("Noto Sans Arabic").is_none());

        // Not poisoned: a later call tries again.
        assert!(cache.ensure_font(&ARABIC).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn slow_download_times_out() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = CountingFetcher {
            delay: Duration::from_secs(120),
            ..Default::default()
        };
        let cache = FontCache::new(dir.path(), fetcher, Duration::from_secs(2));

        let err = cache.ensure_font(&ARABIC).await.unwrap_err();
        assert!(matches!(err, ScriptpressError::FontTimeout { seconds: 2, .. }));
        assert!(cache.is_empty());
    }
}
