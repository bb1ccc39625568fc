//! Download orchestrator: classification, fallback chaining and cleanup.
//!
//! Dispatch is a strict two-level chain:
//! - `Manifest` URLs go to ffmpeg, then yt-dlp on any failure
//! - `Generic` URLs go to direct HTTP, then yt-dlp on any failure
//!
//! Each source runs at most once per request. yt-dlp's outcome is final.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::core::config::RelaySettings;
use crate::download::classify::{classify, StrategyKind};
use crate::download::error::DownloadError;
use crate::download::progress::ProgressSender;
use crate::download::source::{DownloadResult, DownloadSource, HlsSource, HttpSource, YtDlpSource};

pub struct DownloadOrchestrator {
    storage_dir: PathBuf,
    direct: Arc<dyn DownloadSource>,
    manifest: Arc<dyn DownloadSource>,
    extractor: Arc<dyn DownloadSource>,
}

impl DownloadOrchestrator {
    /// Builds the default source chain and creates the storage directory.
    pub fn new(settings: &RelaySettings) -> Result<Self, DownloadError> {
        fs_err::create_dir_all(&settings.storage_dir)?;

        Ok(Self::with_sources(
            settings.storage_dir.clone(),
            Arc::new(HttpSource::new()?),
            Arc::new(HlsSource::from_settings(settings)),
            Arc::new(YtDlpSource::from_settings(settings)),
        ))
    }

    /// Orchestrator over caller-provided sources. The directory must already exist.
    pub fn with_sources(
        storage_dir: PathBuf,
        direct: Arc<dyn DownloadSource>,
        manifest: Arc<dyn DownloadSource>,
        extractor: Arc<dyn DownloadSource>,
    ) -> Self {
        Self {
            storage_dir,
            direct,
            manifest,
            extractor,
        }
    }

    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }

    /// Acquire `url` into the storage directory.
    ///
    /// The returned file belongs to the caller, who must hand it to
    /// [`cleanup`](Self::cleanup) (or a [`CleanupGuard`]) once done.
    pub async fn download(&self, url: &str, progress_tx: ProgressSender) -> Result<DownloadResult, DownloadError> {
        let kind = classify(url);
        let entry = match kind {
            StrategyKind::Manifest => &self.manifest,
            StrategyKind::Generic => &self.direct,
        };
        log::info!("🚀 {:?} URL, starting with {}: {}", kind, entry.name(), url);

        match entry.download(url, &self.storage_dir, &progress_tx).await {
            Ok(result) => Ok(result),
            Err(e) => {
                log::warn!(
                    "⚠️ {} failed ({}): {}. Falling back to {}",
                    entry.name(),
                    e.subcategory(),
                    e,
                    self.extractor.name()
                );
                self.extractor.download(url, &self.storage_dir, &progress_tx).await
            }
        }
    }

    /// Best-effort removal of a downloaded file. Never fails, safe to repeat.
    pub fn cleanup(&self, path: &Path) {
        match fs_err::remove_file(path) {
            Ok(()) => log::debug!("🗑️ Removed {}", path.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => log::debug!("Cleanup failed: {}", e),
        }
    }
}

/// Hands the wrapped file to [`DownloadOrchestrator::cleanup`] when dropped,
/// on every exit path of the caller.
pub struct CleanupGuard {
    orchestrator: Arc<DownloadOrchestrator>,
    path: PathBuf,
}

impl CleanupGuard {
    pub fn new(orchestrator: Arc<DownloadOrchestrator>, path: impl Into<PathBuf>) -> Self {
        Self {
            orchestrator,
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for CleanupGuard {
    fn drop(&mut self) {
        self.orchestrator.cleanup(&self.path);
    }
}
