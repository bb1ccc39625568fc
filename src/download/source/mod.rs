//! Acquisition strategies behind one trait.
//!
//! The orchestrator holds one source per role and chains them; each source
//! writes into the storage directory it is given and reports its result path.
//!
//! Built-in sources:
//! - `HttpSource` — direct file URLs, streamed to disk in 1 MiB chunks
//! - `HlsSource` — m3u8 manifests remuxed into mp4 by ffmpeg
//! - `YtDlpSource` — anything yt-dlp can resolve, the terminal fallback

pub mod hls;
pub mod http;
pub mod ytdlp;

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::download::error::DownloadError;
use crate::download::progress::ProgressSender;

pub use hls::HlsSource;
pub use http::HttpSource;
pub use ytdlp::YtDlpSource;

/// A URL someone asked the bot to relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub url: String,
    pub user_id: i64,
}

impl DownloadRequest {
    pub fn new(url: impl Into<String>, user_id: i64) -> Self {
        Self {
            url: url.into(),
            user_id,
        }
    }
}

/// A file produced by exactly one source.
///
/// `file_name` is what the user sees; the on-disk name may carry a
/// disambiguating prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadResult {
    pub file_path: PathBuf,
    pub file_name: String,
}

/// Trait for acquisition strategies.
#[async_trait]
pub trait DownloadSource: Send + Sync {
    /// Short label used in logs (e.g. "http", "ffmpeg", "yt-dlp")
    fn name(&self) -> &str;

    /// Fetch `url` into `storage_dir`.
    ///
    /// Sources that can measure progress push samples into `progress_tx`;
    /// the others never send. A failed source leaves no partial file behind.
    async fn download(
        &self,
        url: &str,
        storage_dir: &Path,
        progress_tx: &ProgressSender,
    ) -> Result<DownloadResult, DownloadError>;
}

/// Removes a partially written output; a file that was never created is fine.
pub(crate) async fn remove_partial(path: &Path) {
    if let Err(e) = fs_err::tokio::remove_file(path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            log::debug!("Failed to remove partial output: {}", e);
        }
    }
}

/// Removes every entry of `storage_dir` whose name contains `tag`.
pub(crate) async fn remove_tagged(storage_dir: &Path, tag: &str) {
    let mut entries = match tokio::fs::read_dir(storage_dir).await {
        Ok(entries) => entries,
        Err(e) => {
            log::debug!("Failed to scan {} for partial outputs: {}", storage_dir.display(), e);
            return;
        }
    };
    loop {
        match entries.next_entry().await {
            Ok(Some(entry)) => {
                if entry.file_name().to_string_lossy().contains(tag) {
                    remove_partial(&entry.path()).await;
                }
            }
            Ok(None) => break,
            Err(e) => {
                log::debug!("Failed to scan {} for partial outputs: {}", storage_dir.display(), e);
                break;
            }
        }
    }
}
