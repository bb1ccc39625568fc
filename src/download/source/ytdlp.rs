//! YtDlpSource — generic site extraction via yt-dlp.
//!
//! Terminal fallback of the chain: a failure here is reported to the user.
//! yt-dlp prints the final file path after post-processing, which is the
//! only reliable way to learn the extension it picked.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use crate::core::config::RelaySettings;
use crate::core::process::{describe_exit, output_tail, run_with_timeout};
use crate::download::error::DownloadError;
use crate::download::naming::{extractor_output_template, request_tag};
use crate::download::progress::ProgressSender;
use crate::download::source::{remove_tagged, DownloadResult, DownloadSource};

/// Lines of yt-dlp stderr kept in the error
const STDERR_TAIL_LINES: usize = 5;

pub struct YtDlpSource {
    ytdlp_bin: String,
    timeout: Duration,
}

impl YtDlpSource {
    pub fn new(ytdlp_bin: impl Into<String>, timeout: Duration) -> Self {
        Self {
            ytdlp_bin: ytdlp_bin.into(),
            timeout,
        }
    }

    pub fn from_settings(settings: &RelaySettings) -> Self {
        Self::new(settings.ytdlp_bin.clone(), settings.extract_timeout)
    }

    fn build_args(url: &str, template: &str) -> Vec<String> {
        [
            "--no-warnings",
            "--no-playlist",
            "-f",
            "best",
            "-o",
            template,
            "--print",
            "after_move:filepath",
            url,
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    async fn extract(&self, url: &str, template: &str) -> Result<DownloadResult, DownloadError> {
        let mut cmd = Command::new(&self.ytdlp_bin);
        cmd.args(Self::build_args(url, template));
        let output = run_with_timeout(&mut cmd, self.timeout).await?;

        if !output.status.success() {
            let tail = output_tail(&output.stderr, STDERR_TAIL_LINES);
            log::error!("yt-dlp failed with {}: {}", describe_exit(&output), tail);
            let cause = if tail.is_empty() {
                format!("yt-dlp failed with {}", describe_exit(&output))
            } else {
                tail
            };
            return Err(DownloadError::Extractor(cause));
        }

        let file_path = parse_printed_path(&output.stdout)
            .ok_or_else(|| DownloadError::Extractor("yt-dlp did not report an output file".to_string()))?;
        let file_name = file_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| DownloadError::Extractor(format!("Unusable output path: {}", file_path.display())))?;

        Ok(DownloadResult { file_path, file_name })
    }
}

/// Last non-empty stdout line, trimmed.
fn parse_printed_path(stdout: &[u8]) -> Option<PathBuf> {
    String::from_utf8_lossy(stdout)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .last()
        .map(PathBuf::from)
}

#[async_trait]
impl DownloadSource for YtDlpSource {
    fn name(&self) -> &str {
        "yt-dlp"
    }

    async fn download(
        &self,
        url: &str,
        storage_dir: &Path,
        _progress_tx: &ProgressSender,
    ) -> Result<DownloadResult, DownloadError> {
        let tag = request_tag();
        let template = extractor_output_template(storage_dir, &tag);
        log::info!("🔎 yt-dlp extraction: {}", url);
        log::debug!("yt-dlp output template: {}", template);

        match self.extract(url, &template).await {
            Ok(result) => {
                log::info!("✅ yt-dlp extraction complete: {}", result.file_path.display());
                Ok(result)
            }
            Err(e) => {
                // .part and intermediate files share the request tag
                remove_tagged(storage_dir, &tag).await;
                Err(e)
            }
        }
    }
}
