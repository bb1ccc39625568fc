//! HlsSource — remuxes an m3u8 manifest into a single mp4 with ffmpeg.
//!
//! Streams are copied without re-encoding. No progress is reported while
//! ffmpeg runs.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use crate::core::config::RelaySettings;
use crate::core::process::{describe_exit, output_tail, run_with_timeout};
use crate::download::error::DownloadError;
use crate::download::naming::manifest_output_name;
use crate::download::progress::ProgressSender;
use crate::download::source::{remove_partial, DownloadResult, DownloadSource};

/// Lines of ffmpeg stderr kept in the error
const STDERR_TAIL_LINES: usize = 5;

pub struct HlsSource {
    ffmpeg_bin: String,
    timeout: Duration,
}

impl HlsSource {
    pub fn new(ffmpeg_bin: impl Into<String>, timeout: Duration) -> Self {
        Self {
            ffmpeg_bin: ffmpeg_bin.into(),
            timeout,
        }
    }

    pub fn from_settings(settings: &RelaySettings) -> Self {
        Self::new(settings.ffmpeg_bin.clone(), settings.transcode_timeout)
    }
}

#[async_trait]
impl DownloadSource for HlsSource {
    fn name(&self) -> &str {
        "ffmpeg"
    }

    async fn download(
        &self,
        url: &str,
        storage_dir: &Path,
        _progress_tx: &ProgressSender,
    ) -> Result<DownloadResult, DownloadError> {
        let file_name = manifest_output_name();
        let file_path = storage_dir.join(&file_name);
        log::info!("🎞️ Remuxing manifest {} -> {}", url, file_path.display());

        let mut cmd = Command::new(&self.ffmpeg_bin);
        cmd.args(["-hide_banner", "-loglevel", "error", "-i", url])
            .args(["-c", "copy", "-bsf:a", "aac_adtstoasc", "-movflags", "+faststart", "-y"])
            .arg(&file_path);

        let output = match run_with_timeout(&mut cmd, self.timeout).await {
            Ok(output) => output,
            Err(e) => {
                remove_partial(&file_path).await;
                return Err(e);
            }
        };

        if !output.status.success() {
            remove_partial(&file_path).await;
            let tail = output_tail(&output.stderr, STDERR_TAIL_LINES);
            log::warn!("ffmpeg failed with {}: {}", describe_exit(&output), tail);
            return Err(DownloadError::Transcoder(format!(
                "ffmpeg failed with {}\n{}",
                describe_exit(&output),
                tail
            )));
        }

        if !tokio::fs::try_exists(&file_path).await.unwrap_or(false) {
            return Err(DownloadError::Transcoder("ffmpeg exited cleanly but produced no output".to_string()));
        }

        log::info!("✅ Remux complete: {}", file_path.display());
        Ok(DownloadResult { file_path, file_name })
    }
}
