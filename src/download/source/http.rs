//! HttpSource — direct HTTP download with chunked writes and progress.
//!
//! The body is streamed and flushed to disk in fixed 1 MiB pieces; the whole
//! response is never held in memory. Progress is only reported when the
//! origin declared a Content-Length.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use bytes::BytesMut;
use futures_util::StreamExt;
use reqwest::Client;
use tokio::io::AsyncWriteExt;

use crate::core::config;
use crate::download::error::DownloadError;
use crate::download::naming::{direct_storage_path, file_name_from_url};
use crate::download::progress::{ProgressSample, ProgressSender};
use crate::download::source::{remove_partial, DownloadResult, DownloadSource};

/// Download source for direct HTTP file downloads.
pub struct HttpSource {
    client: Client,
    chunk_size: usize,
    read_timeout: Duration,
}

impl HttpSource {
    pub fn new() -> Result<Self, DownloadError> {
        let client = Client::builder()
            .user_agent(config::network::USER_AGENT)
            .connect_timeout(config::network::connect_timeout())
            .build()?;

        Ok(Self::with_client(client))
    }

    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            chunk_size: config::download::CHUNK_SIZE,
            read_timeout: config::network::read_timeout(),
        }
    }

    async fn fetch_to(&self, url: &str, dest: &Path, progress_tx: &ProgressSender) -> Result<u64, DownloadError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let total = response.content_length().unwrap_or(0);
        let mut file = fs_err::tokio::File::create(dest).await?;
        let mut buffer = BytesMut::with_capacity(self.chunk_size);
        let mut written: u64 = 0;
        let mut stream = response.bytes_stream();

        loop {
            let next = tokio::time::timeout(self.read_timeout, stream.next())
                .await
                .map_err(|_| {
                    DownloadError::Timeout(format!(
                        "No data received for {}s",
                        self.read_timeout.as_secs()
                    ))
                })?;

            let Some(chunk) = next else { break };
            buffer.extend_from_slice(&chunk?);

            while buffer.len() >= self.chunk_size {
                let piece = buffer.split_to(self.chunk_size);
                file.write_all(&piece).await?;
                written += piece.len() as u64;
                report(progress_tx, written, total);
            }
        }

        if !buffer.is_empty() {
            file.write_all(&buffer).await?;
            written += buffer.len() as u64;
            report(progress_tx, written, total);
        }
        file.flush().await?;

        Ok(written)
    }
}

fn report(progress_tx: &ProgressSender, written: u64, total: u64) {
    if total > 0 {
        // The receiver may already be gone; the transfer continues regardless.
        let _ = progress_tx.send(ProgressSample::new(written, total));
    }
}

#[async_trait]
impl DownloadSource for HttpSource {
    fn name(&self) -> &str {
        "http"
    }

    async fn download(
        &self,
        url: &str,
        storage_dir: &Path,
        progress_tx: &ProgressSender,
    ) -> Result<DownloadResult, DownloadError> {
        let file_name = file_name_from_url(url);
        let file_path = direct_storage_path(storage_dir, &file_name);
        log::info!("📥 HTTP direct download: {} -> {}", url, file_path.display());

        match self.fetch_to(url, &file_path, progress_tx).await {
            Ok(written) => {
                log::info!(
                    "✅ HTTP download complete: {} ({:.2} MB)",
                    file_path.display(),
                    written as f64 / (1024.0 * 1024.0)
                );
                Ok(DownloadResult { file_path, file_name })
            }
            Err(e) => {
                remove_partial(&file_path).await;
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_connection_refused_leaves_no_file() {
        let dir = TempDir::new().unwrap();
        let source = HttpSource::new().unwrap();
        let (tx, _rx) = mpsc::unbounded_channel();

        let result = source.download("http://127.0.0.1:1/file.bin", dir.path(), &tx).await;

        assert!(matches!(result, Err(DownloadError::Http(_))));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_report_skips_unknown_length() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        report(&tx, 10, 0);
        assert!(rx.try_recv().is_err());

        report(&tx, 10, 20);
        assert_eq!(rx.try_recv().unwrap(), ProgressSample::new(10, 20));
    }
}
