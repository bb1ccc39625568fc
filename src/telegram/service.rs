//! Relay flow for one URL message: validate, acquire, report, upload, clean up.
//!
//! `BotService` is built once in `main` and shared with the handlers through
//! `HandlerDeps`. It owns the per-user session tracker and the orchestrator;
//! nothing in the flow lives in a global.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;

use crate::core::config::{self, RelaySettings};
use crate::core::error::{AppError, AppResult};
use crate::core::session::SessionTracker;
use crate::download::classify::has_http_scheme;
use crate::download::error::DownloadError;
use crate::download::orchestrator::{CleanupGuard, DownloadOrchestrator};
use crate::download::progress::{render_progress, ThrottledReporter};
use crate::download::source::{DownloadRequest, DownloadResult};
use crate::telegram::texts;
use crate::telegram::transport::{
    notify_best_effort, send_best_effort, ChatTransport, MessageHandle, OutgoingFile, UploadKind,
};

/// What a successful relay sent to the chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub file_name: String,
    pub size: u64,
    pub kind: UploadKind,
}

pub struct BotService {
    sessions: SessionTracker,
    orchestrator: Arc<DownloadOrchestrator>,
    max_file_size: u64,
    progress_interval: Duration,
}

impl BotService {
    pub fn new(settings: &RelaySettings) -> Result<Self, DownloadError> {
        let orchestrator = DownloadOrchestrator::new(settings)?;
        Ok(Self::from_parts(Arc::new(orchestrator), settings.max_file_size))
    }

    pub fn from_parts(orchestrator: Arc<DownloadOrchestrator>, max_file_size: u64) -> Self {
        Self {
            sessions: SessionTracker::new(),
            orchestrator,
            max_file_size,
            progress_interval: config::progress::update_interval(),
        }
    }

    pub fn with_progress_interval(mut self, interval: Duration) -> Self {
        self.progress_interval = interval;
        self
    }

    pub fn sessions(&self) -> &SessionTracker {
        &self.sessions
    }

    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    /// Relays one URL message to `chat_id`.
    ///
    /// Every outcome has already been reported to the user when this returns;
    /// the `Err` only tells the caller how the request ended.
    pub async fn handle_url<T: ChatTransport + ?Sized>(
        &self,
        transport: &T,
        chat_id: i64,
        request: DownloadRequest,
    ) -> AppResult<Delivery> {
        let url = request.url.trim();
        if !has_http_scheme(url) {
            send_best_effort(transport, chat_id, texts::invalid_url()).await;
            return Err(AppError::InvalidUrl(url.to_string()));
        }

        let Some(_session) = self.sessions.acquire(request.user_id) else {
            log::info!("⏳ User {} already has an active download, rejecting {}", request.user_id, url);
            send_best_effort(transport, chat_id, texts::busy()).await;
            return Err(AppError::ConcurrencyRejected(request.user_id));
        };

        let started_at = Instant::now();
        let status = send_best_effort(transport, chat_id, texts::checking()).await;
        if status.is_none() {
            log::warn!("Status message for chat {} was not sent, relaying without progress", chat_id);
        }
        log::info!("📨 User {} requested {}", request.user_id, url);

        notify_best_effort(transport, status, texts::downloading()).await;
        let result = match self.download_with_progress(transport, status, url).await {
            Ok(result) => result,
            Err(e) => {
                log::error!("❌ Download failed for user {} ({}): {}", request.user_id, e.subcategory(), e);
                notify_best_effort(transport, status, &e.user_message()).await;
                return Err(e.into());
            }
        };

        let file = CleanupGuard::new(Arc::clone(&self.orchestrator), &result.file_path);
        let size = match fs_err::tokio::metadata(file.path()).await {
            Ok(metadata) => metadata.len(),
            Err(e) => {
                let e = DownloadError::from(e);
                log::error!("❌ Downloaded file is unreadable: {}", e);
                notify_best_effort(transport, status, &e.user_message()).await;
                return Err(e.into());
            }
        };

        if size > self.max_file_size {
            log::warn!(
                "📦 {} is {} bytes, over the {} byte limit",
                result.file_name,
                size,
                self.max_file_size
            );
            notify_best_effort(transport, status, &texts::size_limit(size, self.max_file_size)).await;
            return Err(AppError::SizeLimitExceeded {
                size,
                limit: self.max_file_size,
            });
        }

        notify_best_effort(transport, status, &texts::uploading(&result.file_name, size)).await;

        let kind = UploadKind::from_file_name(&result.file_name);
        let outgoing = OutgoingFile {
            path: result.file_path.clone(),
            file_name: result.file_name.clone(),
            caption: texts::caption(kind.emoji(), &result.file_name, size),
        };
        let upload = match kind {
            UploadKind::Video => transport.send_video(chat_id, &outgoing).await,
            UploadKind::Audio => transport.send_audio(chat_id, &outgoing).await,
            UploadKind::Document => transport.send_document(chat_id, &outgoing).await,
        };
        if let Err(e) = upload {
            log::error!("❌ Upload of {} to chat {} failed: {}", result.file_name, chat_id, e);
            notify_best_effort(transport, status, texts::upload_failed()).await;
            return Err(e);
        }

        notify_best_effort(
            transport,
            status,
            &texts::done(&result.file_name, size, started_at.elapsed()),
        )
        .await;
        log::info!("✅ Delivered {} ({} bytes) to chat {}", result.file_name, size, chat_id);

        Ok(Delivery {
            file_name: result.file_name,
            size,
            kind,
        })
    }

    /// Runs the orchestrator while forwarding throttled progress to the status message.
    async fn download_with_progress<T: ChatTransport + ?Sized>(
        &self,
        transport: &T,
        status: Option<MessageHandle>,
        url: &str,
    ) -> Result<DownloadResult, DownloadError> {
        let (progress_tx, mut progress_rx) = mpsc::unbounded_channel();
        let mut reporter = ThrottledReporter::new(self.progress_interval);

        let download = self.orchestrator.download(url, progress_tx);
        let report = async {
            while let Some(sample) = progress_rx.recv().await {
                if reporter.maybe_emit(&sample) {
                    notify_best_effort(transport, status, &render_progress(&sample, reporter.elapsed())).await;
                }
            }
        };

        let (result, ()) = tokio::join!(download, report);
        result
    }
}
