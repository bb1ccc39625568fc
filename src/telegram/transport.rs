//! Chat transport seam between the relay flow and Telegram.
//!
//! `BotService` only talks to `ChatTransport`, so the whole flow runs in tests
//! against a recording fake. `TelegramTransport` is the production impl.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{InputFile, MessageId};

use crate::core::error::AppResult;
use crate::telegram::Bot;

/// Address of a sent message that can later be edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageHandle {
    pub chat_id: i64,
    pub message_id: i32,
}

/// Upload method picked from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    /// Sent as a streamable video
    Video,
    Audio,
    Document,
}

impl UploadKind {
    pub fn from_file_name(file_name: &str) -> Self {
        let ext = Path::new(file_name)
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "mp4" | "mkv" | "avi" | "mov" | "webm" => UploadKind::Video,
            "mp3" | "wav" | "ogg" | "flac" | "m4a" => UploadKind::Audio,
            _ => UploadKind::Document,
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            UploadKind::Video => "📹",
            UploadKind::Audio => "🎵",
            UploadKind::Document => "📁",
        }
    }
}

/// A local file on its way to the chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingFile {
    pub path: PathBuf,
    /// Name shown to the recipient, independent of the on-disk name
    pub file_name: String,
    pub caption: String,
}

#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send_text(&self, chat_id: i64, text: &str) -> AppResult<MessageHandle>;

    /// May fail transiently (edit rate limits, "message is not modified").
    async fn edit_text(&self, handle: MessageHandle, text: &str) -> AppResult<()>;

    async fn send_video(&self, chat_id: i64, file: &OutgoingFile) -> AppResult<()>;

    async fn send_audio(&self, chat_id: i64, file: &OutgoingFile) -> AppResult<()>;

    async fn send_document(&self, chat_id: i64, file: &OutgoingFile) -> AppResult<()>;
}

/// Edits a status message, discarding any failure.
///
/// Status edits are cosmetic: a rate-limited or rejected edit only means the
/// user misses one update, so the result is dropped here on purpose. Without
/// a handle (the status message was never sent) there is nothing to edit.
pub async fn notify_best_effort<T: ChatTransport + ?Sized>(transport: &T, handle: Option<MessageHandle>, text: &str) {
    let Some(handle) = handle else {
        return;
    };
    if let Err(e) = transport.edit_text(handle, text).await {
        log::debug!("Status edit for chat {} dropped: {}", handle.chat_id, e);
    }
}

/// Sends a text, discarding any failure. Returns the handle when the message went out.
pub async fn send_best_effort<T: ChatTransport + ?Sized>(transport: &T, chat_id: i64, text: &str) -> Option<MessageHandle> {
    match transport.send_text(chat_id, text).await {
        Ok(handle) => Some(handle),
        Err(e) => {
            log::debug!("Reply to chat {} dropped: {}", chat_id, e);
            None
        }
    }
}

/// `ChatTransport` over a teloxide `Bot`.
#[derive(Clone)]
pub struct TelegramTransport {
    bot: Bot,
}

impl TelegramTransport {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    fn input_file(file: &OutgoingFile) -> InputFile {
        InputFile::file(file.path.clone()).file_name(file.file_name.clone())
    }
}

#[async_trait]
impl ChatTransport for TelegramTransport {
    async fn send_text(&self, chat_id: i64, text: &str) -> AppResult<MessageHandle> {
        let msg = self.bot.send_message(ChatId(chat_id), text).await?;
        Ok(MessageHandle {
            chat_id,
            message_id: msg.id.0,
        })
    }

    async fn edit_text(&self, handle: MessageHandle, text: &str) -> AppResult<()> {
        self.bot
            .edit_message_text(ChatId(handle.chat_id), MessageId(handle.message_id), text)
            .await?;
        Ok(())
    }

    async fn send_video(&self, chat_id: i64, file: &OutgoingFile) -> AppResult<()> {
        self.bot
            .send_video(ChatId(chat_id), Self::input_file(file))
            .caption(file.caption.clone())
            .supports_streaming(true)
            .await?;
        Ok(())
    }

    async fn send_audio(&self, chat_id: i64, file: &OutgoingFile) -> AppResult<()> {
        self.bot
            .send_audio(ChatId(chat_id), Self::input_file(file))
            .caption(file.caption.clone())
            .await?;
        Ok(())
    }

    async fn send_document(&self, chat_id: i64, file: &OutgoingFile) -> AppResult<()> {
        self.bot
            .send_document(ChatId(chat_id), Self::input_file(file))
            .caption(file.caption.clone())
            .await?;
        Ok(())
    }
}
