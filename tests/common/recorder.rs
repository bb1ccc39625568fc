//! Chat transport that records every call instead of talking to Telegram

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use teloxide::{ApiError, RequestError};

use relaybot::core::error::{AppError, AppResult};
use relaybot::telegram::{ChatTransport, MessageHandle, OutgoingFile, UploadKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    SendText {
        chat_id: i64,
        text: String,
    },
    EditText {
        handle: MessageHandle,
        text: String,
    },
    Upload {
        kind: UploadKind,
        chat_id: i64,
        path: PathBuf,
        file_name: String,
        caption: String,
    },
}

#[derive(Default)]
pub struct RecordingTransport {
    calls: Mutex<Vec<Call>>,
    next_message_id: AtomicI32,
    fail_uploads: bool,
    fail_edits: bool,
    fail_sends: bool,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every upload answers with a transport error.
    pub fn failing_uploads() -> Self {
        Self {
            fail_uploads: true,
            ..Self::default()
        }
    }

    /// Every edit answers like a rate-limited Bot API.
    pub fn failing_edits() -> Self {
        Self {
            fail_edits: true,
            ..Self::default()
        }
    }

    /// Every new message answers like a rate-limited Bot API.
    pub fn failing_sends() -> Self {
        Self {
            fail_sends: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn sent_texts(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::SendText { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn edits(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::EditText { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn uploads(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Upload { .. }))
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn upload(&self, kind: UploadKind, chat_id: i64, file: &OutgoingFile) -> AppResult<()> {
        assert!(file.path.exists(), "upload of a missing file: {}", file.path.display());
        self.record(Call::Upload {
            kind,
            chat_id,
            path: file.path.clone(),
            file_name: file.file_name.clone(),
            caption: file.caption.clone(),
        });
        if self.fail_uploads {
            return Err(api_error("Request Entity Too Large"));
        }
        Ok(())
    }
}

fn api_error(description: &str) -> AppError {
    AppError::Telegram(RequestError::Api(ApiError::Unknown(description.to_string())))
}

#[async_trait]
impl ChatTransport for RecordingTransport {
    async fn send_text(&self, chat_id: i64, text: &str) -> AppResult<MessageHandle> {
        self.record(Call::SendText {
            chat_id,
            text: text.to_string(),
        });
        if self.fail_sends {
            return Err(api_error("Too Many Requests: retry after 1"));
        }
        Ok(MessageHandle {
            chat_id,
            message_id: self.next_message_id.fetch_add(1, Ordering::SeqCst) + 1,
        })
    }

    async fn edit_text(&self, handle: MessageHandle, text: &str) -> AppResult<()> {
        self.record(Call::EditText {
            handle,
            text: text.to_string(),
        });
        if self.fail_edits {
            return Err(api_error("Too Many Requests: retry after 3"));
        }
        Ok(())
    }

    async fn send_video(&self, chat_id: i64, file: &OutgoingFile) -> AppResult<()> {
        self.upload(UploadKind::Video, chat_id, file)
    }

    async fn send_audio(&self, chat_id: i64, file: &OutgoingFile) -> AppResult<()> {
        self.upload(UploadKind::Audio, chat_id, file)
    }

    async fn send_document(&self, chat_id: i64, file: &OutgoingFile) -> AppResult<()> {
        self.upload(UploadKind::Document, chat_id, file)
    }
}
