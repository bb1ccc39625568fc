//! Relaybot - Telegram bot that downloads a linked file and re-uploads it to the chat
//!
//! # Module Structure
//!
//! - `core`: Configuration, errors, logging, formatting, subprocess helpers and the per-user session tracker
//! - `download`: URL classification, the direct/HLS/yt-dlp sources and the orchestrator chaining them
//! - `telegram`: Bot setup, dispatcher schema, chat transport and the relay flow

pub mod cli;
pub mod core;
pub mod download;
pub mod telegram;

// Re-export commonly used types for convenience
pub use crate::core::{config, AppError, AppResult};
pub use download::{DownloadError, DownloadOrchestrator};
pub use telegram::BotService;
