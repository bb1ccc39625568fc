//! Telegram bot integration and handlers

pub mod bot;
pub mod handlers;
pub mod service;
pub mod texts;
pub mod transport;

/// Bot type used across handlers
pub type Bot = teloxide::Bot;

// Re-exports for convenience
pub use bot::{create_bot, setup_bot_commands, Command};
pub use handlers::{schema, HandlerDeps, HandlerError};
pub use service::{BotService, Delivery};
pub use transport::{ChatTransport, MessageHandle, OutgoingFile, TelegramTransport, UploadKind};
