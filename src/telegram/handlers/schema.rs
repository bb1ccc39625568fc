//! Dispatcher schema and handler chain builders

use std::sync::Arc;

use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::Message;

use super::commands::{handle_help_command, handle_start_command};
use super::types::{sender_id, HandlerDeps, HandlerError};
use crate::core::error::AppError;
use crate::download::source::DownloadRequest;
use crate::telegram::bot::Command;
use crate::telegram::transport::TelegramTransport;
use crate::telegram::Bot;

/// Creates the main dispatcher schema for the Telegram bot.
///
/// Commands are matched first; every other private text message is treated
/// as a URL to relay.
pub fn schema(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    let deps_commands = deps.clone();
    let deps_urls = deps.clone();

    dptree::entry()
        .branch(command_handler(deps_commands))
        .branch(url_handler(deps_urls))
}

fn command_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message().branch(dptree::entry().filter_command::<Command>().endpoint(
        move |bot: Bot, msg: Message, cmd: Command| {
            let deps = deps.clone();
            async move {
                log::info!("🎯 Received command: {:?} from chat {}", cmd, msg.chat.id);

                match cmd {
                    Command::Start => handle_start_command(&bot, &msg).await?,
                    Command::Help => handle_help_command(&bot, &msg, &deps).await?,
                }
                Ok(())
            }
        },
    ))
}

/// Relays private text messages.
///
/// The dispatcher serializes updates per chat, so each relay runs in its own
/// task; a second link from the same user then reaches the session tracker
/// while the first is still in flight and is rejected there.
fn url_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .filter(|msg: Message| msg.chat.is_private() && msg.text().is_some())
        .endpoint(move |bot: Bot, msg: Message| {
            let deps = deps.clone();
            async move {
                let Some(text) = msg.text() else {
                    return Ok(());
                };
                let chat_id = msg.chat.id.0;
                let request = DownloadRequest::new(text, sender_id(&msg));
                let service = Arc::clone(&deps.service);
                let transport = TelegramTransport::new(bot);

                tokio::spawn(async move {
                    match service.handle_url(&transport, chat_id, request).await {
                        Ok(delivery) => log::debug!("Relay for chat {} delivered {}", chat_id, delivery.file_name),
                        Err(AppError::InvalidUrl(_)) | Err(AppError::ConcurrencyRejected(_)) => {}
                        Err(e) => log::warn!("Relay for chat {} ended with {}: {}", chat_id, e.category(), e),
                    }
                });
                Ok(())
            }
        })
}
