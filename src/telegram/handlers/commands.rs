//! Command handler implementations (/start, /help)

use teloxide::prelude::*;
use teloxide::types::Message;

use super::types::{HandlerDeps, HandlerError};
use crate::telegram::texts;
use crate::telegram::Bot;

/// Handle /start command
pub(super) async fn handle_start_command(bot: &Bot, msg: &Message) -> Result<(), HandlerError> {
    bot.send_message(msg.chat.id, texts::welcome()).await?;
    Ok(())
}

/// Handle /help command
pub(super) async fn handle_help_command(bot: &Bot, msg: &Message, deps: &HandlerDeps) -> Result<(), HandlerError> {
    bot.send_message(msg.chat.id, texts::help(deps.service.max_file_size()))
        .await?;
    Ok(())
}
