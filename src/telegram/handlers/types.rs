//! Handler types and dependencies

use std::sync::Arc;

use teloxide::types::Message;

use crate::telegram::service::BotService;

/// Error type for handlers
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Dependencies required by handlers
#[derive(Clone)]
pub struct HandlerDeps {
    pub service: Arc<BotService>,
}

impl HandlerDeps {
    /// Create new handler dependencies
    pub fn new(service: Arc<BotService>) -> Self {
        Self { service }
    }
}

/// Sender id as stored in the session tracker.
///
/// Channel posts carry no sender; the chat id stands in for them.
pub(super) fn sender_id(msg: &Message) -> i64 {
    msg.from
        .as_ref()
        .and_then(|u| i64::try_from(u.id.0).ok())
        .unwrap_or(msg.chat.id.0)
}
