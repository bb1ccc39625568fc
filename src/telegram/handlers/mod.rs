//! Telegram bot handler tree configuration
//!
//! The dispatcher schema lives here so integration code and `main` build the
//! exact same handler tree.

mod commands;
mod schema;
mod types;

pub use schema::schema;
pub use types::{HandlerDeps, HandlerError};
