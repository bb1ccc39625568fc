//! Core utilities, configuration, and common functionality

pub mod config;
pub mod error;
pub mod format;
pub mod health_server;
pub mod logging;
pub mod process;
pub mod session;

// Re-exports for convenience
pub use error::{AppError, AppResult};
pub use logging::{init_logger, log_startup_configuration};
pub use session::{SessionGuard, SessionTracker};
