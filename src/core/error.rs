use thiserror::Error;

use crate::download::error::DownloadError;

/// Centralized error types for the application
///
/// Every way a relay request can end without a delivered file maps to one
/// variant here. The bot service reports the variant to the user once and
/// returns it so callers (and tests) can see how the request ended.
#[derive(Error, Debug)]
pub enum AppError {
    /// Message text does not start with http:// or https://
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The user already has a download in flight
    #[error("A download is already active for user {0}")]
    ConcurrencyRejected(i64),

    /// Every applicable acquisition strategy failed
    #[error(transparent)]
    Download(#[from] DownloadError),

    /// The acquired file is larger than the configured ceiling
    #[error("File size {size} bytes exceeds the limit of {limit} bytes")]
    SizeLimitExceeded { size: u64, limit: u64 },

    /// Chat transport failure unrelated to the download itself
    #[error("Telegram error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Returns category label for logs
    pub fn category(&self) -> &'static str {
        match self {
            AppError::InvalidUrl(_) => "invalid_url",
            AppError::ConcurrencyRejected(_) => "concurrency_rejected",
            AppError::Download(_) => "download",
            AppError::SizeLimitExceeded { .. } => "size_limit",
            AppError::Telegram(_) => "transport",
            AppError::Io(_) => "io",
        }
    }
}
