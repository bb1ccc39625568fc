//! Download engine: URL classification, acquisition sources and orchestration

pub mod classify;
pub mod error;
pub mod naming;
pub mod orchestrator;
pub mod progress;
pub mod source;

// Re-exports for convenience
pub use classify::{classify, has_http_scheme, StrategyKind};
pub use error::DownloadError;
pub use orchestrator::{CleanupGuard, DownloadOrchestrator};
pub use progress::{ProgressSample, ProgressSender, ThrottledReporter};
pub use source::{DownloadRequest, DownloadResult, DownloadSource};
