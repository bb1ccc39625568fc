//! Lexical URL classification. Never touches the network.

/// Entry point into the acquisition chain for a URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    /// HLS playlist, remuxed by ffmpeg
    Manifest,
    /// Anything else, fetched directly over HTTP first
    Generic,
}

/// Classifies a URL by its lowercase form containing `.m3u8`.
pub fn classify(url: &str) -> StrategyKind {
    if url.to_lowercase().contains(".m3u8") {
        StrategyKind::Manifest
    } else {
        StrategyKind::Generic
    }
}

/// Returns true for text starting with `http://` or `https://`.
pub fn has_http_scheme(text: &str) -> bool {
    text.starts_with("http://") || text.starts_with("https://")
}
