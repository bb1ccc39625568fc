use thiserror::Error;

/// Longest cause text ever shown to a chat user.
const MAX_USER_CAUSE_CHARS: usize = 300;

/// Structured error type for acquisition failures.
///
/// Each variant names the stage that failed and carries the innermost cause
/// as plain text. `user_message` is the only place that turns it into
/// something shown in the chat.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// Origin answered with a non-2xx status
    #[error("HTTP {status} for {url}")]
    HttpStatus { status: u16, url: String },
    /// Connection, TLS or body stream failure
    #[error("HTTP request failed: {0}")]
    Http(String),
    /// Local file system failure
    #[error("I/O error: {0}")]
    Io(String),
    /// ffmpeg ran and failed, or produced nothing
    #[error("{0}")]
    Transcoder(String),
    /// yt-dlp ran and failed, or printed no path
    #[error("{0}")]
    Extractor(String),
    /// A transfer or subprocess exceeded its time budget
    #[error("{0}")]
    Timeout(String),
    /// An external tool could not be started
    #[error("{0}")]
    Spawn(String),
}

impl DownloadError {
    /// Returns subcategory for logs
    pub fn subcategory(&self) -> &'static str {
        match self {
            DownloadError::HttpStatus { .. } => "http_status",
            DownloadError::Http(_) => "http",
            DownloadError::Io(_) => "io",
            DownloadError::Transcoder(_) => "transcoder",
            DownloadError::Extractor(_) => "extractor",
            DownloadError::Timeout(_) => "timeout",
            DownloadError::Spawn(_) => "spawn",
        }
    }

    /// Returns the inner cause, unformatted.
    pub fn cause(&self) -> String {
        match self {
            DownloadError::HttpStatus { .. } => self.to_string(),
            DownloadError::Http(msg)
            | DownloadError::Io(msg)
            | DownloadError::Transcoder(msg)
            | DownloadError::Extractor(msg)
            | DownloadError::Timeout(msg)
            | DownloadError::Spawn(msg) => msg.clone(),
        }
    }

    /// Renders the cause for the chat user.
    ///
    /// Keeps only the last meaningful diagnostic line, drops yt-dlp's `ERROR:`
    /// prefix, reduces absolute paths to their file name and caps the length.
    pub fn user_message(&self) -> String {
        let cause = self.cause();
        let line = cause
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .last()
            .unwrap_or("unknown error");
        let line = line.strip_prefix("ERROR:").map(str::trim).unwrap_or(line);
        let line = strip_absolute_paths(line);

        let shown = if line.chars().count() > MAX_USER_CAUSE_CHARS {
            let truncated: String = line.chars().take(MAX_USER_CAUSE_CHARS).collect();
            format!("{}…", truncated)
        } else {
            line
        };
        format!("Download failed: {}", shown)
    }
}

fn strip_absolute_paths(line: &str) -> String {
    line.split(' ')
        .map(|token| {
            let bare = token.trim_matches(|c| c == '\'' || c == '"' || c == ':' || c == ',');
            if bare.starts_with('/') && bare.matches('/').count() > 1 {
                let name = bare.rsplit('/').next().unwrap_or(bare);
                token.replace(bare, name)
            } else {
                token.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

impl From<std::io::Error> for DownloadError {
    fn from(err: std::io::Error) -> Self {
        DownloadError::Io(err.to_string())
    }
}

impl From<reqwest::Error> for DownloadError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            DownloadError::Timeout(format!("HTTP transfer timed out: {}", err))
        } else {
            DownloadError::Http(err.to_string())
        }
    }
}
