use once_cell::sync::Lazy;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default upload ceiling: 2 GiB, the largest file a local Bot API server accepts.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 2 * 1024 * 1024 * 1024;

/// Bot token
/// Read from BOT_TOKEN or TELOXIDE_TOKEN environment variable
pub static BOT_TOKEN: Lazy<String> = Lazy::new(|| {
    env::var("BOT_TOKEN")
        .or_else(|_| env::var("TELOXIDE_TOKEN"))
        .unwrap_or_default()
});

/// Custom Bot API server URL (local Bot API server for uploads above 50 MB)
/// Read from BOT_API_URL environment variable
pub static BOT_API_URL: Lazy<Option<String>> = Lazy::new(|| non_empty_var("BOT_API_URL"));

/// Storage directory for in-flight downloads
/// Read from DOWNLOAD_PATH environment variable
/// Default: ./downloads
pub static DOWNLOAD_PATH: Lazy<String> =
    Lazy::new(|| env::var("DOWNLOAD_PATH").unwrap_or_else(|_| "./downloads".to_string()));

/// Maximum size of a file the bot will upload, in bytes
/// Read from MAX_FILE_SIZE environment variable
/// Default: 2 GiB
pub static MAX_FILE_SIZE: Lazy<u64> = Lazy::new(|| {
    env::var("MAX_FILE_SIZE")
        .ok()
        .and_then(|raw| parse_size(&raw))
        .unwrap_or(DEFAULT_MAX_FILE_SIZE)
});

/// Cached ffmpeg binary path
/// Read once at startup from FFMPEG_BIN environment variable or defaults to "ffmpeg"
pub static FFMPEG_BIN: Lazy<String> = Lazy::new(|| env::var("FFMPEG_BIN").unwrap_or_else(|_| "ffmpeg".to_string()));

/// Cached yt-dlp binary path
/// Read once at startup from YTDL_BIN environment variable or defaults to "yt-dlp"
pub static YTDL_BIN: Lazy<String> = Lazy::new(|| env::var("YTDL_BIN").unwrap_or_else(|_| "yt-dlp".to_string()));

/// Port of the liveness endpoint
/// Read from HEALTH_PORT, then PORT (set by most PaaS hosts)
/// Default: 8080
pub static HEALTH_PORT: Lazy<u16> = Lazy::new(|| {
    env::var("HEALTH_PORT")
        .or_else(|_| env::var("PORT"))
        .ok()
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or(8080)
});

/// Log file path
/// Read from LOG_FILE_PATH environment variable
/// Default: relaybot.log
pub static LOG_FILE_PATH: Lazy<String> =
    Lazy::new(|| env::var("LOG_FILE_PATH").unwrap_or_else(|_| "relaybot.log".to_string()));

/// Download configuration
pub mod download {
    use super::Duration;

    /// Size of each chunk appended to disk by the direct HTTP source
    pub const CHUNK_SIZE: usize = 1024 * 1024;

    /// Timeout for an ffmpeg remux of a whole manifest (in seconds)
    pub const TRANSCODE_TIMEOUT_SECS: u64 = 2 * 60 * 60;

    /// Timeout for a yt-dlp extraction (in seconds)
    pub const EXTRACT_TIMEOUT_SECS: u64 = 2 * 60 * 60;

    pub fn transcode_timeout() -> Duration {
        Duration::from_secs(TRANSCODE_TIMEOUT_SECS)
    }

    pub fn extract_timeout() -> Duration {
        Duration::from_secs(EXTRACT_TIMEOUT_SECS)
    }
}

/// Progress message configuration
pub mod progress {
    use super::Duration;

    /// Minimum gap between two progress edits of the same status message
    pub const UPDATE_INTERVAL_SECS: u64 = 3;

    /// Number of cells in the rendered progress bar
    pub const BAR_WIDTH: usize = 20;

    pub fn update_interval() -> Duration {
        Duration::from_secs(UPDATE_INTERVAL_SECS)
    }
}

/// Network configuration
pub mod network {
    use super::Duration;

    /// Browser User-Agent; some origins reject bare HTTP clients
    pub const USER_AGENT: &str =
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

    /// Connection establishment timeout (in seconds)
    pub const CONNECT_TIMEOUT_SECS: u64 = 30;

    /// Maximum silence between two body chunks before the transfer is abandoned (in seconds)
    pub const READ_TIMEOUT_SECS: u64 = 120;

    /// Request timeout for Bot API calls (in seconds)
    /// Generous because uploads close to 2 GiB go through the same client
    pub const BOT_REQUEST_TIMEOUT_SECS: u64 = 900; // 15 minutes

    pub fn connect_timeout() -> Duration {
        Duration::from_secs(CONNECT_TIMEOUT_SECS)
    }

    pub fn read_timeout() -> Duration {
        Duration::from_secs(READ_TIMEOUT_SECS)
    }

    pub fn bot_timeout() -> Duration {
        Duration::from_secs(BOT_REQUEST_TIMEOUT_SECS)
    }
}

/// Settings handed to the download engine and the bot service.
///
/// Built once from the environment in `main` and passed down explicitly, so
/// tests can construct their own without touching process state.
#[derive(Debug, Clone)]
pub struct RelaySettings {
    pub storage_dir: PathBuf,
    pub max_file_size: u64,
    pub ffmpeg_bin: String,
    pub ytdlp_bin: String,
    pub transcode_timeout: Duration,
    pub extract_timeout: Duration,
}

impl RelaySettings {
    pub fn from_env() -> Self {
        Self {
            storage_dir: PathBuf::from(DOWNLOAD_PATH.as_str()),
            max_file_size: *MAX_FILE_SIZE,
            ffmpeg_bin: FFMPEG_BIN.clone(),
            ytdlp_bin: YTDL_BIN.clone(),
            transcode_timeout: download::transcode_timeout(),
            extract_timeout: download::extract_timeout(),
        }
    }

    pub fn with_storage_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.storage_dir = dir.into();
        self
    }
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from("./downloads"),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            ffmpeg_bin: "ffmpeg".to_string(),
            ytdlp_bin: "yt-dlp".to_string(),
            transcode_timeout: download::transcode_timeout(),
            extract_timeout: download::extract_timeout(),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Parses a byte count, accepting plain integers and `K`/`M`/`G` suffixes (1024 base).
pub fn parse_size(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    let (digits, multiplier) = match raw.chars().last()?.to_ascii_uppercase() {
        'K' => (&raw[..raw.len() - 1], 1024),
        'M' => (&raw[..raw.len() - 1], 1024 * 1024),
        'G' => (&raw[..raw.len() - 1], 1024 * 1024 * 1024),
        _ => (raw, 1),
    };
    digits.trim().parse::<u64>().ok()?.checked_mul(multiplier)
}
