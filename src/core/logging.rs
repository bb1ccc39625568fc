//! Logging initialization and startup diagnostics
//!
//! This module provides:
//! - Logger initialization (console + file)
//! - A startup report of storage, size ceiling and external tool availability

use anyhow::Result;
use simplelog::*;
use std::fs::File;

use crate::core::config::RelaySettings;
use crate::core::format::format_size;
use crate::core::process::probe_tool_version;

/// Initialize logger for both console and file output
///
/// # Arguments
/// * `log_file_path` - Path to the log file
///
/// # Returns
/// * `Ok(())` - Logger initialized successfully
/// * `Err(anyhow::Error)` - Failed to create the file or a logger was already installed
pub fn init_logger(log_file_path: &str) -> Result<()> {
    let log_file = File::create(log_file_path).map_err(|e| anyhow::anyhow!("Failed to create log file: {}", e))?;

    CombinedLogger::init(vec![
        TermLogger::new(
            LevelFilter::Info,
            Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ),
        WriteLogger::new(LevelFilter::Info, Config::default(), log_file),
    ])
    .map_err(|e| anyhow::anyhow!("Failed to initialize logger: {}", e))?;

    Ok(())
}

/// Logs the effective configuration at application startup
///
/// Missing media tools are reported as errors but never stop the bot:
/// direct HTTP downloads keep working without them.
pub async fn log_startup_configuration(settings: &RelaySettings) {
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    log::info!("⚙️  Relay configuration");
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    log::info!("📁 Storage directory: {}", settings.storage_dir.display());
    log::info!("📦 Max file size: {}", format_size(settings.max_file_size));

    match probe_tool_version(&settings.ffmpeg_bin, "-version").await {
        Some(version) => log::info!("✅ ffmpeg: {}", version),
        None => {
            log::error!("❌ ffmpeg ({}) not available", settings.ffmpeg_bin);
            log::error!("   m3u8 links will go straight to the yt-dlp fallback");
        }
    }

    match probe_tool_version(&settings.ytdlp_bin, "--version").await {
        Some(version) => log::info!("✅ yt-dlp: {}", version),
        None => {
            log::error!("❌ yt-dlp ({}) not available", settings.ytdlp_bin);
            log::error!("   Links that aren't direct files will FAIL");
        }
    }
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
}
