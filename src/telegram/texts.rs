//! User-facing message texts

use std::time::Duration;

use crate::core::format::{format_duration, format_size};

pub fn welcome() -> String {
    "👋 Hi! Send me a link and I'll send the file back to you.\n\n\
     I can handle:\n\
     📄 Direct file links (zip, pdf, mp4, mp3, ...)\n\
     🎞️ HLS streams (.m3u8), converted to mp4\n\
     🌐 Pages from video sites, via yt-dlp\n\n\
     Just paste a URL starting with http:// or https://"
        .to_string()
}

pub fn help(max_file_size: u64) -> String {
    format!(
        "📖 How to use\n\n\
         1. Send a link starting with http:// or https://\n\
         2. Watch the progress message\n\
         3. Receive the file in this chat\n\n\
         📦 Max file size: {}\n\
         ⏳ One download at a time per user\n\n\
         Commands:\n\
         /start - welcome message\n\
         /help - this guide",
        format_size(max_file_size)
    )
}

pub fn invalid_url() -> &'static str {
    "❌ Please send a valid link starting with http:// or https://"
}

pub fn busy() -> &'static str {
    "⏳ You already have a download in progress. Please wait for it to finish."
}

pub fn checking() -> &'static str {
    "🔍 Checking link..."
}

pub fn downloading() -> &'static str {
    "📥 Downloading..."
}

pub fn uploading(file_name: &str, size: u64) -> String {
    format!("📤 Uploading...\n\n📄 {}\n📦 {}", file_name, format_size(size))
}

pub fn size_limit(size: u64, limit: u64) -> String {
    format!(
        "❌ File is too large: {}\nMaximum allowed: {}",
        format_size(size),
        format_size(limit)
    )
}

pub fn done(file_name: &str, size: u64, elapsed: Duration) -> String {
    format!(
        "✅ Done\n\n📄 {}\n📦 {}\n⏱ {}",
        file_name,
        format_size(size),
        format_duration(elapsed.as_secs())
    )
}

pub fn caption(emoji: &str, file_name: &str, size: u64) -> String {
    format!("{} {}\n📦 Size: {}", emoji, file_name, format_size(size))
}

pub fn upload_failed() -> &'static str {
    "❌ Upload failed. Please try again later."
}
