//! Human-readable sizes, durations and progress bars for chat messages.

const SIZE_UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

/// Formats a byte count with two decimals in 1024-based units.
///
/// # Example
///
/// ```
/// use relaybot::core::format::format_size;
///
/// assert_eq!(format_size(1536), "1.50 KB");
/// assert_eq!(format_size(1073741824), "1.00 GB");
/// ```
pub fn format_size(bytes: u64) -> String {
    format_size_f64(bytes as f64)
}

/// Same as [`format_size`] for fractional values such as transfer speeds.
pub fn format_size_f64(bytes: f64) -> String {
    let mut size = bytes.max(0.0);
    for unit in SIZE_UNITS {
        if size < 1024.0 {
            return format!("{:.2} {}", size, unit);
        }
        size /= 1024.0;
    }
    format!("{:.2} TB", size)
}

/// Formats a duration in whole units: seconds under a minute, minutes under an hour, hours otherwise.
pub fn format_duration(seconds: u64) -> String {
    if seconds < 60 {
        format!("{} sec", seconds)
    } else if seconds < 3600 {
        format!("{} min", seconds / 60)
    } else {
        format!("{} h", seconds / 3600)
    }
}

/// Creates a fixed-width progress bar, `█` for done and `░` for remaining.
pub fn progress_bar(percent: f64, width: usize) -> String {
    let percent = if percent.is_finite() { percent.clamp(0.0, 100.0) } else { 0.0 };
    let filled = ((width as f64) * percent / 100.0) as usize;
    let filled = filled.min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}
