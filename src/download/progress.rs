//! Progress samples, the per-download throttle, and the progress message body.

use std::time::{Duration, Instant};

use tokio::sync::mpsc;

use crate::core::config;
use crate::core::format::{format_duration, format_size, format_size_f64, progress_bar};

/// Snapshot of a transfer. `total_bytes` is 0 when the origin sent no length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressSample {
    pub bytes_transferred: u64,
    pub total_bytes: u64,
    pub percent: f64,
}

impl ProgressSample {
    pub fn new(bytes_transferred: u64, total_bytes: u64) -> Self {
        let percent = if total_bytes > 0 {
            bytes_transferred as f64 / total_bytes as f64 * 100.0
        } else {
            0.0
        };
        Self {
            bytes_transferred,
            total_bytes,
            percent,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.percent >= 100.0
    }
}

/// Channel the sources push samples into; the receiver side decides what to show.
pub type ProgressSender = mpsc::UnboundedSender<ProgressSample>;

/// Per-download throttle for progress edits.
///
/// The first sample always passes, later ones only once `interval` has
/// elapsed since the last emission. A completion sample always passes.
#[derive(Debug)]
pub struct ThrottledReporter {
    started_at: Instant,
    last_emit: Option<Instant>,
    interval: Duration,
}

impl Default for ThrottledReporter {
    fn default() -> Self {
        Self::new(config::progress::update_interval())
    }
}

impl ThrottledReporter {
    pub fn new(interval: Duration) -> Self {
        Self::starting_at(Instant::now(), interval)
    }

    /// Reporter whose clock started at `started_at`. Used by tests that drive time by hand.
    pub fn starting_at(started_at: Instant, interval: Duration) -> Self {
        Self {
            started_at,
            last_emit: None,
            interval,
        }
    }

    pub fn maybe_emit(&mut self, sample: &ProgressSample) -> bool {
        self.maybe_emit_at(sample, Instant::now())
    }

    pub fn maybe_emit_at(&mut self, sample: &ProgressSample, now: Instant) -> bool {
        let due = match self.last_emit {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.interval,
        };
        if due || sample.is_complete() {
            self.last_emit = Some(now);
            true
        } else {
            false
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    pub fn started_at(&self) -> Instant {
        self.started_at
    }
}

/// Body of the progress status message: bar, sizes, speed and ETA.
///
/// ```text
/// 📥 Downloading...
///
/// ██████████░░░░░░░░░░ 50.0%
/// 📦 1.00 MB / 2.00 MB
/// ⚡ 512.00 KB/s
/// ⏱ ETA: 2 sec
/// ```
pub fn render_progress(sample: &ProgressSample, elapsed: Duration) -> String {
    let percent = sample.percent.clamp(0.0, 100.0);
    let mut text = format!(
        "📥 Downloading...\n\n{} {:.1}%\n📦 {} / {}",
        progress_bar(percent, config::progress::BAR_WIDTH),
        percent,
        format_size(sample.bytes_transferred),
        format_size(sample.total_bytes),
    );

    let secs = elapsed.as_secs_f64();
    if secs > 0.0 && sample.bytes_transferred > 0 {
        let speed = sample.bytes_transferred as f64 / secs;
        text.push_str(&format!("\n⚡ {}/s", format_size_f64(speed)));

        let remaining = sample.total_bytes.saturating_sub(sample.bytes_transferred);
        if remaining > 0 {
            let eta = (remaining as f64 / speed).ceil() as u64;
            text.push_str(&format!("\n⏱ ETA: {}", format_duration(eta)));
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_percent() {
        let sample = ProgressSample::new(1024 * 1024, 2 * 1024 * 1024);
        assert_eq!(sample.percent, 50.0);
        assert!(!sample.is_complete());

        let done = ProgressSample::new(2097152, 2097152);
        assert_eq!(done.percent, 100.0);
        assert!(done.is_complete());
    }

    #[test]
    fn test_unknown_total_is_zero_percent() {
        let sample = ProgressSample::new(500, 0);
        assert_eq!(sample.percent, 0.0);
        assert!(!sample.is_complete());
    }

    #[test]
    fn test_first_sample_always_emits() {
        let start = Instant::now();
        let mut reporter = ThrottledReporter::starting_at(start, Duration::from_secs(3));
        assert!(reporter.maybe_emit_at(&ProgressSample::new(1, 100), start));
        assert!(!reporter.maybe_emit_at(&ProgressSample::new(2, 100), start + Duration::from_secs(1)));
        assert!(reporter.maybe_emit_at(&ProgressSample::new(3, 100), start + Duration::from_secs(3)));
    }

    #[test]
    fn test_completion_bypasses_throttle() {
        let start = Instant::now();
        let mut reporter = ThrottledReporter::starting_at(start, Duration::from_secs(3));
        assert!(reporter.maybe_emit_at(&ProgressSample::new(10, 100), start));
        assert!(reporter.maybe_emit_at(&ProgressSample::new(100, 100), start + Duration::from_millis(10)));
    }

    #[test]
    fn test_thousand_chunks_over_ten_seconds() {
        let start = Instant::now();
        let mut reporter = ThrottledReporter::starting_at(start, Duration::from_secs(3));
        let total = 1000u64;

        let emitted = (1..=total)
            .filter(|&i| {
                let now = start + Duration::from_millis(i * 10);
                reporter.maybe_emit_at(&ProgressSample::new(i, total), now)
            })
            .count();

        // ceil(10 / 3) + 1
        assert!(emitted <= 5, "emitted {} times", emitted);
        assert_eq!(emitted, 5);
    }

    #[test]
    fn test_render_progress_contents() {
        let sample = ProgressSample::new(1024 * 1024, 2 * 1024 * 1024);
        let text = render_progress(&sample, Duration::from_secs(2));
        assert!(text.contains("50.0%"));
        assert!(text.contains("1.00 MB / 2.00 MB"));
        assert!(text.contains("512.00 KB/s"));
        assert!(text.contains("ETA: 2 sec"));
    }

    #[test]
    fn test_render_progress_without_elapsed_time() {
        let sample = ProgressSample::new(0, 2048);
        let text = render_progress(&sample, Duration::ZERO);
        assert!(text.contains("0.0%"));
        assert!(!text.contains("ETA"));
    }
}
