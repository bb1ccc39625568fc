//! Shell scripts standing in for ffmpeg and yt-dlp
//!
//! Each script lives in its own TempDir so tests never depend on the real
//! tools being installed.

#![allow(dead_code)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

pub struct FakeTools {
    dir: TempDir,
}

impl FakeTools {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create tool dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// ffmpeg that writes a small file at its last argument and exits 0.
    pub fn ffmpeg_ok(&self) -> PathBuf {
        self.script(
            "ffmpeg",
            r#"for last; do :; done
printf 'remuxed' > "$last"
exit 0"#,
        )
    }

    /// ffmpeg that fails like a dead manifest does.
    pub fn ffmpeg_failing(&self) -> PathBuf {
        self.script(
            "ffmpeg",
            r#"echo "https://cdn.example.com/stream.m3u8: Server returned 403 Forbidden" >&2
exit 1"#,
        )
    }

    /// yt-dlp that records its arguments, writes `extracted.mp4` and prints its path.
    pub fn ytdlp_ok(&self) -> PathBuf {
        let out = self.path().join("extracted.mp4");
        let args = self.args_file();
        self.script(
            "yt-dlp",
            &format!(
                r#"printf '%s\n' "$@" > '{args}'
printf 'video' > '{out}'
echo "[download] Destination: {out}"
echo '{out}'
exit 0"#,
                args = args.display(),
                out = out.display()
            ),
        )
    }

    /// yt-dlp that rejects the URL.
    pub fn ytdlp_failing(&self) -> PathBuf {
        self.script(
            "yt-dlp",
            r#"echo "WARNING: falling back to generic extractor" >&2
echo "ERROR: [generic] Unsupported URL: https://example.com/page" >&2
exit 1"#,
        )
    }

    /// yt-dlp that leaves a `.part` file at its output template, then runs `tail`.
    pub fn ytdlp_partial_then(&self, tail: &str) -> PathBuf {
        self.script(
            "yt-dlp",
            &format!(
                r#"while [ $# -gt 0 ]; do
  if [ "$1" = "-o" ]; then template="$2"; fi
  shift
done
partial=$(printf '%s' "$template" | sed -e 's/%(title)s/Title/' -e 's/%(ext)s/mp4.part/')
printf 'half' > "$partial"
{tail}"#,
                tail = tail
            ),
        )
    }

    /// A tool that hangs well past any test timeout.
    pub fn sleeper(&self) -> PathBuf {
        self.script("sleeper", "sleep 30")
    }

    /// Arguments recorded by `ytdlp_ok`, one per line.
    pub fn recorded_args(&self) -> Vec<String> {
        std::fs::read_to_string(self.args_file())
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    fn args_file(&self) -> PathBuf {
        self.path().join("ytdlp_args.txt")
    }

    fn script(&self, name: &str, body: &str) -> PathBuf {
        let path = self.path().join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).expect("Failed to write script");
        let mut perms = std::fs::metadata(&path).expect("Failed to stat script").permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).expect("Failed to chmod script");
        path
    }
}
