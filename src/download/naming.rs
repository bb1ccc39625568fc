//! File names for everything written to the storage directory.
//!
//! Every on-disk name carries a request tag (unix timestamp + 8 hex chars of a
//! v4 UUID), so two downloads finishing in the same second never share a path.

use std::path::{Path, PathBuf};

use url::Url;

/// `<unix timestamp>_<8 hex chars>`, unique per call.
pub fn request_tag() -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    format!("{}_{}", chrono::Utc::now().timestamp(), &id[..8])
}

/// Derives the user-visible name from the URL path.
///
/// The last path segment is percent-decoded; when it is empty or has no
/// extension a `file_<timestamp>` name without extension is synthesized.
pub fn file_name_from_url(url: &str) -> String {
    let segment = Url::parse(url)
        .ok()
        .and_then(|parsed| {
            parsed
                .path_segments()
                .and_then(|mut segments| segments.next_back().map(str::to_string))
        })
        .unwrap_or_default();

    let decoded = urlencoding::decode(&segment)
        .map(|s| s.into_owned())
        .unwrap_or(segment);
    let name = escape_filename(&decoded);

    if name.is_empty() || !name.contains('.') {
        format!("file_{}", chrono::Utc::now().timestamp())
    } else {
        name
    }
}

/// Longest single path component common filesystems accept, in bytes
const MAX_NAME_BYTES: usize = 255;

/// On-disk path for a direct download: `<dir>/<tag>_<name>`.
///
/// The stem of `file_name` is shortened when the prefixed component would
/// exceed `MAX_NAME_BYTES`; the extension is kept.
pub fn direct_storage_path(storage_dir: &Path, file_name: &str) -> PathBuf {
    let prefix = format!("{}_", request_tag());
    let budget = MAX_NAME_BYTES.saturating_sub(prefix.len());
    storage_dir.join(format!("{}{}", prefix, fit_name(file_name, budget)))
}

/// Output name for a remuxed manifest: `video_<tag>.mp4`.
pub fn manifest_output_name() -> String {
    format!("video_{}.mp4", request_tag())
}

/// yt-dlp output template: `<dir>/%(title)s_<tag>.%(ext)s`.
///
/// Everything yt-dlp writes for this request, partial files included,
/// carries `tag` in its name.
pub fn extractor_output_template(storage_dir: &Path, tag: &str) -> String {
    storage_dir
        .join(format!("%(title)s_{}.%(ext)s", tag))
        .to_string_lossy()
        .into_owned()
}

/// Cuts `name` down to `max_bytes`, trimming the stem and keeping the extension when it fits.
fn fit_name(name: &str, max_bytes: usize) -> String {
    if name.len() <= max_bytes {
        return name.to_string();
    }
    let (stem, ext) = match name.rfind('.') {
        Some(dot) if dot > 0 && name.len() - dot < max_bytes => (&name[..dot], &name[dot..]),
        _ => (name, ""),
    };
    format!("{}{}", truncate_to_boundary(stem, max_bytes - ext.len()), ext)
}

fn truncate_to_boundary(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Replaces path separators and control characters so a decoded name stays a single path component.
fn escape_filename(name: &str) -> String {
    let escaped: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    escaped.trim().trim_start_matches('.').to_string()
}
