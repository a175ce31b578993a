//! Utility functions and helpers

use directories::ProjectDirs;
use std::path::PathBuf;

/// Marker appended to output that was cut to fit a character budget.
pub const TRUNCATION_MARKER: &str = "...";

pub fn get_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("dev", "ward", "ward").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Cuts `s` to at most `max_chars` characters, ending in [`TRUNCATION_MARKER`]
/// when anything was removed.
///
/// Counts characters, not bytes, so multi-byte text is never split.
/// Returns the text and whether it was truncated.
pub fn truncate_chars(s: &str, max_chars: usize) -> (String, bool) {
    if s.chars().count() <= max_chars {
        return (s.to_string(), false);
    }

    let marker_len = TRUNCATION_MARKER.chars().count();
    if max_chars <= marker_len {
        return (TRUNCATION_MARKER.chars().take(max_chars).collect(), true);
    }

    let mut out: String = s.chars().take(max_chars - marker_len).collect();
    out.push_str(TRUNCATION_MARKER);
    (out, true)
}

/// Strips a trailing `\n` or `\r\n`.
pub fn strip_line_ending(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}
