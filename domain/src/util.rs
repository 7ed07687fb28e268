//! Shared utility functions.

/// Shorten `s` to at most `max_chars` characters for log output.
///
/// Appends `...` when anything was cut. Counts characters, not bytes, so
/// multi-byte text is never split mid-character.
pub fn preview(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &s[..cut]),
        None => s.to_string(),
    }
}
