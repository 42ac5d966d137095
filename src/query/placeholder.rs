//! Quote-aware scanning for `?` bind markers.
//!
//! Single and double quotes are tracked independently: each unescaped quote
//! toggles its own state, and a `?` counts as a placeholder only when neither
//! state is open. A backslash escapes the character that follows it.

/// Returns the byte offset of the next unquoted `?` at or after `start`.
///
/// Scanning starts with both quote states closed, so `start` must not lie
/// inside a literal.
pub fn find_placeholder(query: &str, start: usize) -> Option<usize> {
    let bytes = query.as_bytes();
    let mut in_single = false;
    let mut in_double = false;
    let mut i = start;

    while i < bytes.len() {
        match bytes[i] {
            b'\\' => {
                // Skip the escaped character
                i += 1;
            }
            b'\'' => in_single = !in_single,
            b'"' => in_double = !in_double,
            b'?' if !in_single && !in_double => return Some(i),
            _ => {}
        }
        i += 1;
    }

    None
}

/// Counts the unquoted `?` markers in `query`.
pub fn count_placeholders(query: &str) -> usize {
    let mut count = 0;
    let mut pos = 0;
    while let Some(found) = find_placeholder(query, pos) {
        count += 1;
        pos = found + 1;
    }
    count
}

/// Builds a comma-joined run of `n` question marks.
pub fn question_marks(n: usize) -> String {
    vec!["?"; n].join(",")
}
