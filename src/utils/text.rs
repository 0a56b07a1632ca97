//! Codepoint-aware text measurement and truncation.
//!
//! Widths in the board listing are counted in Unicode scalar values, never
//! bytes, so multi-byte titles line up and are never cut mid-character.

/// Number of codepoints in `s`
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// `n` spaces
pub fn pad(n: usize) -> String {
    " ".repeat(n)
}

/// Truncate `s` to `size` codepoints, ending with "..." when shortened.
///
/// Strings that already fit are returned unchanged. When `size` is too small
/// to hold the ellipsis the result is `size` dots.
pub fn truncate_with_ellipsis(s: &str, size: usize) -> String {
    if char_len(s) <= size {
        return s.to_string();
    }
    if size < 3 {
        return ".".repeat(size);
    }
    let kept: String = s.chars().take(size - 3).collect();
    format!("{kept}...")
}

/// Clamp a signed width computation to a usable size
pub fn clamp_width(n: isize) -> usize {
    n.max(0) as usize
}

/// Remove SGR escape sequences, leaving the visible text
pub fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\u{1b}' {
            for c in chars.by_ref() {
                if c == 'm' {
                    break;
                }
            }
        } else {
            out.push(c);
        }
    }
    out
}
