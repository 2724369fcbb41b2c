//! Terminal output sanitization.
//!
//! Transcript text is user-controlled. Before it is printed, escape sequences
//! that could move the cursor, recolor the terminal or rewrite the window title
//! are removed. Command output that only shows counts does not need this; every
//! command that echoes turn text or summaries does.

use std::sync::OnceLock;

use regex::Regex;

fn escape_sequence_re() -> &'static Regex {
    static ESCAPE_SEQUENCE_RE: OnceLock<Regex> = OnceLock::new();
    ESCAPE_SEQUENCE_RE.get_or_init(|| {
        // CSI (ESC [ ... final byte) and OSC (ESC ] ... BEL or ESC \)
        Regex::new(r"\x1b\[[0-?]*[ -/]*[@-~]|\x1b\][^\x07\x1b]*(?:\x07|\x1b\\)?")
            .expect("valid escape sequence regex")
    })
}

/// Remove ANSI escape sequences and control characters other than tab, newline and CR
///
/// # Examples
///
/// ```
/// use session_explorer::utils::terminal::strip_ansi_codes;
///
/// assert_eq!(strip_ansi_codes("\x1b[31mRed\x1b[0m text"), "Red text");
/// ```
pub fn strip_ansi_codes(text: &str) -> String {
    escape_sequence_re()
        .replace_all(text, "")
        .chars()
        .filter(|&ch| !ch.is_control() || matches!(ch, '\t' | '\n' | '\r'))
        .collect()
}

/// Sanitized text squeezed onto one line, for tabular listings
pub fn single_line(text: &str) -> String {
    strip_ansi_codes(text).split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_color_and_cursor_sequences() {
        assert_eq!(strip_ansi_codes("\x1b[1m\x1b[31mBold\x1b[0m"), "Bold");
        assert_eq!(strip_ansi_codes("\x1b[2J\x1b[H cleared"), " cleared");
    }

    #[test]
    fn test_strip_window_title_sequence() {
        assert_eq!(strip_ansi_codes("\x1b]0;pwned\x07after"), "after");
        assert_eq!(strip_ansi_codes("\x1b]2;title\x1b\\after"), "after");
    }

    #[test]
    fn test_strip_control_characters_keeps_layout() {
        assert_eq!(strip_ansi_codes("bell\x07 back\x08"), "bell back");
        assert_eq!(strip_ansi_codes("a\tb\nc\rd"), "a\tb\nc\rd");
    }

    #[test]
    fn test_unicode_passes_through() {
        assert_eq!(strip_ansi_codes("Hello 👋 \x1b[32mWorld\x1b[0m"), "Hello 👋 World");
    }

    #[test]
    fn test_single_line() {
        assert_eq!(single_line("  first\n\nsecond\t third "), "first second third");
        assert_eq!(single_line(""), "");
    }
}
