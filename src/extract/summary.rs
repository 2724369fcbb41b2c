use std::sync::OnceLock;

use regex::Regex;

/// Default label length used by the parsers
pub const DEFAULT_SUMMARY_LEN: usize = 80;

/// Lines shorter than this (after trimming) are not considered meaningful
const MIN_MEANINGFUL_CHARS: usize = 10;

const ELLIPSIS: char = '\u{2026}';

fn markup_tag_re() -> &'static Regex {
    static MARKUP_TAG_RE: OnceLock<Regex> = OnceLock::new();
    MARKUP_TAG_RE.get_or_init(|| Regex::new(r"<[^>]+>").expect("valid markup tag regex"))
}

fn tool_marker_re() -> &'static Regex {
    static TOOL_MARKER_RE: OnceLock<Regex> = OnceLock::new();
    TOOL_MARKER_RE.get_or_init(|| {
        Regex::new(r"\[Tool (?:call|result)\][^\n]*").expect("valid tool marker regex")
    })
}

fn blank_run_re() -> &'static Regex {
    static BLANK_RUN_RE: OnceLock<Regex> = OnceLock::new();
    BLANK_RUN_RE.get_or_init(|| Regex::new(r"\n{2,}").expect("valid blank run regex"))
}

/// Short human-readable label for a turn
///
/// Markup tags and tool call/result marker lines are removed first. The label is
/// the first line with more than ten characters, or the leading `max_len`
/// characters of what is left. Anything longer than `max_len` is cut to
/// `max_len - 1` characters followed by `…`.
///
/// # Examples
///
/// ```
/// use session_explorer::extract::extract_summary;
///
/// let text = "<system>ctx</system>\nPlease refactor the parser module.";
/// assert_eq!(extract_summary(text, 80), "Please refactor the parser module.");
/// ```
pub fn extract_summary(text: &str, max_len: usize) -> String {
    let without_tags = markup_tag_re().replace_all(text, "");
    let without_markers = tool_marker_re().replace_all(&without_tags, "");
    let collapsed = blank_run_re().replace_all(&without_markers, "\n");
    let cleaned = collapsed.trim();

    let base = cleaned
        .lines()
        .map(str::trim)
        .find(|line| line.chars().count() > MIN_MEANINGFUL_CHARS)
        .map(str::to_string)
        .unwrap_or_else(|| cleaned.chars().take(max_len).collect());

    if base.chars().count() > max_len {
        let mut truncated: String = base.chars().take(max_len.saturating_sub(1)).collect();
        truncated.push(ELLIPSIS);
        truncated
    } else {
        base
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_skips_tag_content_and_short_lines() {
        let text = "<tag>ignored</tag>\n\nThis is the real content line that is long enough.\nMore.";
        assert_eq!(
            extract_summary(text, DEFAULT_SUMMARY_LEN),
            "This is the real content line that is long enough."
        );
    }

    #[test]
    fn test_summary_drops_tool_marker_lines() {
        let text = "[Tool call] Read\n  path: /tmp/a.txt\n[Tool result] Read\nThe file contains the config.";
        // the indented argument line survives marker removal and is long enough
        assert_eq!(extract_summary(text, DEFAULT_SUMMARY_LEN), "path: /tmp/a.txt");
    }

    #[test]
    fn test_summary_truncates_with_ellipsis() {
        let text = "a".repeat(100);
        let summary = extract_summary(&text, 20);
        assert_eq!(summary.chars().count(), 20);
        assert!(summary.ends_with('\u{2026}'));
        assert_eq!(&summary[..19], "a".repeat(19));
    }

    #[test]
    fn test_summary_exact_length_is_not_truncated() {
        let text = "b".repeat(80);
        assert_eq!(extract_summary(&text, 80), text);
    }

    #[test]
    fn test_summary_falls_back_to_leading_text() {
        assert_eq!(extract_summary("ok\nyes", DEFAULT_SUMMARY_LEN), "ok\nyes");
        assert_eq!(extract_summary("  hi  ", DEFAULT_SUMMARY_LEN), "hi");
    }

    #[test]
    fn test_summary_of_markup_only_text_is_empty() {
        assert_eq!(extract_summary("<a></a>\n\n<b/>", DEFAULT_SUMMARY_LEN), "");
        assert_eq!(extract_summary("   \n  ", DEFAULT_SUMMARY_LEN), "");
    }

    #[test]
    fn test_summary_collapses_blank_runs_before_selection() {
        let text = "hey\n\n\n\nshort\n\n\nA considerably longer line here";
        assert_eq!(extract_summary(text, DEFAULT_SUMMARY_LEN), "A considerably longer line here");
    }
}
