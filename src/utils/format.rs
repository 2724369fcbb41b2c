use chrono::TimeDelta;

/// Integer with comma thousands separators: `1234567` -> `"1,234,567"`
pub fn format_count(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Dollar amount rounded to cents
pub fn format_cost(cost: f64) -> String {
    format!("${:.2}", cost)
}

/// Compact elapsed time: `"1h 02m 03s"`, `"4m 05s"` or `"12s"`
pub fn format_duration(delta: TimeDelta) -> String {
    let total = delta.num_seconds().max(0);
    let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);

    if hours > 0 {
        format!("{}h {:02}m {:02}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {:02}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

/// First `max_chars` characters of `text`, and how many characters were cut
pub fn truncate_chars(text: &str, max_chars: usize) -> (&str, usize) {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => (&text[..byte_idx], text[byte_idx..].chars().count()),
        None => (text, 0),
    }
}

/// `text` cut to `max_chars` characters with `…` appended when anything was removed
pub fn ellipsize(text: &str, max_chars: usize) -> String {
    match truncate_chars(text, max_chars) {
        (head, 0) => head.to_string(),
        (head, _) => format!("{}\u{2026}", head),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(1234567), "1,234,567");
        assert_eq!(format_count(100000), "100,000");
    }

    #[test]
    fn test_format_cost() {
        assert_eq!(format_cost(0.0), "$0.00");
        assert_eq!(format_cost(1.005_1), "$1.01");
        assert_eq!(format_cost(12.3), "$12.30");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(TimeDelta::seconds(12)), "12s");
        assert_eq!(format_duration(TimeDelta::seconds(245)), "4m 05s");
        assert_eq!(format_duration(TimeDelta::seconds(3723)), "1h 02m 03s");
        assert_eq!(format_duration(TimeDelta::seconds(-5)), "0s");
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("hello", 10), ("hello", 0));
        assert_eq!(truncate_chars("hello", 2), ("he", 3));
        assert_eq!(truncate_chars("héllo", 2), ("hé", 3));
    }

    #[test]
    fn test_ellipsize() {
        assert_eq!(ellipsize("short", 80), "short");
        assert_eq!(ellipsize("abcdef", 3), "abc\u{2026}");
    }
}
