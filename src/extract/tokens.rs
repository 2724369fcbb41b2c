/// Characters assumed per token by [`estimate_tokens`]
pub const CHARS_PER_TOKEN: usize = 4;

/// Rough token count for `text`: one token per four characters, rounded up
///
/// Not a tokenizer. Treat the result as an order-of-magnitude figure.
///
/// # Examples
///
/// ```
/// use session_explorer::extract::estimate_tokens;
///
/// assert_eq!(estimate_tokens(""), 0);
/// assert_eq!(estimate_tokens("abcde"), 2);
/// ```
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(CHARS_PER_TOKEN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_tokens_rounds_up() {
        assert_eq!(estimate_tokens("a"), 1);
        assert_eq!(estimate_tokens("abcd"), 1);
        assert_eq!(estimate_tokens("abcdefgh"), 2);
        assert_eq!(estimate_tokens("abcdefghi"), 3);
    }

    #[test]
    fn test_estimate_tokens_counts_characters_not_bytes() {
        assert_eq!(estimate_tokens("ééééé"), 2);
        assert_eq!(estimate_tokens("日本語だ"), 1);
    }
}
