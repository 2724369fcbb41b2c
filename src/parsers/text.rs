use tracing::debug;

use super::SessionAssembler;
use crate::extract::{MarkerDialect, TranscriptDialect};
use crate::models::{Role, SessionData};

const USER_PREFIX: &str = "user:";
const ASSISTANT_PREFIX: &str = "A:";

fn starts_turn(line: &str) -> bool {
    line.starts_with(USER_PREFIX) || line.starts_with(ASSISTANT_PREFIX)
}

/// Split `content` into blocks, each beginning at a line that starts a turn
///
/// Text before the first turn line forms its own leading block.
fn split_blocks(content: &str) -> Vec<&str> {
    let mut blocks = Vec::new();
    let mut start = 0;
    let mut offset = 0;

    for line in content.split_inclusive('\n') {
        if offset > start && starts_turn(line) {
            blocks.push(&content[start..offset]);
            start = offset;
        }
        offset += line.len();
    }
    if start < content.len() {
        blocks.push(&content[start..]);
    }
    blocks
}

fn read_block(block: &str) -> Option<(Role, &str)> {
    let trimmed = block.trim();
    if let Some(rest) = trimmed.strip_prefix(USER_PREFIX) {
        Some((Role::User, rest.trim()))
    } else if let Some(rest) = trimmed.strip_prefix(ASSISTANT_PREFIX) {
        Some((Role::Assistant, rest.trim()))
    } else {
        None
    }
}

/// Parse a plain-text transcript with the built-in [`MarkerDialect`]
///
/// A turn starts at every line beginning with `user:` (user) or `A:`
/// (assistant), case-sensitive and without leading whitespace, and runs to the
/// next such line. Blocks that are blank after removing the prefix are dropped.
///
/// # Examples
///
/// ```
/// use session_explorer::parsers::parse_text_transcript;
///
/// let session = parse_text_transcript("user: hello\nA: hi back");
/// assert_eq!(session.turns.len(), 2);
/// assert_eq!(session.turns[1].text, "hi back");
/// ```
pub fn parse_text_transcript(content: &str) -> SessionData {
    parse_text_transcript_with(content, &MarkerDialect)
}

/// [`parse_text_transcript`] with a caller-supplied extraction dialect
pub fn parse_text_transcript_with<D>(content: &str, dialect: &D) -> SessionData
where
    D: TranscriptDialect + ?Sized,
{
    let mut assembler = SessionAssembler::new(dialect);

    for (block_num, block) in split_blocks(content).into_iter().enumerate() {
        match read_block(block) {
            Some((_, text)) if text.is_empty() => {
                debug!(block = block_num, "Skipping empty turn");
            }
            Some((role, text)) => assembler.push(role, text.to_string(), None),
            None if block.trim().is_empty() => {}
            None => debug!(block = block_num, "Skipping text outside any turn"),
        }
    }

    assembler.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_and_assistant_turns_with_tool_call() {
        let session = parse_text_transcript("user: hello\nA: [Tool call] Read\n  path: x.txt\nhi back");

        assert_eq!(session.turns.len(), 2);
        assert_eq!(session.turns[0].role, Role::User);
        assert_eq!(session.turns[0].text, "hello");
        assert_eq!(session.turns[1].role, Role::Assistant);
        assert_eq!(session.turns[1].tool_calls.len(), 1);
        assert_eq!(session.turns[1].tool_calls[0].name, "Read");
        assert_eq!(session.turns[1].tool_calls[0].args["path"], "x.txt");
    }

    #[test]
    fn test_multiline_turn_bodies() {
        let session = parse_text_transcript("user: first line\nsecond line\n\nA: reply\nmore reply\n");

        assert_eq!(session.turns[0].text, "first line\nsecond line");
        assert_eq!(session.turns[1].text, "reply\nmore reply");
    }

    #[test]
    fn test_preamble_and_indented_prefixes_are_not_turns() {
        let content = "Transcript exported today\nuser: question\n  A: not a new turn\nA: answer";
        let session = parse_text_transcript(content);

        assert_eq!(session.turns.len(), 2);
        assert_eq!(session.turns[0].text, "question\n  A: not a new turn");
        assert_eq!(session.turns[1].text, "answer");
    }

    #[test]
    fn test_prefixes_are_case_sensitive() {
        let session = parse_text_transcript("User: ignored\nuser: kept\na: part of kept");
        assert_eq!(session.turns.len(), 1);
        assert_eq!(session.turns[0].text, "kept\na: part of kept");
    }

    #[test]
    fn test_empty_turns_are_skipped_and_indices_stay_dense() {
        let session = parse_text_transcript("user:\nA:   \nuser: real\nA: also real");

        assert_eq!(session.turns.len(), 2);
        assert_eq!(session.turns[0].index, 0);
        assert_eq!(session.turns[1].index, 1);
        assert_eq!(session.turns[1].role, Role::Assistant);
    }

    #[test]
    fn test_empty_and_whitespace_input() {
        assert!(parse_text_transcript("").is_empty());
        assert!(parse_text_transcript("  \n\n\t").is_empty());
    }

    #[test]
    fn test_split_blocks_boundaries() {
        assert_eq!(split_blocks("user: a\nA: b\n"), vec!["user: a\n", "A: b\n"]);
        assert_eq!(split_blocks("intro\nuser: a"), vec!["intro\n", "user: a"]);
        assert!(split_blocks("").is_empty());
    }

    #[test]
    fn test_crlf_transcript_keeps_tool_calls() {
        let session = parse_text_transcript(
            "user: hi\r\nA: [Tool call] Read\r\n  path: x.txt\r\n[Tool call] Task\r\n  subagent_type: explore\r\nok",
        );

        assert_eq!(session.turns.len(), 2);
        assert_eq!(session.turns[0].text, "hi");
        let calls = &session.turns[1].tool_calls;
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].args["path"], "x.txt");
        assert_eq!(session.turns[1].subagent_invocations[0].agent_type, "explore");
    }
}
