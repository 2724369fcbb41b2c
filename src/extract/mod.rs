//! Text heuristics applied to each turn while parsing.
//!
//! All of these are pattern matches tuned to one transcript convention: tool
//! calls written as `[Tool call] Name` blocks inside assistant text. They sit
//! behind [`TranscriptDialect`] so a different convention can be plugged into
//! the parsers without touching them; [`MarkerDialect`] is the built-in one.

pub mod summary;
pub mod tokens;
pub mod tool_calls;

pub use summary::{DEFAULT_SUMMARY_LEN, extract_summary};
pub use tokens::estimate_tokens;
pub use tool_calls::{extract_subagent_invocations, extract_tool_calls};

use crate::models::{SubagentInvocation, ToolCall};

/// Turn-level extraction used by the transcript parsers
pub trait TranscriptDialect {
    fn summarize(&self, text: &str) -> String;

    fn tool_calls(&self, text: &str) -> Vec<ToolCall>;

    fn subagent_invocations(&self, text: &str, turn_index: usize) -> Vec<SubagentInvocation>;

    fn estimate_tokens(&self, text: &str) -> usize {
        estimate_tokens(text)
    }
}

/// `[Tool call]` marker blocks, `Task` delegations, 80-character summaries
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkerDialect;

impl TranscriptDialect for MarkerDialect {
    fn summarize(&self, text: &str) -> String {
        extract_summary(text, DEFAULT_SUMMARY_LEN)
    }

    fn tool_calls(&self, text: &str) -> Vec<ToolCall> {
        extract_tool_calls(text)
    }

    fn subagent_invocations(&self, text: &str, turn_index: usize) -> Vec<SubagentInvocation> {
        extract_subagent_invocations(text, turn_index)
    }
}
