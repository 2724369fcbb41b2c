use std::fmt;

use serde::Serialize;

use crate::models::{Role, SessionTurn, SubagentInvocation};
use crate::utils::{ellipsize, format_count, truncate_chars};

pub const MAX_TEXT_CHARS: usize = 2000;
pub const MAX_ARGS_SHOWN: usize = 5;
pub const MAX_ARG_VALUE_CHARS: usize = 80;

/// Tool call as shown in the turn detail: arguments capped and shortened
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallView {
    pub name: String,
    pub args: Vec<(String, String)>,
    /// Arguments beyond the display cap
    pub hidden_args: usize,
}

/// Display-ready view of one turn
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnDetail<'a> {
    pub number: usize,
    pub role: Role,
    pub estimated_tokens: usize,
    pub text: &'a str,
    /// Characters cut from `text`
    pub truncated_chars: usize,
    pub tool_calls: Vec<ToolCallView>,
    pub subagents: &'a [SubagentInvocation],
}

impl<'a> TurnDetail<'a> {
    pub fn new(turn: &'a SessionTurn) -> Self {
        let (text, truncated_chars) = truncate_chars(&turn.text, MAX_TEXT_CHARS);

        let tool_calls = turn
            .tool_calls
            .iter()
            .map(|call| ToolCallView {
                name: call.name.clone(),
                args: call
                    .args
                    .iter()
                    .take(MAX_ARGS_SHOWN)
                    .map(|(k, v)| (k.clone(), ellipsize(v, MAX_ARG_VALUE_CHARS)))
                    .collect(),
                hidden_args: call.args.len().saturating_sub(MAX_ARGS_SHOWN),
            })
            .collect();

        Self {
            number: turn.index + 1,
            role: turn.role,
            estimated_tokens: turn.estimated_tokens,
            text,
            truncated_chars,
            tool_calls,
            subagents: &turn.subagent_invocations,
        }
    }
}

impl fmt::Display for TurnDetail<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let who = match self.role {
            Role::User => "User",
            Role::Assistant => "Agent",
        };
        writeln!(f, "Turn {} ({}) ~{} tokens", self.number, who, format_count(self.estimated_tokens))?;
        writeln!(f)?;
        writeln!(f, "{}", self.text)?;
        if self.truncated_chars > 0 {
            writeln!(f, "\n[... {} more characters]", format_count(self.truncated_chars))?;
        }

        if !self.tool_calls.is_empty() {
            writeln!(f, "\nTool calls ({}):", self.tool_calls.len())?;
            for call in &self.tool_calls {
                writeln!(f, "  {}", call.name)?;
                for (key, value) in &call.args {
                    writeln!(f, "    {}: {}", key, value)?;
                }
                if call.hidden_args > 0 {
                    writeln!(f, "    (+{} more)", call.hidden_args)?;
                }
            }
        }

        if !self.subagents.is_empty() {
            writeln!(f, "\nSubagents ({}):", self.subagents.len())?;
            for sub in self.subagents {
                writeln!(f, "  {}: {}", sub.agent_type, sub.description)?;
                if let Some(model) = &sub.model {
                    writeln!(f, "    model: {}", model)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::parse_text_transcript;

    #[test]
    fn test_long_text_is_truncated_with_remaining_count() {
        let session = parse_text_transcript(&format!("user: {}", "a".repeat(3500)));
        let detail = TurnDetail::new(&session.turns[0]);

        assert_eq!(detail.text.chars().count(), MAX_TEXT_CHARS);
        assert_eq!(detail.truncated_chars, 1500);
        assert!(detail.to_string().contains("[... 1,500 more characters]"));
    }

    #[test]
    fn test_short_text_is_untouched() {
        let session = parse_text_transcript("user: short message");
        let detail = TurnDetail::new(&session.turns[0]);

        assert_eq!(detail.text, "short message");
        assert_eq!(detail.truncated_chars, 0);
        assert_eq!(detail.number, 1);
        assert!(!detail.to_string().contains("more characters"));
    }

    #[test]
    fn test_tool_args_capped_and_shortened() {
        let long = "v".repeat(100);
        let text = format!(
            "A: [Tool call] Edit\n  a: 1\n  b: 2\n  c: {}\n  d: 4\n  e: 5\n  f: 6\n  g: 7\n",
            long
        );
        let session = parse_text_transcript(&text);
        let detail = TurnDetail::new(&session.turns[0]);
        let call = &detail.tool_calls[0];

        assert_eq!(call.args.len(), MAX_ARGS_SHOWN);
        assert_eq!(call.hidden_args, 2);
        assert_eq!(call.args[2].1, format!("{}\u{2026}", "v".repeat(80)));
        assert_eq!(call.args[4], ("e".to_string(), "5".to_string()));
    }

    #[test]
    fn test_subagent_model_is_shown_when_present() {
        let session = parse_text_transcript(
            "A: [Tool call] Task\n  subagent_type: explore\n  description: scan\n  model: fast\n\
             [Tool call] Task\n  description: other\n",
        );
        let rendered = TurnDetail::new(&session.turns[0]).to_string();

        assert!(rendered.contains("Turn 1 (Agent)"));
        assert!(rendered.contains("  explore: scan\n    model: fast\n"));
        assert!(rendered.contains("  generalPurpose: other\n"));
        assert_eq!(rendered.matches("model:").count(), 1);
    }
}
