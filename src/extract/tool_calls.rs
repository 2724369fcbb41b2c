//! Marker-block scanning for tool calls embedded in assistant text.
//!
//! A call block is a `[Tool call] <Name>` line followed by zero or more
//! argument lines indented by at least two spaces or a tab:
//!
//! ```text
//! [Tool call] Read
//!   path: /tmp/a.txt
//!   limit: 40
//! ```
//!
//! The block ends at the first line that is not an indented `key: value` pair,
//! blank lines included. Names and keys are ASCII word characters; `\r\n`
//! line endings are accepted.

use std::sync::OnceLock;

use indexmap::IndexMap;
use regex::Regex;

use crate::models::{SubagentInvocation, ToolCall};

/// Tool name that represents delegating work to a nested agent
pub const SUBAGENT_TOOL: &str = "Task";

/// Subagent type used when the call names none
pub const DEFAULT_SUBAGENT_TYPE: &str = "generalPurpose";

/// Subagent description used when the call gives none
pub const DEFAULT_SUBAGENT_DESCRIPTION: &str = "Subagent task";

fn call_block_re() -> &'static Regex {
    static CALL_BLOCK_RE: OnceLock<Regex> = OnceLock::new();
    CALL_BLOCK_RE.get_or_init(|| {
        Regex::new(
            r"\[Tool call\][ \t]+([A-Za-z0-9_]+)\r?\n((?:(?: {2,}|\t)[ \t]*[A-Za-z0-9_]+:[^\r\n]*(?:\r?\n|$))*)",
        )
        .expect("valid call block regex")
    })
}

fn arg_line_re() -> &'static Regex {
    static ARG_LINE_RE: OnceLock<Regex> = OnceLock::new();
    ARG_LINE_RE.get_or_init(|| {
        Regex::new(r"^([A-Za-z0-9_]+):\s*(.+)$").expect("valid argument line regex")
    })
}

/// Split an argument block into `key -> value` pairs in encounter order
///
/// Lines that are not `key: value` are ignored. A repeated key keeps its first
/// position and takes the last value.
fn parse_args(block: &str) -> IndexMap<String, String> {
    let mut args = IndexMap::new();
    for line in block.split('\n') {
        if let Some(caps) = arg_line_re().captures(line.trim()) {
            args.insert(caps[1].to_string(), caps[2].to_string());
        }
    }
    args
}

fn call_blocks(text: &str) -> impl Iterator<Item = ToolCall> + '_ {
    call_block_re().captures_iter(text).map(|caps| ToolCall {
        name: caps[1].to_string(),
        args: caps.get(2).map(|m| parse_args(m.as_str())).unwrap_or_default(),
    })
}

/// Every tool call block in `text`, in order of appearance
///
/// Callers only pass assistant text; the role is not inspected here.
///
/// # Examples
///
/// ```
/// use session_explorer::extract::extract_tool_calls;
///
/// let calls = extract_tool_calls("[Tool call] Read\n  path: /tmp/a.txt\n");
/// assert_eq!(calls.len(), 1);
/// assert_eq!(calls[0].name, "Read");
/// assert_eq!(calls[0].args["path"], "/tmp/a.txt");
/// ```
pub fn extract_tool_calls(text: &str) -> Vec<ToolCall> {
    call_blocks(text).collect()
}

/// Delegation blocks (calls to [`SUBAGENT_TOOL`]) in `text`, tagged with `turn_index`
///
/// These blocks are also returned by [`extract_tool_calls`]; the two lists overlap.
pub fn extract_subagent_invocations(text: &str, turn_index: usize) -> Vec<SubagentInvocation> {
    call_blocks(text)
        .filter(|call| call.name == SUBAGENT_TOOL)
        .map(|mut call| SubagentInvocation {
            agent_type: call
                .args
                .shift_remove("subagent_type")
                .unwrap_or_else(|| DEFAULT_SUBAGENT_TYPE.to_string()),
            description: call
                .args
                .shift_remove("description")
                .unwrap_or_else(|| DEFAULT_SUBAGENT_DESCRIPTION.to_string()),
            model: call.args.shift_remove("model"),
            turn_index,
        })
        .collect()
}
