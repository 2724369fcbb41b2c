use std::fmt;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Who produced a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }

    /// Parse the role names used by transcript records. Anything else is rejected.
    pub fn from_record(value: &str) -> Option<Self> {
        match value {
            "user" => Some(Role::User),
            "assistant" => Some(Role::Assistant),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One invocation of a named tool recorded inside an assistant turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    pub name: String,
    pub args: IndexMap<String, String>,
}

/// A turn handing a sub-task to a nested agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubagentInvocation {
    #[serde(rename = "type")]
    pub agent_type: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub turn_index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionTurn {
    pub id: String,
    pub index: usize,
    pub role: Role,
    pub text: String,
    pub summary: String,
    pub tool_calls: Vec<ToolCall>,
    pub subagent_invocations: Vec<SubagentInvocation>,
    pub estimated_tokens: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl SessionTurn {
    /// Stable key for the turn at `index`
    pub fn id_for(index: usize) -> String {
        format!("turn-{}", index)
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }
}

/// Parsed transcript plus aggregate statistics
///
/// Invariants (established by [`SessionData::from_turns`]):
/// - `turns[i].index == i`
/// - `total_tokens == input_tokens + output_tokens`
/// - `total_tool_calls` and `total_subagents` are the sums over all turns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionData {
    pub id: String,
    pub turns: Vec<SessionTurn>,
    pub total_tokens: usize,
    pub input_tokens: usize,
    pub output_tokens: usize,
    pub total_tool_calls: usize,
    pub total_subagents: usize,
    pub agent_types: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
}

impl SessionData {
    /// Build a session from fully assembled turns, computing every aggregate field
    pub fn from_turns(id: String, turns: Vec<SessionTurn>) -> Self {
        let mut input_tokens = 0;
        let mut output_tokens = 0;
        let mut total_tool_calls = 0;
        let mut total_subagents = 0;
        let mut agent_types: Vec<String> = Vec::new();

        for turn in &turns {
            match turn.role {
                Role::User => input_tokens += turn.estimated_tokens,
                Role::Assistant => output_tokens += turn.estimated_tokens,
            }
            total_tool_calls += turn.tool_calls.len();
            total_subagents += turn.subagent_invocations.len();

            for invocation in &turn.subagent_invocations {
                if !agent_types.contains(&invocation.agent_type) {
                    agent_types.push(invocation.agent_type.clone());
                }
            }
        }

        let duration = session_span(&turns).map(crate::utils::format::format_duration);

        Self {
            id,
            turns,
            total_tokens: input_tokens + output_tokens,
            input_tokens,
            output_tokens,
            total_tool_calls,
            total_subagents,
            agent_types,
            duration,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn user_turns(&self) -> usize {
        self.turns.iter().filter(|t| t.is_user()).count()
    }

    pub fn agent_turns(&self) -> usize {
        self.turns.iter().filter(|t| !t.is_user()).count()
    }

    /// Look up a turn by its zero-based index
    pub fn turn(&self, index: usize) -> Option<&SessionTurn> {
        self.turns.get(index)
    }
}

/// Elapsed time between the earliest and latest timestamped turns
fn session_span(turns: &[SessionTurn]) -> Option<chrono::TimeDelta> {
    let mut stamps = turns.iter().filter_map(|t| t.timestamp);
    let first = stamps.next()?;
    let second = stamps.next()?;
    let (min, max) = stamps
        .fold((first.min(second), first.max(second)), |(lo, hi), ts| (lo.min(ts), hi.max(ts)));
    Some(max - min)
}
