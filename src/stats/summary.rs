use indexmap::IndexMap;
use serde::Serialize;

use crate::models::{ModelId, PricingTable, Role, SessionData};

/// Session overview shown next to the graph
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub model: ModelId,
    pub model_label: String,
    pub total_turns: usize,
    pub user_turns: usize,
    pub agent_turns: usize,
    pub total_tokens: usize,
    pub input_tokens: usize,
    pub output_tokens: usize,
    pub estimated_cost: f64,
    pub tool_calls: usize,
    pub subagents: usize,
    /// `(tool name, calls)`, most used first
    pub tool_usage: Vec<(String, usize)>,
    pub agent_types: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
}

impl SessionSummary {
    pub fn new(session: &SessionData, model: ModelId, pricing: &PricingTable) -> Self {
        Self {
            model,
            model_label: pricing.get(model).label.clone(),
            total_turns: session.turns.len(),
            user_turns: session.user_turns(),
            agent_turns: session.agent_turns(),
            total_tokens: session.total_tokens,
            input_tokens: session.input_tokens,
            output_tokens: session.output_tokens,
            estimated_cost: pricing.cost(session.input_tokens, session.output_tokens, model),
            tool_calls: session.total_tool_calls,
            subagents: session.total_subagents,
            tool_usage: tool_usage(session),
            agent_types: session.agent_types.clone(),
            duration: session.duration.clone(),
        }
    }
}

/// Calls per tool name, sorted by count descending; ties keep first-seen order
pub fn tool_usage(session: &SessionData) -> Vec<(String, usize)> {
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for call in session.turns.iter().flat_map(|t| &t.tool_calls) {
        *counts.entry(call.name.as_str()).or_insert(0) += 1;
    }

    let mut usage: Vec<(String, usize)> =
        counts.into_iter().map(|(name, count)| (name.to_string(), count)).collect();
    usage.sort_by(|a, b| b.1.cmp(&a.1));
    usage
}

/// One turn's share of the session's tokens
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineSegment {
    pub turn_index: usize,
    pub role: Role,
    pub fraction: f64,
}

/// Token share per turn, in session order
pub fn timeline(session: &SessionData) -> Vec<TimelineSegment> {
    let total = session.total_tokens.max(1) as f64;
    session
        .turns
        .iter()
        .map(|turn| TimelineSegment {
            turn_index: turn.index,
            role: turn.role,
            fraction: turn.estimated_tokens as f64 / total,
        })
        .collect()
}
