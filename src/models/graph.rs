use serde::Serialize;

use super::session::{SessionData, SessionTurn, SubagentInvocation};

/// Top-left coordinate assigned by a layout pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    User,
    Agent,
    ToolCluster,
    Subagent,
}

/// What a node stands for. Each variant borrows only the parts of the session it shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum NodeData<'a> {
    /// A transcript turn
    Turn { turn: &'a SessionTurn },
    /// All tool calls of one turn, labelled by their distinct names
    #[serde(rename_all = "camelCase")]
    ToolCluster { turn: &'a SessionTurn, tool_names: Vec<&'a str>, summary: String },
    /// One delegation to a nested agent
    Subagent { turn: &'a SessionTurn, invocation: &'a SubagentInvocation, summary: String },
}

impl<'a> NodeData<'a> {
    /// The turn this node was derived from
    pub fn turn(&self) -> &'a SessionTurn {
        match self {
            NodeData::Turn { turn }
            | NodeData::ToolCluster { turn, .. }
            | NodeData::Subagent { turn, .. } => turn,
        }
    }

    /// Display label: the turn summary for main nodes, the overridden one otherwise
    pub fn summary(&self) -> &str {
        match self {
            NodeData::Turn { turn } => &turn.summary,
            NodeData::ToolCluster { summary, .. } | NodeData::Subagent { summary, .. } => summary,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphNode<'a> {
    pub id: String,
    pub kind: NodeKind,
    pub position: Position,
    pub data: NodeData<'a>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EdgeKind {
    /// Consecutive main turns
    Sequence,
    ToolCluster,
    Subagent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub kind: EdgeKind,
    /// Presentation hint only
    pub animated: bool,
}

impl GraphEdge {
    pub fn new(source: &str, target: &str, kind: EdgeKind, animated: bool) -> Self {
        Self {
            id: format!("e-{}-{}", source, target),
            source: source.to_string(),
            target: target.to_string(),
            kind,
            animated,
        }
    }
}

/// Nodes and edges derived from one session. Rebuilt whenever the session changes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionGraph<'a> {
    #[serde(skip)]
    pub session: &'a SessionData,
    pub nodes: Vec<GraphNode<'a>>,
    pub edges: Vec<GraphEdge>,
}

impl<'a> SessionGraph<'a> {
    pub fn node(&self, id: &str) -> Option<&GraphNode<'a>> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn count_kind(&self, kind: NodeKind) -> usize {
        self.nodes.iter().filter(|n| n.kind == kind).count()
    }
}
