use std::collections::HashMap;

use crate::models::{
    EdgeKind, GraphEdge, GraphNode, NodeData, NodeKind, Position, Role, SessionData, SessionGraph,
    SessionTurn,
};

fn main_node_id(turn: &SessionTurn) -> String {
    format!("monitor-{}", turn.id)
}

fn cluster_node_id(turn: &SessionTurn) -> String {
    format!("tools-{}", turn.id)
}

/// Subagent ids carry an ordinal per type so repeated types on one turn stay distinct
fn subagent_node_id(turn: &SessionTurn, agent_type: &str, ordinal: usize) -> String {
    format!("sub-{}-{}-{}", turn.id, agent_type, ordinal)
}

/// Distinct tool names of a turn in first-seen order
fn distinct_tool_names(turn: &SessionTurn) -> Vec<&str> {
    let mut names: Vec<&str> = Vec::new();
    for call in &turn.tool_calls {
        if !names.contains(&call.name.as_str()) {
            names.push(&call.name);
        }
    }
    names
}

/// Build presentation nodes and edges for `session`
///
/// Per turn, in session order:
/// 1. a `user`/`agent` node for the turn itself
/// 2. an edge from the previous turn node (animated when this turn is the assistant's)
/// 3. a `tool-cluster` node plus edge when the turn made tool calls
/// 4. a `subagent` node plus edge for each delegation
///
/// Only turn nodes chain to the next turn. Every node starts at the origin;
/// positions come from a [`Layout`](super::Layout) pass.
///
/// # Examples
///
/// ```
/// use session_explorer::graph::build_session_graph;
/// use session_explorer::parsers::parse_text_transcript;
///
/// let session = parse_text_transcript("user: hi\nA: [Tool call] Read\n  path: a\n");
/// let graph = build_session_graph(&session);
/// assert_eq!(graph.nodes.len(), 3);
/// assert_eq!(graph.edges.len(), 2);
/// ```
pub fn build_session_graph(session: &SessionData) -> SessionGraph<'_> {
    let mut nodes = Vec::new();
    let mut edges = Vec::new();
    let mut last_main_id: Option<String> = None;

    for turn in &session.turns {
        let node_id = main_node_id(turn);
        let kind = match turn.role {
            Role::User => NodeKind::User,
            Role::Assistant => NodeKind::Agent,
        };

        nodes.push(GraphNode {
            id: node_id.clone(),
            kind,
            position: Position::default(),
            data: NodeData::Turn { turn },
        });

        if let Some(previous) = &last_main_id {
            edges.push(GraphEdge::new(
                previous,
                &node_id,
                EdgeKind::Sequence,
                turn.role == Role::Assistant,
            ));
        }

        if !turn.tool_calls.is_empty() {
            let cluster_id = cluster_node_id(turn);
            let tool_names = distinct_tool_names(turn);
            let summary = tool_names.join(", ");

            nodes.push(GraphNode {
                id: cluster_id.clone(),
                kind: NodeKind::ToolCluster,
                position: Position::default(),
                data: NodeData::ToolCluster { turn, tool_names, summary },
            });
            edges.push(GraphEdge::new(&node_id, &cluster_id, EdgeKind::ToolCluster, false));
        }

        let mut type_ordinals: HashMap<&str, usize> = HashMap::new();
        for invocation in &turn.subagent_invocations {
            let ordinal = type_ordinals.entry(invocation.agent_type.as_str()).or_insert(0);
            let sub_id = subagent_node_id(turn, &invocation.agent_type, *ordinal);
            *ordinal += 1;

            nodes.push(GraphNode {
                id: sub_id.clone(),
                kind: NodeKind::Subagent,
                position: Position::default(),
                data: NodeData::Subagent {
                    turn,
                    invocation,
                    summary: format!("{}: {}", invocation.agent_type, invocation.description),
                },
            });
            edges.push(GraphEdge::new(&node_id, &sub_id, EdgeKind::Subagent, true));
        }

        last_main_id = Some(node_id);
    }

    SessionGraph { session, nodes, edges }
}
