//! Data models for parsed agent sessions.
//!
//! - [`SessionData`] / [`SessionTurn`] - the parsed transcript and its aggregates
//! - [`ToolCall`] / [`SubagentInvocation`] - structures recovered from assistant text
//! - [`SessionGraph`] - presentation nodes and edges built from a session
//! - [`PricingTable`] / [`ModelId`] - per-model token prices used for cost estimates
//!
//! Everything serializes with camelCase field names so JSON output matches the
//! shape consumed by graph renderers.

pub mod graph;
pub mod pricing;
pub mod session;

pub use graph::{EdgeKind, GraphEdge, GraphNode, NodeData, NodeKind, Position, SessionGraph};
pub use pricing::{ModelId, ModelPricing, PricingTable};
pub use session::{Role, SessionData, SessionTurn, SubagentInvocation, ToolCall};
