//! Session Explorer - Parse agent session transcripts into turns, statistics and graphs
//!
//! This library turns a raw agent session transcript into structured data. It supports:
//!
//! - Parsing JSON-lines records and `user:` / `A:` prefixed plain text
//! - Extracting `[Tool call]` blocks and `Task` subagent delegations from assistant turns
//! - Token and cost estimates against a configurable pricing table
//! - Building a node/edge session graph and laying it out
//! - Markdown export of a session analysis
//!
//! # Example
//!
//! ```
//! use session_explorer::graph::build_session_graph;
//! use session_explorer::parsers::parse_text_transcript;
//! use session_explorer::stats::calculate_cost;
//! use session_explorer::models::ModelId;
//!
//! let session = parse_text_transcript("user: hello there\nA: [Tool call] Read\n  path: a.txt\n");
//! assert_eq!(session.turns.len(), 2);
//! assert_eq!(session.total_tool_calls, 1);
//!
//! let graph = build_session_graph(&session);
//! assert_eq!(graph.nodes.len(), 3);
//!
//! let cost = calculate_cost(session.input_tokens, session.output_tokens, ModelId::Gpt4o);
//! assert!(cost > 0.0);
//! ```

pub mod cli;
pub mod extract;
pub mod graph;
pub mod models;
pub mod parsers;
pub mod stats;
pub mod utils;

// Re-export commonly used types
pub use graph::build_session_graph;
pub use models::{SessionData, SessionGraph, SessionTurn};
pub use parsers::{load_session, parse_jsonl_transcript, parse_text_transcript};
pub use stats::calculate_cost;
