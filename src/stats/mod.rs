//! Statistics derived from a parsed session: cost estimates, the overview
//! summary, per-turn timeline shares and the Markdown export.

pub mod cost;
pub mod detail;
pub mod export;
pub mod summary;

pub use cost::{calculate_cost, cost_for};
pub use detail::TurnDetail;
pub use export::render_markdown;
pub use summary::{SessionSummary, TimelineSegment, timeline, tool_usage};
