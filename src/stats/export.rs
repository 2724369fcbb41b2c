use std::fmt;

use chrono::NaiveDate;

use super::summary::SessionSummary;
use crate::models::{ModelId, PricingTable, Role, SessionData};
use crate::utils::{format_cost, format_count};

/// Render a Markdown session analysis
///
/// Everything comes from `session` itself, so no re-parsing is needed.
/// `generated` is printed as the report date.
pub fn render_markdown(
    session: &SessionData,
    model: ModelId,
    pricing: &PricingTable,
    generated: NaiveDate,
) -> String {
    let summary = SessionSummary::new(session, model, pricing);
    MarkdownReport { session, summary: &summary, generated }.to_string()
}

struct MarkdownReport<'a> {
    session: &'a SessionData,
    summary: &'a SessionSummary,
    generated: NaiveDate,
}

impl fmt::Display for MarkdownReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_header(f, self.summary, self.generated)?;
        write_tool_usage(f, self.summary)?;
        write_agent_types(f, self.summary)?;
        write_turns(f, self.session)
    }
}

fn write_header(
    md: &mut fmt::Formatter<'_>,
    summary: &SessionSummary,
    generated: NaiveDate,
) -> fmt::Result {
    writeln!(md, "# Session Analysis\n")?;
    writeln!(md, "**Generated**: {}", generated.format("%Y-%m-%d"))?;
    writeln!(md, "**Model**: {}\n", summary.model_label)?;
    if let Some(duration) = &summary.duration {
        writeln!(md, "**Duration**: {}\n", duration)?;
    }

    writeln!(md, "## Summary\n")?;
    writeln!(md, "| Metric | Value |\n|--------|-------|")?;
    writeln!(md, "| Total Turns | {} |", summary.total_turns)?;
    writeln!(md, "| User Messages | {} |", summary.user_turns)?;
    writeln!(md, "| Agent Turns | {} |", summary.agent_turns)?;
    writeln!(md, "| Estimated Tokens | ~{} |", format_count(summary.total_tokens))?;
    writeln!(md, "| Input Tokens | ~{} |", format_count(summary.input_tokens))?;
    writeln!(md, "| Output Tokens | ~{} |", format_count(summary.output_tokens))?;
    writeln!(md, "| Estimated Cost | {} |", format_cost(summary.estimated_cost))?;
    writeln!(md, "| Tool Calls | {} |", summary.tool_calls)?;
    writeln!(md, "| Subagent Invocations | {} |\n", summary.subagents)
}

fn write_tool_usage(md: &mut fmt::Formatter<'_>, summary: &SessionSummary) -> fmt::Result {
    if summary.tool_usage.is_empty() {
        return Ok(());
    }
    writeln!(md, "## Tool Usage\n")?;
    writeln!(md, "| Tool | Count |\n|------|-------|")?;
    for (name, count) in &summary.tool_usage {
        writeln!(md, "| {} | {} |", name, count)?;
    }
    writeln!(md)
}

fn write_agent_types(md: &mut fmt::Formatter<'_>, summary: &SessionSummary) -> fmt::Result {
    if summary.agent_types.is_empty() {
        return Ok(());
    }
    writeln!(md, "## Subagent Types\n")?;
    for agent_type in &summary.agent_types {
        writeln!(md, "- {}", agent_type)?;
    }
    writeln!(md)
}

fn write_turns(md: &mut fmt::Formatter<'_>, session: &SessionData) -> fmt::Result {
    writeln!(md, "## Turn-by-Turn Flow\n")?;
    for turn in &session.turns {
        let who = match turn.role {
            Role::User => "User",
            Role::Assistant => "Agent",
        };
        writeln!(md, "### Turn {} \u{2014} {}\n", turn.index + 1, who)?;
        writeln!(md, "- **Tokens**: ~{}", format_count(turn.estimated_tokens))?;

        if !turn.tool_calls.is_empty() {
            let names: Vec<&str> = turn.tool_calls.iter().map(|c| c.name.as_str()).collect();
            writeln!(md, "- **Tools**: {}", names.join(", "))?;
        }
        if !turn.subagent_invocations.is_empty() {
            let subagents: Vec<String> = turn
                .subagent_invocations
                .iter()
                .map(|s| format!("{} ({})", s.agent_type, s.description))
                .collect();
            writeln!(md, "- **Subagents**: {}", subagents.join(", "))?;
        }
        writeln!(md, "- **Summary**: {}\n", turn.summary)?;
    }
    Ok(())
}
