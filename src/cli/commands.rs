use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::{ArgAction, Args, Parser, Subcommand};
use serde::Serialize;

use crate::graph::{Direction, LayeredLayout, Layout, LayoutOptions, build_session_graph};
use crate::models::{ModelId, PricingTable, Role};
use crate::parsers::{LoadedSession, TranscriptFormat, load_session, load_sessions};
use crate::stats::{SessionSummary, TurnDetail, render_markdown, timeline};
use crate::utils::{
    collect_transcript_files, default_export_filename, format_cost, format_count,
    format_path_with_tilde, single_line, strip_ansi_codes,
};

#[derive(Parser)]
#[command(name = "session-explorer")]
#[command(version = "0.1.0")]
#[command(about = "Inspect agent session transcripts: turns, tool calls, subagents and cost", long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show an overview of one or more transcripts (directories are scanned)
    Stats {
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        #[command(flatten)]
        pricing: PricingArgs,

        #[command(flatten)]
        input: InputArgs,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Write a Markdown session analysis
    Export {
        file: PathBuf,

        /// Output file, or a directory for the default file name (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        pricing: PricingArgs,

        #[command(flatten)]
        input: InputArgs,
    },
    /// Print the laid-out session graph as JSON
    Graph {
        file: PathBuf,

        #[command(flatten)]
        layout: LayoutArgs,

        #[command(flatten)]
        input: InputArgs,
    },
    /// List turns with token share and summary
    Turns {
        file: PathBuf,

        #[command(flatten)]
        input: InputArgs,
    },
    /// Show the full detail of one turn
    Show {
        file: PathBuf,

        /// Turn number, starting at 1
        turn: usize,

        #[command(flatten)]
        input: InputArgs,
    },
    /// List model prices used for cost estimates
    Models {
        /// JSON file overriding built-in prices
        #[arg(long)]
        pricing: Option<PathBuf>,

        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
pub struct PricingArgs {
    /// Model used for cost estimates
    #[arg(long, value_enum, env = "SESSION_EXPLORER_MODEL", default_value_t = ModelId::default())]
    pub model: ModelId,

    /// JSON file overriding built-in prices
    #[arg(long)]
    pub pricing: Option<PathBuf>,
}

impl PricingArgs {
    fn table(&self) -> Result<PricingTable> {
        load_pricing(self.pricing.as_deref())
    }
}

#[derive(Args)]
pub struct InputArgs {
    /// Transcript format (detected when omitted)
    #[arg(long, value_enum)]
    pub format: Option<TranscriptFormat>,
}

#[derive(Args)]
pub struct LayoutArgs {
    #[arg(long, value_enum, default_value_t = Direction::LeftRight)]
    pub direction: Direction,

    #[arg(long, default_value_t = 180.0)]
    pub node_width: f64,

    #[arg(long, default_value_t = 60.0)]
    pub node_height: f64,

    /// Gap between nodes in the same rank
    #[arg(long, default_value_t = 60.0)]
    pub node_sep: f64,

    /// Gap between ranks
    #[arg(long, default_value_t = 250.0)]
    pub rank_sep: f64,
}

impl From<&LayoutArgs> for LayoutOptions {
    fn from(args: &LayoutArgs) -> Self {
        LayoutOptions {
            direction: args.direction,
            node_width: args.node_width,
            node_height: args.node_height,
            node_sep: args.node_sep,
            rank_sep: args.rank_sep,
            ..LayoutOptions::default()
        }
    }
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Stats { paths, pricing, input, json }) => {
            show_stats(&paths, &pricing, input.format, json)?;
        }
        Some(Commands::Export { file, output, pricing, input }) => {
            export_session(&file, output.as_deref(), &pricing, input.format)?;
        }
        Some(Commands::Graph { file, layout, input }) => {
            print_graph(&file, &LayoutOptions::from(&layout), input.format)?;
        }
        Some(Commands::Turns { file, input }) => {
            list_turns(&file, input.format)?;
        }
        Some(Commands::Show { file, turn, input }) => {
            show_turn(&file, turn, input.format)?;
        }
        Some(Commands::Models { pricing, json }) => {
            list_models(pricing.as_deref(), json)?;
        }
        None => {
            println!("Use --help for usage information");
        }
    }

    Ok(())
}

fn load_pricing(path: Option<&Path>) -> Result<PricingTable> {
    match path {
        Some(path) => PricingTable::from_json_file(path),
        None => Ok(PricingTable::default()),
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatsReport {
    path: String,
    format: TranscriptFormat,
    session_id: String,
    #[serde(flatten)]
    summary: SessionSummary,
}

fn show_stats(
    paths: &[PathBuf],
    pricing: &PricingArgs,
    format: Option<TranscriptFormat>,
    json: bool,
) -> Result<()> {
    let table = pricing.table()?;
    let files = collect_transcript_files(paths)?;
    if files.is_empty() {
        bail!("No transcript files found");
    }

    let mut reports = Vec::new();
    let mut failures = 0;
    for (_, result) in load_sessions(&files, format) {
        match result {
            Ok(loaded) => reports.push(StatsReport {
                path: format_path_with_tilde(&loaded.path),
                format: loaded.format,
                summary: SessionSummary::new(&loaded.session, pricing.model, &table),
                session_id: loaded.session.id,
            }),
            Err(e) => {
                failures += 1;
                eprintln!("Error: {:#}", e);
            }
        }
    }

    if reports.is_empty() {
        bail!("None of the {} transcript(s) could be loaded", failures);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    for (i, report) in reports.iter().enumerate() {
        if i > 0 {
            println!();
        }
        print_stats_report(report);
    }
    Ok(())
}

fn print_stats_report(report: &StatsReport) {
    let s = &report.summary;

    println!("{} ({})", report.path, report.format);
    println!("================================");
    println!("Turns: {} ({} user, {} agent)", s.total_turns, s.user_turns, s.agent_turns);
    println!(
        "Estimated tokens: ~{} (input ~{}, output ~{})",
        format_count(s.total_tokens),
        format_count(s.input_tokens),
        format_count(s.output_tokens)
    );
    println!("Estimated cost: {} ({})", format_cost(s.estimated_cost), s.model_label);
    println!("Tool calls: {}", s.tool_calls);
    println!("Subagent invocations: {}", s.subagents);

    if let Some(duration) = &s.duration {
        println!("Duration: {}", duration);
    }
    if !s.tool_usage.is_empty() {
        let top: Vec<String> = s
            .tool_usage
            .iter()
            .take(5)
            .map(|(name, count)| format!("{} ({})", single_line(name), count))
            .collect();
        println!("Top tools: {}", top.join(", "));
    }
    if !s.agent_types.is_empty() {
        let types: Vec<String> = s.agent_types.iter().map(|t| single_line(t)).collect();
        println!("Subagent types: {}", types.join(", "));
    }
}

fn export_session(
    file: &Path,
    output: Option<&Path>,
    pricing: &PricingArgs,
    format: Option<TranscriptFormat>,
) -> Result<()> {
    let table = pricing.table()?;
    let loaded = load_session(file, format)?;
    let today = Utc::now().date_naive();
    let markdown =
        strip_ansi_codes(&render_markdown(&loaded.session, pricing.model, &table, today));

    match output {
        None => print!("{}", markdown),
        Some(target) => {
            let target = if target.is_dir() {
                target.join(default_export_filename(today))
            } else {
                target.to_path_buf()
            };
            fs::write(&target, markdown)
                .with_context(|| format!("Failed to write export: {}", target.display()))?;
            eprintln!("Exported to {}", format_path_with_tilde(&target));
        }
    }
    Ok(())
}

fn print_graph(file: &Path, options: &LayoutOptions, format: Option<TranscriptFormat>) -> Result<()> {
    let loaded = load_session(file, format)?;
    let mut graph = build_session_graph(&loaded.session);
    LayeredLayout.apply(&mut graph, options);

    println!("{}", serde_json::to_string_pretty(&graph)?);
    Ok(())
}

fn role_label(role: Role) -> &'static str {
    match role {
        Role::User => "user",
        Role::Assistant => "agent",
    }
}

fn list_turns(file: &Path, format: Option<TranscriptFormat>) -> Result<()> {
    let LoadedSession { session, .. } = load_session(file, format)?;

    for (turn, segment) in session.turns.iter().zip(timeline(&session)) {
        let mut markers = String::new();
        if !turn.tool_calls.is_empty() {
            markers.push_str(&format!(" [{} tools]", turn.tool_calls.len()));
        }
        if !turn.subagent_invocations.is_empty() {
            markers.push_str(&format!(" [{} subagents]", turn.subagent_invocations.len()));
        }

        println!(
            "{:>4}  {:<5}  ~{:>7}  {:>5.1}%  {}{}",
            turn.index + 1,
            role_label(turn.role),
            format_count(turn.estimated_tokens),
            segment.fraction * 100.0,
            single_line(&turn.summary),
            markers
        );
    }

    println!();
    println!(
        "{} turns, ~{} tokens",
        session.turns.len(),
        format_count(session.total_tokens)
    );
    Ok(())
}

fn show_turn(file: &Path, number: usize, format: Option<TranscriptFormat>) -> Result<()> {
    let loaded = load_session(file, format)?;
    let total = loaded.session.turns.len();

    let turn = number
        .checked_sub(1)
        .and_then(|index| loaded.session.turn(index))
        .with_context(|| format!("Turn {} out of range (session has {} turns)", number, total))?;

    print!("{}", strip_ansi_codes(&TurnDetail::new(turn).to_string()));
    Ok(())
}

fn list_models(pricing: Option<&Path>, json: bool) -> Result<()> {
    let table = load_pricing(pricing)?;

    if json {
        let entries: BTreeMap<&str, _> = table.iter().map(|(id, p)| (id.as_str(), p)).collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    println!("{:<18} {:<20} {:>10} {:>11}", "MODEL", "LABEL", "INPUT/1M", "OUTPUT/1M");
    for (id, p) in table.iter() {
        let marker = if id == ModelId::default() { " (default)" } else { "" };
        println!(
            "{:<18} {:<20} {:>10} {:>11}{}",
            id.as_str(),
            single_line(&p.label),
            format_cost(p.input_per_1m),
            format_cost(p.output_per_1m),
            marker
        );
    }
    Ok(())
}
