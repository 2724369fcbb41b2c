//! Transcript parsers producing [`SessionData`].
//!
//! Two input formats are recognised, each with its own entry point:
//!
//! - [`parse_jsonl_transcript`] - one JSON record per line
//! - [`parse_text_transcript`] - plain text with `user:` / `A:` turn prefixes
//!
//! Both produce the same `SessionData` shape, so nothing downstream needs to know
//! which one ran.
//!
//! # Error Handling Strategy
//!
//! Parsing itself never fails. Malformed lines, records without a role or
//! content, and blank turns are skipped (and logged at `debug`), so a
//! completely unreadable transcript yields a session with zero turns. Deciding
//! what zero turns means is left to the caller: [`load_session`] treats it as a
//! sign that the format guess was wrong and retries once with the other parser.
//!
//! Only file access returns errors (`anyhow::Result` with context), since
//! the binary is the only consumer and never matches on error kinds.

pub mod deserializers;
pub mod jsonl;
pub mod text;

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use chrono::{DateTime, Utc};
use clap::ValueEnum;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

pub use jsonl::{parse_jsonl_transcript, parse_jsonl_transcript_with};
pub use text::{parse_text_transcript, parse_text_transcript_with};

use crate::extract::TranscriptDialect;
use crate::models::{Role, SessionData, SessionTurn};
use crate::utils::read_transcript;

/// Which parser a transcript needs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptFormat {
    /// Newline-delimited JSON records
    Jsonl,
    /// `user:` / `A:` prefixed plain text
    #[value(name = "txt")]
    #[serde(rename = "txt")]
    PlainText,
}

impl TranscriptFormat {
    /// Guess the format from the file name and the content
    ///
    /// A `.txt` extension wins; otherwise content opening with `{` is JSONL.
    /// The guess is advisory and can be wrong for malformed input.
    pub fn detect(path: Option<&Path>, content: &str) -> Self {
        let extension =
            path.and_then(|p| p.extension()).and_then(|e| e.to_str()).map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("txt") => TranscriptFormat::PlainText,
            _ if content.trim_start().starts_with('{') => TranscriptFormat::Jsonl,
            Some("jsonl") => TranscriptFormat::Jsonl,
            _ => TranscriptFormat::PlainText,
        }
    }

    pub fn other(self) -> Self {
        match self {
            TranscriptFormat::Jsonl => TranscriptFormat::PlainText,
            TranscriptFormat::PlainText => TranscriptFormat::Jsonl,
        }
    }
}

impl fmt::Display for TranscriptFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranscriptFormat::Jsonl => f.write_str("jsonl"),
            TranscriptFormat::PlainText => f.write_str("txt"),
        }
    }
}

/// Parse `content` with the parser for `format`
pub fn parse_transcript(content: &str, format: TranscriptFormat) -> SessionData {
    match format {
        TranscriptFormat::Jsonl => parse_jsonl_transcript(content),
        TranscriptFormat::PlainText => parse_text_transcript(content),
    }
}

/// Fresh session id: parse time plus a random suffix, unique across parses
pub fn generate_session_id() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("session-{}-{}", Utc::now().timestamp_millis(), &suffix[..8])
}

/// Builds turns in order, assigning dense indices and running extraction
pub(crate) struct SessionAssembler<'d, D: TranscriptDialect + ?Sized> {
    dialect: &'d D,
    turns: Vec<SessionTurn>,
}

impl<'d, D: TranscriptDialect + ?Sized> SessionAssembler<'d, D> {
    pub(crate) fn new(dialect: &'d D) -> Self {
        Self { dialect, turns: Vec::new() }
    }

    /// Append a turn. Blank text is dropped without consuming an index.
    pub(crate) fn push(&mut self, role: Role, text: String, timestamp: Option<DateTime<Utc>>) {
        if text.trim().is_empty() {
            return;
        }

        let index = self.turns.len();
        let (tool_calls, subagent_invocations) = match role {
            Role::Assistant => (
                self.dialect.tool_calls(&text),
                self.dialect.subagent_invocations(&text, index),
            ),
            Role::User => (Vec::new(), Vec::new()),
        };

        self.turns.push(SessionTurn {
            id: SessionTurn::id_for(index),
            index,
            role,
            summary: self.dialect.summarize(&text),
            estimated_tokens: self.dialect.estimate_tokens(&text),
            tool_calls,
            subagent_invocations,
            text,
            timestamp,
        });
    }

    pub(crate) fn finish(self) -> SessionData {
        SessionData::from_turns(generate_session_id(), self.turns)
    }
}

/// A transcript file parsed into a session
#[derive(Debug, Clone)]
pub struct LoadedSession {
    pub path: PathBuf,
    pub format: TranscriptFormat,
    pub session: SessionData,
}

/// Read and parse one transcript file
///
/// With `format: None` the format is detected; if the guessed parser finds no
/// turns, the other parser is tried once. An explicit format is used as-is.
///
/// # Errors
///
/// Returns an error if the file cannot be opened, is not a regular file, is
/// larger than the size limit, is not UTF-8, or is empty.
pub fn load_session(path: &Path, format: Option<TranscriptFormat>) -> Result<LoadedSession> {
    let content = read_transcript(path)?;
    if content.trim().is_empty() {
        bail!("File is empty: {}", path.display());
    }

    let (format, session) = match format {
        Some(format) => (format, parse_transcript(&content, format)),
        None => {
            let guessed = TranscriptFormat::detect(Some(path), &content);
            let session = parse_transcript(&content, guessed);
            if session.is_empty() {
                let other = guessed.other();
                warn!(
                    path = %path.display(),
                    guessed = %guessed,
                    retry = %other,
                    "No turns found, retrying with the other format"
                );
                (other, parse_transcript(&content, other))
            } else {
                (guessed, session)
            }
        }
    };

    info!(
        path = %path.display(),
        format = %format,
        turns = session.turns.len(),
        "Loaded transcript"
    );

    Ok(LoadedSession { path: path.to_path_buf(), format, session })
}

/// Load several transcripts in parallel; each file succeeds or fails on its own
pub fn load_sessions(
    paths: &[PathBuf],
    format: Option<TranscriptFormat>,
) -> Vec<(PathBuf, Result<LoadedSession>)> {
    paths.par_iter().map(|path| (path.clone(), load_session(path, format))).collect()
}
