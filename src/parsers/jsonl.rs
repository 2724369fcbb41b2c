use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, info};

use super::SessionAssembler;
use crate::extract::{MarkerDialect, TranscriptDialect};
use crate::models::{Role, SessionData};

const CONTENT_TYPE_TEXT: &str = "text";

#[derive(Debug, Deserialize)]
struct TranscriptRecord {
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    message: Option<RecordMessage>,
    #[serde(default, deserialize_with = "super::deserializers::deserialize_optional_timestamp")]
    timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct RecordMessage {
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    content: Option<RecordContent>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecordContent {
    Text(String),
    Blocks(Vec<ContentBlock>),
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type", default)]
    block_type: Option<String>,
    #[serde(default)]
    text: Option<String>,
}

impl RecordContent {
    /// Text blocks joined with newlines; other block kinds contribute nothing
    fn text(&self) -> String {
        match self {
            RecordContent::Text(text) => text.clone(),
            RecordContent::Blocks(blocks) => blocks
                .iter()
                .filter(|b| b.block_type.as_deref() == Some(CONTENT_TYPE_TEXT))
                .filter_map(|b| b.text.as_deref())
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

/// Why a line produced no turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Skip {
    Malformed,
    MissingRole,
    MissingContent,
    EmptyText,
}

struct RecordTurn {
    role: Role,
    text: String,
    timestamp: Option<DateTime<Utc>>,
}

fn read_record(line: &str) -> Result<RecordTurn, Skip> {
    let record: TranscriptRecord = serde_json::from_str(line).map_err(|_| Skip::Malformed)?;

    let role_name = record
        .role
        .as_deref()
        .or_else(|| record.message.as_ref().and_then(|m| m.role.as_deref()))
        .ok_or(Skip::MissingRole)?;
    let role = Role::from_record(role_name).ok_or(Skip::MissingRole)?;

    let content =
        record.message.as_ref().and_then(|m| m.content.as_ref()).ok_or(Skip::MissingContent)?;
    let text = content.text();
    if text.trim().is_empty() {
        return Err(Skip::EmptyText);
    }

    Ok(RecordTurn { role, text, timestamp: record.timestamp })
}

/// Parse a JSON-lines transcript with the built-in [`MarkerDialect`]
///
/// Each line is an independent record:
///
/// ```text
/// {"role":"user","message":{"content":[{"type":"text","text":"hello"}]}}
/// ```
///
/// Lines that are not JSON, records without a usable role or content, and
/// records whose text is blank are skipped. Turn indices are dense over the
/// records that survive.
pub fn parse_jsonl_transcript(content: &str) -> SessionData {
    parse_jsonl_transcript_with(content, &MarkerDialect)
}

/// [`parse_jsonl_transcript`] with a caller-supplied extraction dialect
pub fn parse_jsonl_transcript_with<D>(content: &str, dialect: &D) -> SessionData
where
    D: TranscriptDialect + ?Sized,
{
    let mut assembler = SessionAssembler::new(dialect);
    let mut total_lines = 0;
    let mut skipped_count = 0;

    for (line_num, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        total_lines += 1;

        match read_record(line) {
            Ok(record) => assembler.push(record.role, record.text, record.timestamp),
            Err(reason) => {
                skipped_count += 1;
                debug!(line = line_num + 1, ?reason, "Skipping transcript line");
            }
        }
    }

    let session = assembler.finish();
    if skipped_count > 0 {
        info!(
            turns = session.turns.len(),
            skipped = skipped_count,
            lines = total_lines,
            "Parsed JSONL transcript"
        );
    }
    session
}
