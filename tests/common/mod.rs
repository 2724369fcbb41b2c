//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Value, json};
use tempfile::TempDir;

/// Builder for directories of transcript files
pub struct TranscriptBuilder {
    temp_dir: TempDir,
}

impl TranscriptBuilder {
    /// Create a new builder with an empty directory
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self { temp_dir }
    }

    /// Get the path to the directory
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Path of `name` inside the directory
    pub fn file(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }

    /// Add a file with raw content; `name` may contain subdirectories
    pub fn with_file(self, name: &str, content: &str) -> Self {
        let path = self.temp_dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        fs::write(path, content).expect("Failed to write transcript");
        self
    }

    /// Add a JSONL transcript built from records
    pub fn with_jsonl(self, name: &str, records: &[RecordBuilder]) -> Self {
        let content = records.iter().map(|r| r.to_json()).collect::<Vec<_>>().join("\n");
        self.with_file(name, &content)
    }

    /// Build and return the temp directory (consumes self)
    pub fn build(self) -> TempDir {
        self.temp_dir
    }
}

impl Default for TranscriptBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Where the role of a record is written
#[derive(Clone, Copy)]
enum RolePlacement {
    TopLevel,
    Message,
    Missing,
}

/// Builder for one JSONL transcript record
pub struct RecordBuilder {
    role: String,
    placement: RolePlacement,
    blocks: Vec<Value>,
    plain_content: Option<String>,
    timestamp: Option<Value>,
}

impl RecordBuilder {
    fn with_role(role: &str) -> Self {
        Self {
            role: role.to_string(),
            placement: RolePlacement::TopLevel,
            blocks: Vec::new(),
            plain_content: None,
            timestamp: None,
        }
    }

    pub fn user() -> Self {
        Self::with_role("user")
    }

    pub fn assistant() -> Self {
        Self::with_role("assistant")
    }

    pub fn role(role: &str) -> Self {
        Self::with_role(role)
    }

    /// Add a text content block
    pub fn text(mut self, text: &str) -> Self {
        self.blocks.push(json!({"type": "text", "text": text}));
        self
    }

    /// Add a non-text content block
    pub fn block(mut self, block_type: &str) -> Self {
        self.blocks.push(json!({"type": block_type, "id": "x"}));
        self
    }

    /// Use a bare string as the message content
    pub fn plain_content(mut self, text: &str) -> Self {
        self.plain_content = Some(text.to_string());
        self
    }

    /// Put the role under `message.role` instead of the top level
    pub fn nested_role(mut self) -> Self {
        self.placement = RolePlacement::Message;
        self
    }

    pub fn without_role(mut self) -> Self {
        self.placement = RolePlacement::Missing;
        self
    }

    /// RFC 3339 timestamp
    pub fn timestamp(mut self, rfc3339: &str) -> Self {
        self.timestamp = Some(json!(rfc3339));
        self
    }

    pub fn timestamp_millis(mut self, millis: i64) -> Self {
        self.timestamp = Some(json!(millis));
        self
    }

    /// Convert to a single JSON line
    pub fn to_json(&self) -> String {
        let content = match &self.plain_content {
            Some(text) => json!(text),
            None => Value::Array(self.blocks.clone()),
        };

        let mut message = json!({ "content": content });
        let mut record = json!({});
        match self.placement {
            RolePlacement::TopLevel => record["role"] = json!(self.role),
            RolePlacement::Message => message["role"] = json!(self.role),
            RolePlacement::Missing => {}
        }
        record["message"] = message;
        if let Some(ts) = &self.timestamp {
            record["timestamp"] = ts.clone();
        }

        record.to_string()
    }
}

/// Assistant text with one `[Tool call]` block per `(name, args)` entry
pub fn tool_call_text(intro: &str, calls: &[(&str, &[(&str, &str)])]) -> String {
    let mut text = intro.to_string();
    for (name, args) in calls {
        text.push_str(&format!("\n[Tool call] {}\n", name));
        for (key, value) in *args {
            text.push_str(&format!("  {}: {}\n", key, value));
        }
    }
    text
}

/// A realistic session: exploration, delegation, an edit and a wrap-up
pub fn realistic_session_jsonl() -> String {
    let records = [
        RecordBuilder::user()
            .text("The login form crashes when the password field is empty. Can you fix it?")
            .timestamp("2025-03-01T10:00:00Z"),
        RecordBuilder::assistant()
            .text(&tool_call_text(
                "I'll look at the form handler first.",
                &[
                    ("Read", &[("path", "src/login.rs")]),
                    ("Grep", &[("pattern", "password"), ("path", "src")]),
                ],
            ))
            .timestamp("2025-03-01T10:00:20Z"),
        RecordBuilder::assistant()
            .text(&tool_call_text(
                "Delegating the test search.",
                &[(
                    "Task",
                    &[
                        ("subagent_type", "explore"),
                        ("description", "Find login tests"),
                        ("model", "fast"),
                    ],
                )],
            ))
            .block("tool_use")
            .timestamp("2025-03-01T10:01:00Z"),
        RecordBuilder::user().text("Looks good, go ahead.").timestamp("2025-03-01T10:02:00Z"),
        RecordBuilder::assistant()
            .text(&tool_call_text(
                "Applying the fix.",
                &[("Edit", &[("path", "src/login.rs"), ("old", "unwrap()"), ("new", "?")])],
            ))
            .timestamp("2025-03-01T10:04:05Z"),
    ];
    records.iter().map(|r| r.to_json()).collect::<Vec<_>>().join("\n")
}
