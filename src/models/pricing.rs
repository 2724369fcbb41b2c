use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Models with a known price. The set is closed, so an unknown id cannot reach cost math.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    ValueEnum,
)]
pub enum ModelId {
    #[default]
    #[serde(rename = "claude-sonnet-4")]
    #[value(name = "claude-sonnet-4")]
    ClaudeSonnet4,
    #[serde(rename = "claude-opus-4")]
    #[value(name = "claude-opus-4")]
    ClaudeOpus4,
    #[serde(rename = "gpt-4o")]
    #[value(name = "gpt-4o")]
    Gpt4o,
    #[serde(rename = "gpt-4o-mini")]
    #[value(name = "gpt-4o-mini")]
    Gpt4oMini,
    #[serde(rename = "claude-haiku-3.5")]
    #[value(name = "claude-haiku-3.5")]
    ClaudeHaiku35,
}

impl ModelId {
    pub const ALL: [ModelId; 5] = [
        ModelId::ClaudeSonnet4,
        ModelId::ClaudeOpus4,
        ModelId::Gpt4o,
        ModelId::Gpt4oMini,
        ModelId::ClaudeHaiku35,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ModelId::ClaudeSonnet4 => "claude-sonnet-4",
            ModelId::ClaudeOpus4 => "claude-opus-4",
            ModelId::Gpt4o => "gpt-4o",
            ModelId::Gpt4oMini => "gpt-4o-mini",
            ModelId::ClaudeHaiku35 => "claude-haiku-3.5",
        }
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Price per one million tokens, input and output billed separately
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelPricing {
    pub label: String,
    #[serde(rename = "inputPer1M")]
    pub input_per_1m: f64,
    #[serde(rename = "outputPer1M")]
    pub output_per_1m: f64,
}

impl ModelPricing {
    fn new(label: &str, input_per_1m: f64, output_per_1m: f64) -> Self {
        Self { label: label.to_string(), input_per_1m, output_per_1m }
    }
}

/// Immutable pricing configuration covering every [`ModelId`]
///
/// Built from the default table and optionally overridden from a JSON file,
/// then passed by reference to everything that needs prices.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricingTable {
    entries: BTreeMap<ModelId, ModelPricing>,
}

impl Default for PricingTable {
    fn default() -> Self {
        let entries = ModelId::ALL
            .into_iter()
            .map(|id| {
                let pricing = match id {
                    ModelId::ClaudeSonnet4 => ModelPricing::new("Claude Sonnet 4", 3.0, 15.0),
                    ModelId::ClaudeOpus4 => ModelPricing::new("Claude Opus 4", 15.0, 75.0),
                    ModelId::Gpt4o => ModelPricing::new("GPT-4o", 2.5, 10.0),
                    ModelId::Gpt4oMini => ModelPricing::new("GPT-4o Mini", 0.15, 0.6),
                    ModelId::ClaudeHaiku35 => ModelPricing::new("Claude Haiku 3.5", 0.8, 4.0),
                };
                (id, pricing)
            })
            .collect();
        Self { entries }
    }
}

impl PricingTable {
    /// Shared copy of the built-in table
    pub fn builtin() -> &'static PricingTable {
        static BUILTIN: OnceLock<PricingTable> = OnceLock::new();
        BUILTIN.get_or_init(PricingTable::default)
    }

    pub fn get(&self, model: ModelId) -> &ModelPricing {
        // Every constructor fills all ModelId::ALL keys
        &self.entries[&model]
    }

    pub fn iter(&self) -> impl Iterator<Item = (ModelId, &ModelPricing)> {
        self.entries.iter().map(|(id, pricing)| (*id, pricing))
    }

    /// Replace entries with the ones present in `overrides`
    pub fn with_overrides(mut self, overrides: BTreeMap<ModelId, ModelPricing>) -> Self {
        self.entries.extend(overrides);
        self
    }

    /// Parse a JSON object of overrides keyed by model id
    ///
    /// Keys outside the known model set are rejected.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let overrides: BTreeMap<ModelId, ModelPricing> =
            serde_json::from_str(json).context("Failed to parse pricing JSON")?;
        Ok(Self::default().with_overrides(overrides))
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read pricing file: {}", path.display()))?;
        Self::from_json_str(&json)
            .with_context(|| format!("Invalid pricing file: {}", path.display()))
    }
}
