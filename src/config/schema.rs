use serde::{Deserialize, Serialize};

use crate::calc::rank::SortKey;

/// Top-level CLI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Config {
    /// Model names selected at startup.
    #[serde(default = "default_selection")]
    pub default_selection: Vec<String>,

    /// Fixed token count added per non-empty text to approximate chat
    /// message framing. An approximation, not an exact billable count.
    #[serde(default = "default_token_overhead")]
    pub token_overhead: u64,

    /// Number of API calls the total is scaled by.
    #[serde(default = "default_call_count")]
    pub call_count: u32,

    /// Initial sort column: provider, model, input, output, per-call, total.
    #[serde(default)]
    pub sort: Option<String>,

    /// Sort descending instead of ascending.
    #[serde(default)]
    pub descending: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_selection: default_selection(),
            token_overhead: default_token_overhead(),
            call_count: default_call_count(),
            sort: None,
            descending: false,
        }
    }
}

/// The ten models selected out of the box, the most commonly compared
/// entries of the built-in catalogue.
fn default_selection() -> Vec<String> {
    [
        "GPT-4o",
        "GPT-4o Mini",
        "o1",
        "GPT-3.5 Turbo",
        "Claude 3.5 Sonnet",
        "Claude 3.5 Haiku",
        "Gemini 1.5 Pro",
        "Gemini 2.0 Flash",
        "DeepSeek R1",
        "Mistral 7B",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_token_overhead() -> u64 {
    7
}

fn default_call_count() -> u32 {
    1
}

impl Config {
    /// Validate configuration values, returning an error with a helpful
    /// message if any value is out of range.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.call_count == 0 {
            anyhow::bail!("call_count must be at least 1");
        }
        if let Some(ref key) = self.sort {
            if SortKey::parse(key).is_none() {
                anyhow::bail!(
                    "unknown sort key '{}', expected one of: provider, model, input, output, per-call, total",
                    key
                );
            }
        }
        if self.default_selection.iter().any(|n| n.trim().is_empty()) {
            anyhow::bail!("default_selection entries cannot be empty");
        }
        Ok(())
    }
}
