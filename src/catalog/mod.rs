// Model catalog: built-in pricing table, custom-model validation, merge, lookup.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Model
// ---------------------------------------------------------------------------

/// A selectable model with its per-token pricing.
///
/// Prices are USD per million tokens, the unit every provider publishes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct Model {
    pub name: String,
    pub provider: String,
    /// Price in USD per million input tokens.
    pub input_price: f64,
    /// Price in USD per million output tokens.
    pub output_price: f64,
    /// Context window in tokens (input + output).
    pub context_window: u64,
}

/// Static entry in the built-in pricing table.
struct BuiltinModel {
    name: &'static str,
    provider: &'static str,
    input_price: f64,
    output_price: f64,
    context_window: u64,
}

impl BuiltinModel {
    fn to_model(&self) -> Model {
        Model {
            name: self.name.to_string(),
            provider: self.provider.to_string(),
            input_price: self.input_price,
            output_price: self.output_price,
            context_window: self.context_window,
        }
    }
}

// ---------------------------------------------------------------------------
// Built-in catalogue
// ---------------------------------------------------------------------------

/// Built-in model catalogue. Prices as of early 2025; update as vendors do.
static BUILTINS: &[BuiltinModel] = &[
    BuiltinModel {
        name: "GPT-4o",
        provider: "OpenAI",
        input_price: 2.50,
        output_price: 10.0,
        context_window: 128_000,
    },
    BuiltinModel {
        name: "GPT-4o Mini",
        provider: "OpenAI",
        input_price: 0.15,
        output_price: 0.60,
        context_window: 128_000,
    },
    BuiltinModel {
        name: "o1",
        provider: "OpenAI",
        input_price: 15.0,
        output_price: 60.0,
        context_window: 200_000,
    },
    BuiltinModel {
        name: "o1 Mini",
        provider: "OpenAI",
        input_price: 1.10,
        output_price: 4.40,
        context_window: 128_000,
    },
    BuiltinModel {
        name: "GPT-4 Turbo",
        provider: "OpenAI",
        input_price: 10.0,
        output_price: 30.0,
        context_window: 128_000,
    },
    BuiltinModel {
        name: "GPT-3.5 Turbo",
        provider: "OpenAI",
        input_price: 0.50,
        output_price: 1.50,
        context_window: 16_385,
    },
    BuiltinModel {
        name: "Claude 3.5 Sonnet",
        provider: "Anthropic",
        input_price: 3.0,
        output_price: 15.0,
        context_window: 200_000,
    },
    BuiltinModel {
        name: "Claude 3.5 Haiku",
        provider: "Anthropic",
        input_price: 0.80,
        output_price: 4.0,
        context_window: 200_000,
    },
    BuiltinModel {
        name: "Claude 3 Opus",
        provider: "Anthropic",
        input_price: 15.0,
        output_price: 75.0,
        context_window: 200_000,
    },
    BuiltinModel {
        name: "Gemini 1.5 Pro",
        provider: "Google",
        input_price: 1.25,
        output_price: 5.0,
        context_window: 2_097_152,
    },
    BuiltinModel {
        name: "Gemini 1.5 Flash",
        provider: "Google",
        input_price: 0.075,
        output_price: 0.30,
        context_window: 1_048_576,
    },
    BuiltinModel {
        name: "Gemini 2.0 Flash",
        provider: "Google",
        input_price: 0.10,
        output_price: 0.40,
        context_window: 1_048_576,
    },
    BuiltinModel {
        name: "DeepSeek V3",
        provider: "DeepSeek",
        input_price: 0.27,
        output_price: 1.10,
        context_window: 64_000,
    },
    BuiltinModel {
        name: "DeepSeek R1",
        provider: "DeepSeek",
        input_price: 0.55,
        output_price: 2.19,
        context_window: 64_000,
    },
    BuiltinModel {
        name: "Mistral 7B",
        provider: "Mistral",
        input_price: 0.25,
        output_price: 0.25,
        context_window: 32_768,
    },
    BuiltinModel {
        name: "Mistral Large",
        provider: "Mistral",
        input_price: 2.0,
        output_price: 6.0,
        context_window: 128_000,
    },
    BuiltinModel {
        name: "Llama 3.1 405B",
        provider: "Meta",
        input_price: 3.50,
        output_price: 3.50,
        context_window: 128_000,
    },
];

/// Materialize the built-in catalogue as owned [`Model`] values.
pub(crate) fn builtins() -> Vec<Model> {
    BUILTINS.iter().map(BuiltinModel::to_model).collect()
}

// ---------------------------------------------------------------------------
// Merge and lookup
// ---------------------------------------------------------------------------

/// Merge built-ins and session customs into one catalogue: built-ins first,
/// customs appended, both in their original order.
///
/// Duplicate names are allowed and both entries survive the merge; lookup is
/// first-match-wins (see [`find_by_name`]), so a custom model sharing a name
/// with a built-in is shadowed for lookup but still listed.
pub(crate) fn merge_catalog(builtins: &[Model], customs: &[Model]) -> Vec<Model> {
    let mut merged = Vec::with_capacity(builtins.len() + customs.len());
    merged.extend_from_slice(builtins);
    merged.extend_from_slice(customs);
    merged
}

/// Look up a model by exact name. First match in catalogue order wins.
pub(crate) fn find_by_name<'a>(catalog: &'a [Model], name: &str) -> Option<&'a Model> {
    catalog.iter().find(|m| m.name == name)
}

// ---------------------------------------------------------------------------
// Custom-model validation
// ---------------------------------------------------------------------------

/// Reasons a custom model entry is rejected at the input boundary.
#[derive(Debug, Error, PartialEq)]
pub(crate) enum ModelError {
    #[error("model name cannot be empty")]
    EmptyName,
    #[error("provider cannot be empty")]
    EmptyProvider,
    #[error("{field} price must be a finite number >= 0, got {value}")]
    BadPrice { field: &'static str, value: f64 },
    #[error("context window must be at least 1 token")]
    BadContextWindow,
}

/// Validate a custom model before it may enter the catalogue.
///
/// The calculator itself never sees an invalid entry; callers surface the
/// error and drop the model.
pub(crate) fn validate_custom(model: &Model) -> Result<(), ModelError> {
    if model.name.trim().is_empty() {
        return Err(ModelError::EmptyName);
    }
    if model.provider.trim().is_empty() {
        return Err(ModelError::EmptyProvider);
    }
    if !model.input_price.is_finite() || model.input_price < 0.0 {
        return Err(ModelError::BadPrice {
            field: "input",
            value: model.input_price,
        });
    }
    if !model.output_price.is_finite() || model.output_price < 0.0 {
        return Err(ModelError::BadPrice {
            field: "output",
            value: model.output_price,
        });
    }
    if model.context_window == 0 {
        return Err(ModelError::BadContextWindow);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
