//! The authoritative input snapshot and the full recompute pipeline.
//!
//! Every user edit mutates one [`Snapshot`]; derived results are always
//! rebuilt whole from the current snapshot by [`Snapshot::recompute`]. There
//! are no observer chains and no incremental updates, so the displayed table
//! can never drift from the inputs: same snapshot, same rows.

use crate::catalog::{self, Model, ModelError};
use crate::config::Config;

use super::cost::{compute_costs, CostResult};
use super::rank::{sort_results, SortConfig, SortKey};
use super::tokenizer;

/// The complete input state of one calculator session.
#[derive(Debug, Clone, Default)]
pub(crate) struct Snapshot {
    pub input_text: String,
    pub output_text: String,
    /// Selected model names, in selection order (display order for badges;
    /// row order always follows the catalogue).
    pub selected: Vec<String>,
    /// Session-only custom models; never persisted.
    pub custom_models: Vec<Model>,
    pub call_count: u32,
    /// Manual token overrides bypass the tokenizer entirely.
    pub input_tokens_override: Option<u64>,
    pub output_tokens_override: Option<u64>,
    /// Fixed additive correction approximating message-framing tokens.
    pub token_overhead: u64,
    pub sort: SortConfig,
}

impl Snapshot {
    /// Build the initial snapshot from configuration. The default selection
    /// is injected here rather than baked into the pipeline.
    pub(crate) fn from_config(config: &Config) -> Self {
        let mut sort = SortConfig::default();
        if let Some(key) = config.sort.as_deref().and_then(SortKey::parse) {
            sort.toggle(key);
            if config.descending {
                sort.toggle(key);
            }
        }
        Self {
            selected: config.default_selection.clone(),
            call_count: config.call_count,
            token_overhead: config.token_overhead,
            sort,
            ..Self::default()
        }
    }

    /// Current input token count: manual override, else tokenized text.
    pub(crate) fn input_tokens(&self) -> u64 {
        self.input_tokens_override
            .unwrap_or_else(|| tokenizer::estimate_tokens(&self.input_text, self.token_overhead))
    }

    /// Current output token count: manual override, else tokenized text.
    pub(crate) fn output_tokens(&self) -> u64 {
        self.output_tokens_override
            .unwrap_or_else(|| tokenizer::estimate_tokens(&self.output_text, self.token_overhead))
    }

    /// The merged catalogue: built-ins first, session customs appended.
    pub(crate) fn catalog(&self) -> Vec<Model> {
        catalog::merge_catalog(&catalog::builtins(), &self.custom_models)
    }

    /// Run the full pipeline: tokenize, resolve selection, compute, sort.
    ///
    /// Selected names with no catalogue entry are skipped silently — a
    /// selection may transiently reference a removed custom model. Row order
    /// before sorting is catalogue order, not selection order. Call count is
    /// NOT applied here; the renderer multiplies exactly once.
    pub(crate) fn recompute(&self) -> Vec<CostResult> {
        let input_tokens = self.input_tokens();
        let output_tokens = self.output_tokens();

        let catalog = self.catalog();
        let selected: Vec<Model> = catalog
            .into_iter()
            .filter(|m| self.selected.iter().any(|name| name == &m.name))
            .collect();

        let rows = compute_costs(&selected, input_tokens, output_tokens);
        sort_results(&rows, &self.sort, input_tokens, output_tokens)
    }

    // -- Selection ----------------------------------------------------------

    /// Toggle a model in or out of the selection.
    pub(crate) fn toggle_selected(&mut self, name: &str) {
        if let Some(pos) = self.selected.iter().position(|n| n == name) {
            self.selected.remove(pos);
        } else {
            self.selected.push(name.to_string());
        }
    }

    /// Select every model in the merged catalogue, one entry per name.
    pub(crate) fn select_all(&mut self) {
        self.selected.clear();
        for model in self.catalog() {
            if !self.selected.contains(&model.name) {
                self.selected.push(model.name);
            }
        }
    }

    /// Clear the selection.
    pub(crate) fn clear_selection(&mut self) {
        self.selected.clear();
    }

    // -- Custom models ------------------------------------------------------

    /// Validate and append a custom model, selecting it on success.
    pub(crate) fn add_custom(&mut self, model: Model) -> Result<(), ModelError> {
        catalog::validate_custom(&model)?;
        if !self.selected.contains(&model.name) {
            self.selected.push(model.name.clone());
        }
        self.custom_models.push(model);
        Ok(())
    }

    /// Remove a custom model by name. The selection entry is left in place
    /// on purpose: the pipeline skips names it cannot resolve, and a
    /// re-added model picks its selection back up.
    pub(crate) fn remove_custom(&mut self, name: &str) -> bool {
        let before = self.custom_models.len();
        self.custom_models.retain(|m| m.name != name);
        self.custom_models.len() != before
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
