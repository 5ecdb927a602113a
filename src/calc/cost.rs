//! Per-model cost computation.

use serde::Serialize;

use crate::catalog::Model;

/// One row of the cost breakdown, for a single model.
///
/// `input_cost`/`output_cost` are the model's prices passed through unchanged
/// (USD per million tokens); `total_cost` is the dollar cost of ONE call at
/// the given token counts. Scaling by a call count happens exactly once, in
/// the display layer, never here.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct CostResult {
    pub model_name: String,
    pub provider: String,
    pub input_tokens: u64,
    pub output_tokens: u64,
    /// USD per million input tokens (price passthrough).
    pub input_cost: f64,
    /// USD per million output tokens (price passthrough).
    pub output_cost: f64,
    /// USD for a single call.
    pub total_cost: f64,
    pub context_window: u64,
}

/// Compute one [`CostResult`] per model, in the order given.
///
/// No filtering, no rounding: the result set mirrors the input model
/// sequence exactly, and formatting is left to the renderer.
pub(crate) fn compute_costs(
    models: &[Model],
    input_tokens: u64,
    output_tokens: u64,
) -> Vec<CostResult> {
    models
        .iter()
        .map(|model| {
            let total_cost = (input_tokens as f64 * model.input_price
                + output_tokens as f64 * model.output_price)
                / 1_000_000.0;
            CostResult {
                model_name: model.name.clone(),
                provider: model.provider.clone(),
                input_tokens,
                output_tokens,
                input_cost: model.input_price,
                output_cost: model.output_price,
                total_cost,
                context_window: model.context_window,
            }
        })
        .collect()
}
