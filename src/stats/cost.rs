use crate::models::{ModelId, ModelPricing, PricingTable};

const TOKENS_PER_UNIT: f64 = 1_000_000.0;

/// Estimated spend for the given token counts at `pricing`
pub fn cost_for(input_tokens: usize, output_tokens: usize, pricing: &ModelPricing) -> f64 {
    (input_tokens as f64 / TOKENS_PER_UNIT) * pricing.input_per_1m
        + (output_tokens as f64 / TOKENS_PER_UNIT) * pricing.output_per_1m
}

impl PricingTable {
    /// Estimated spend for `model` using this table's prices
    pub fn cost(&self, input_tokens: usize, output_tokens: usize, model: ModelId) -> f64 {
        cost_for(input_tokens, output_tokens, self.get(model))
    }
}

/// Estimated spend for `model` using the built-in prices
///
/// # Examples
///
/// ```
/// use session_explorer::models::ModelId;
/// use session_explorer::stats::calculate_cost;
///
/// assert_eq!(calculate_cost(1_000_000, 0, ModelId::Gpt4oMini), 0.15);
/// ```
pub fn calculate_cost(input_tokens: usize, output_tokens: usize, model: ModelId) -> f64 {
    PricingTable::builtin().cost(input_tokens, output_tokens, model)
}
