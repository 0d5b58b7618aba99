use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ------------------------------------------ Generation ------------------------------------------
// One generated portrait, as produced by a single model call.
#[derive(Deserialize, Serialize, Debug, Clone, ToSchema)]
pub struct GenerationResult {
    pub image_url: String,         // URL of the generated image on the provider side.
    pub model_used: String,        // Display name of the model that produced it.
    pub model_description: String,
    pub generation_id: String,     // Freshly minted per result, never reused.
}

// Outcome of one model inside a run-all pass. Failures serialize as {"error": "..."}.
#[derive(Serialize, Debug, Clone)]
#[serde(untagged)]
pub enum ModelOutcome {
    Success(GenerationResult),
    Failure { error: String },
}

// Aggregated outcome of a run-all pass over every registered model.
#[derive(Debug)]
pub struct EnsembleReport {
    pub results: Vec<(String, ModelOutcome)>,  // keyed by model id, registration order
    pub best: Option<GenerationResult>,
    pub successful_models: usize,
    pub total_models: usize,
    pub ensemble_id: String,
}
