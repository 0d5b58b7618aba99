use std::path::Path;
use std::time::Duration;

use log::{info, warn};
use uuid::Uuid;

use crate::configs::settings::{GLOBAL_CONFIG, PORTRAIT_MODELS};
use crate::cores::portrait_models::portrait_controller::PortraitProvider;
use crate::cores::portrait_models::replicate::ReplicatePortrait;
use crate::cores::prompts::PromptBook;
use crate::cores::schemas::{EnsembleReport, GenerationResult, ModelOutcome};
use crate::errors::PortraitError;

pub struct PortraitEnsemble {
    models: Vec<Box<dyn PortraitProvider>>,
    priority: Vec<String>,
    prompts: PromptBook,
}

impl PortraitEnsemble {
    pub fn new(models: Vec<Box<dyn PortraitProvider>>, priority: Vec<String>, prompts: PromptBook) -> Self {
        PortraitEnsemble { models, priority, prompts }
    }

    // One provider instance per registered model, in registration order.
    pub fn from_config() -> Self {
        let config = &*GLOBAL_CONFIG;
        let models_config = &*PORTRAIT_MODELS;

        let models = models_config.models.iter()
            .map(|descriptor| {
                Box::new(ReplicatePortrait::new(
                    descriptor.clone(),
                    config.replicate_api_token.clone(),
                    Duration::from_secs(config.request_timeout_secs),
                    Duration::from_secs(config.poll_interval_secs),
                )) as Box<dyn PortraitProvider>
            })
            .collect();

        PortraitEnsemble::new(models, models_config.priority.clone(), PromptBook::default())
    }

    pub async fn run_all(
        &self,
        image_path: &Path,
        style: &str,
        custom_prompt: Option<&str>,
        custom_negative: Option<&str>,
    ) -> Result<EnsembleReport, PortraitError> {
        // 1. Compose the prompts once; every model gets the same pair so the
        //    results are comparable
        let prompt = self.prompts.prompt(style, custom_prompt);
        let negative_prompt = self.prompts.negative(style, custom_negative);
        info!("[run all] unified prompt: {}", prompt);
        info!("[run all] unified negative prompt: {}", negative_prompt);

        let total_models = self.models.len();
        let mut results: Vec<(String, ModelOutcome)> = Vec::with_capacity(total_models);
        let mut successful_models = 0;

        // 2. Invoke every model in registration order. One model failing must
        //    never abort or skip the models after it.
        for model in &self.models {
            let model_id = model.descriptor().id.clone();
            info!("[run all] {} started", model_id);
            match model.generate(image_path, &prompt, &negative_prompt).await {
                Ok(result) => {
                    successful_models += 1;
                    info!("[run all] {} completed successfully ({}/{})", model_id, successful_models, total_models);
                    results.push((model_id, ModelOutcome::Success(result)));
                }
                Err(err) => {
                    warn!("[run all] {} failed: {}", model_id, err);
                    results.push((model_id, ModelOutcome::Failure { error: err.to_string() }));
                }
            }
        }
        info!("[run all] generation complete: {}/{} models succeeded", successful_models, total_models);

        // 3. Zero successes fails the whole run
        if successful_models == 0 {
            return Err(PortraitError::AllModelsFailed(
                "no model produced a portrait, try again or check the input image".to_string(),
            ));
        }

        // 4. Pick the representative result
        let best = select_best(&results, &self.priority);
        if let Some(best) = &best {
            info!("[run all] selected best result: {}", best.model_used);
        }

        Ok(EnsembleReport {
            results,
            best,
            successful_models,
            total_models,
            ensemble_id: Uuid::new_v4().to_string(),
        })
    }
}

// Priority-order pick over the successful results. This is a deterministic
// tie-break, not a quality judgment; no image content is inspected.
pub fn select_best(
    results: &[(String, ModelOutcome)],
    priority: &[String],
) -> Option<GenerationResult> {
    for wanted in priority {
        for (model_id, outcome) in results {
            if let ModelOutcome::Success(result) = outcome {
                if model_id == wanted {
                    return Some(result.clone());
                }
            }
        }
    }

    // No priority entry succeeded; fall back to the first success in registration order
    results.iter().find_map(|(_, outcome)| match outcome {
        ModelOutcome::Success(result) => Some(result.clone()),
        ModelOutcome::Failure { .. } => None,
    })
}
