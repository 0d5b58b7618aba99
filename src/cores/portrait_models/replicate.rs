use std::future::Future;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::{info, warn};
use reqwest::Client;
use serde_json::{json, Map, Value};
use tokio::fs;
use uuid::Uuid;

use crate::configs::settings::{ModelDescriptor, GLOBAL_CONFIG};
use crate::cores::portrait_models::portrait_controller::PortraitProvider;
use crate::cores::schemas::GenerationResult;
use crate::errors::PortraitError;

const PREDICTIONS_URL: &str = "https://api.replicate.com/v1/predictions";

// One hosted model on the inference provider. Which payload fields the model
// expects comes from the descriptor, so every registered model shares this code.
#[derive(Clone)]
pub struct ReplicatePortrait {
    descriptor: ModelDescriptor,
    api_token: String,
    timeout: Duration,
    poll_interval: Duration,
}

impl ReplicatePortrait {
    pub fn new(
        descriptor: ModelDescriptor,
        api_token: String,
        timeout: Duration,
        poll_interval: Duration,
    ) -> Self {
        ReplicatePortrait { descriptor, api_token, timeout, poll_interval }
    }

    pub fn from_settings(descriptor: ModelDescriptor) -> Self {
        let config = &*GLOBAL_CONFIG;
        ReplicatePortrait::new(
            descriptor,
            config.replicate_api_token.clone(),
            Duration::from_secs(config.request_timeout_secs),
            Duration::from_secs(config.poll_interval_secs),
        )
    }

    // Build the prediction input from the descriptor and the reference image.
    pub(crate) async fn build_input(
        &self,
        image_path: &Path,
        prompt: &str,
        negative_prompt: &str,
    ) -> Result<Map<String, Value>, PortraitError> {
        // 1. Start from the model's fixed parameters
        let mut input = Map::new();
        for (key, value) in &self.descriptor.default_params {
            input.insert(key.clone(), value.clone());
        }

        // 2. Attach the reference image as a data URI under the field this model expects
        let image_bytes = fs::read(image_path).await.map_err(|err| {
            PortraitError::Invocation(format!(
                "{} failed to read reference image: {}", self.descriptor.id, err
            ))
        })?;
        let data_uri = format!("data:application/octet-stream;base64,{}", STANDARD.encode(&image_bytes));
        input.insert(self.descriptor.image_field.clone(), Value::String(data_uri));

        // 3. Prompts only for models that accept them
        if self.descriptor.takes_prompts {
            input.insert("prompt".to_string(), Value::String(prompt.to_string()));
            input.insert("negative_prompt".to_string(), Value::String(negative_prompt.to_string()));
        }

        Ok(input)
    }

    // Create a prediction and poll it until it settles, returning its raw output.
    async fn run_prediction(&self, input: Map<String, Value>) -> Result<Value, PortraitError> {
        let model_id = &self.descriptor.id;

        // The predictions API wants the bare version hash from "owner/model:version"
        let version = self.descriptor.model_ref.split(':').last().unwrap_or_default();
        let request_body = json!({
            "version": version,
            "input": input,
        });

        // 1. Create the prediction
        let client = Client::new();
        let response = match client.post(PREDICTIONS_URL)
            .bearer_auth(&self.api_token)
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await {
                Ok(resp) => resp,
                Err(err) => return Err(PortraitError::Invocation(format!("{} request failed: {}", model_id, err))),
            };

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(PortraitError::Invocation(format!(
                "{} API returned non-success status {}: {}", model_id, status, body
            )));
        }

        let mut prediction: Value = response.json().await
            .map_err(|err| PortraitError::Invocation(format!("{} failed to parse response: {}", model_id, err)))?;

        // 2. Poll until the prediction settles
        loop {
            let status = prediction["status"].as_str().unwrap_or("").to_string();
            match status.as_str() {
                "succeeded" => return Ok(prediction["output"].take()),
                "failed" | "canceled" => {
                    let reason = prediction["error"].as_str().unwrap_or("unknown error");
                    return Err(PortraitError::Invocation(format!(
                        "{} prediction {}: {}", model_id, status, reason
                    )));
                }
                _ => {}
            }

            let poll_url = prediction.pointer("/urls/get")
                .and_then(|url| url.as_str())
                .ok_or_else(|| PortraitError::Invocation(format!("{} prediction has no poll url", model_id)))?
                .to_string();

            tokio::time::sleep(self.poll_interval).await;

            let response = match client.get(&poll_url)
                .bearer_auth(&self.api_token)
                .send()
                .await {
                    Ok(resp) => resp,
                    Err(err) => return Err(PortraitError::Invocation(format!("{} poll request failed: {}", model_id, err))),
                };
            prediction = response.json().await
                .map_err(|err| PortraitError::Invocation(format!("{} failed to parse poll response: {}", model_id, err)))?;
        }
    }
}

#[async_trait]
impl PortraitProvider for ReplicatePortrait {
    fn descriptor(&self) -> &ModelDescriptor {
        &self.descriptor
    }

    async fn generate(
        &self,
        image_path: &Path,
        prompt: &str,
        negative_prompt: &str,
    ) -> Result<GenerationResult, PortraitError> {
        // 1. Build the request payload
        let input = self.build_input(image_path, prompt, negative_prompt).await?;
        info!("[{}] dispatching prediction to {}", self.descriptor.id, self.descriptor.model_ref);

        // 2. Run the call on its own task so a hung prediction costs this slot
        //    its timeout and nothing more
        let worker = self.clone();
        let output = run_with_timeout(&self.descriptor.id, self.timeout, async move {
            worker.run_prediction(input).await
        }).await?;

        // 3. Normalize the provider's output into a single image URL
        let image_url = extract_image_url(&output)?;
        info!("[{}] generated image: {}", self.descriptor.id, image_url);

        Ok(GenerationResult {
            image_url,
            model_used: self.descriptor.name.clone(),
            model_description: self.descriptor.description.clone(),
            generation_id: Uuid::new_v4().to_string(),
        })
    }
}

// Wait on a spawned worker under a bound; the worker is aborted once the bound
// is exceeded, never waited on past it.
pub(crate) async fn run_with_timeout<T, F>(
    model_id: &str,
    timeout: Duration,
    task: F,
) -> Result<T, PortraitError>
where
    T: Send + 'static,
    F: Future<Output = Result<T, PortraitError>> + Send + 'static,
{
    let handle = tokio::spawn(task);
    let abort = handle.abort_handle();
    match tokio::time::timeout(timeout, handle).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_err)) => Err(PortraitError::Invocation(format!(
            "{} worker task failed: {}", model_id, join_err
        ))),
        Err(_) => {
            warn!("[{}] timed out after {} seconds, aborting worker", model_id, timeout.as_secs());
            abort.abort();
            Err(PortraitError::Timeout(format!(
                "{} generation timed out after {} seconds", model_id, timeout.as_secs()
            )))
        }
    }
}

// The provider returns one of a closed set of output shapes. Anything outside
// the set is a hard failure, not a best-effort coercion.
pub fn extract_image_url(output: &Value) -> Result<String, PortraitError> {
    match output {
        Value::String(url) => Ok(url.trim().to_string()),
        Value::Array(items) => match items.first() {
            Some(Value::String(url)) => Ok(url.trim().to_string()),
            Some(other) => Ok(other.to_string().trim().to_string()),
            None => Err(PortraitError::Invocation(
                "unrecognized response shape: empty output list".to_string(),
            )),
        },
        Value::Object(fields) => match fields.get("url").and_then(|url| url.as_str()) {
            Some(url) => Ok(url.trim().to_string()),
            None => Err(PortraitError::Invocation(
                "unrecognized response shape: object without url".to_string(),
            )),
        },
        _ => Err(PortraitError::Invocation("unrecognized response shape".to_string())),
    }
}
