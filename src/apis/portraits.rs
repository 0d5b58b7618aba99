use actix_web::{get, post, web, Error, HttpResponse, Responder};
use actix_multipart::form::{tempfile::TempFile, text::Text, MultipartForm};
use serde_json::{json, Map, Value};

use crate::apis::schemas::{ErrorResponse, PortraitResponse};
use crate::configs::settings::{GLOBAL_CONFIG, PORTRAIT_MODELS};
use crate::cores::ensemble::PortraitEnsemble;
use crate::cores::portrait_models::portrait_controller::PortraitProvider;
use crate::cores::portrait_models::replicate::ReplicatePortrait;
use crate::cores::prompts::PromptBook;
use crate::utils::{cleanup_temp_file, save_uploaded_image};

// Configure the actix_web service routes. The runall route must be registered
// ahead of the per-model route so the literal path wins the match.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health)
        .service(models)
        .service(generate_portrait_runall)
        .service(generate_portrait);
}

// Multipart form shared by every generation endpoint.
#[derive(Debug, MultipartForm)]
pub struct PortraitUploadForm {
    pub reference_image: TempFile,
    pub style: Option<Text<String>>,
    pub prompt: Option<Text<String>>,
    pub negative_prompt: Option<Text<String>>,
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, body = String),
    )
)]

#[get("/health")]
pub async fn health() -> impl Responder {
    "OK"
}

#[utoipa::path(
    post,
    path = "/generate-portrait-{model}",
    responses(
        (status = 200, body = PortraitResponse),
        (status = 400, body = ErrorResponse),
        (status = 500, body = ErrorResponse),
    )
)]

// Handle the POST request for one registered model.
#[post("/generate-portrait-{model}")]
pub async fn generate_portrait(
    path: web::Path<String>,
    MultipartForm(form): MultipartForm<PortraitUploadForm>,
) -> Result<impl Responder, Error> {
    let model_id = path.into_inner();
    let config = &*GLOBAL_CONFIG;

    // 1. Check that the requested model is registered
    let descriptor = match PORTRAIT_MODELS.descriptor(&model_id) {
        Some(descriptor) => descriptor.clone(),
        None => {
            let error_response = ErrorResponse {
                detail: format!("Unsupported {} model!", model_id),
            };
            return Ok(HttpResponse::BadRequest().json(error_response));
        }
    };

    // 2. The provider credential must be configured before any call path dispatches
    if !config.api_token_configured() {
        let error_response = ErrorResponse {
            detail: "Generation failed: replicate API token is not configured".to_string(),
        };
        return Ok(HttpResponse::InternalServerError().json(error_response));
    }

    // 3. Persist the uploaded reference image for the duration of this request
    let image_content = match std::fs::read(form.reference_image.file.path()) {
        Ok(content) => content,
        Err(err) => {
            let error_response = ErrorResponse {
                detail: format!("Failed to read uploaded image: {}", err),
            };
            return Ok(HttpResponse::InternalServerError().json(error_response));
        }
    };
    let temp_path = match save_uploaded_image(&image_content, &config.temp_image_dir) {
        Ok(path) => path,
        Err(err) => {
            let error_response = ErrorResponse {
                detail: format!("Failed to save uploaded image: {}", err),
            };
            return Ok(HttpResponse::InternalServerError().json(error_response));
        }
    };

    // 4. Compose the prompts and call the model
    let prompts = PromptBook::default();
    let style = form.style.as_ref().map(|text| text.as_str()).unwrap_or("realistic");
    let custom_prompt = form.prompt.as_ref().map(|text| text.as_str());
    let custom_negative = form.negative_prompt.as_ref().map(|text| text.as_str());
    let unified_prompt = prompts.prompt(style, custom_prompt);
    let unified_negative_prompt = prompts.negative(style, custom_negative);

    let provider = ReplicatePortrait::from_settings(descriptor);
    let result = provider.generate(&temp_path, &unified_prompt, &unified_negative_prompt).await;

    // 5. The temp image lives exactly as long as this request
    cleanup_temp_file(&temp_path);

    // 6. Construct the response body based on the call result
    match result {
        Ok(result) => Ok(HttpResponse::Ok().json(PortraitResponse {
            image_url: result.image_url,
            model_used: result.model_used,
            generation_id: result.generation_id,
        })),
        Err(err) => {
            let error_response = ErrorResponse {
                detail: format!("Generation failed: {}", err),
            };
            Ok(HttpResponse::InternalServerError().json(error_response))
        }
    }
}

#[utoipa::path(
    post,
    path = "/generate-portrait-runall",
    responses(
        (status = 200, body = String),
        (status = 500, body = ErrorResponse),
    )
)]

// Run every registered model and select the best result.
#[post("/generate-portrait-runall")]
pub async fn generate_portrait_runall(
    MultipartForm(form): MultipartForm<PortraitUploadForm>,
) -> Result<impl Responder, Error> {
    let config = &*GLOBAL_CONFIG;

    // 1. The provider credential must be configured before any call path dispatches
    if !config.api_token_configured() {
        let error_response = ErrorResponse {
            detail: "Run All generation failed: replicate API token is not configured".to_string(),
        };
        return Ok(HttpResponse::InternalServerError().json(error_response));
    }

    // 2. Persist the uploaded reference image for the duration of this request
    let image_content = match std::fs::read(form.reference_image.file.path()) {
        Ok(content) => content,
        Err(err) => {
            let error_response = ErrorResponse {
                detail: format!("Failed to read uploaded image: {}", err),
            };
            return Ok(HttpResponse::InternalServerError().json(error_response));
        }
    };
    let temp_path = match save_uploaded_image(&image_content, &config.temp_image_dir) {
        Ok(path) => path,
        Err(err) => {
            let error_response = ErrorResponse {
                detail: format!("Failed to save uploaded image: {}", err),
            };
            return Ok(HttpResponse::InternalServerError().json(error_response));
        }
    };

    // 3. Run every registered model sequentially and pick the representative result
    let style = form.style.as_ref().map(|text| text.as_str()).unwrap_or("realistic");
    let custom_prompt = form.prompt.as_ref().map(|text| text.as_str());
    let custom_negative = form.negative_prompt.as_ref().map(|text| text.as_str());

    let ensemble = PortraitEnsemble::from_config();
    let report = ensemble.run_all(&temp_path, style, custom_prompt, custom_negative).await;

    // 4. The temp image lives exactly as long as this request
    cleanup_temp_file(&temp_path);

    // 5. Construct the response body based on the ensemble result
    match report {
        Ok(report) => {
            let mut runall_results = Map::new();
            for (model_id, outcome) in &report.results {
                runall_results.insert(
                    model_id.clone(),
                    serde_json::to_value(outcome).unwrap_or(Value::Null),
                );
            }
            if let Some(best) = &report.best {
                runall_results.insert(
                    "best".to_string(),
                    serde_json::to_value(best).unwrap_or(Value::Null),
                );
            }

            let res = json!({
                "runall_results": runall_results,
                "generation_id": report.ensemble_id,
                "successful_models": report.successful_models,
                "total_models": report.total_models,
            });
            Ok(HttpResponse::Ok().json(res))
        }
        Err(err) => {
            let error_response = ErrorResponse {
                detail: format!("Run All generation failed: {}", err),
            };
            Ok(HttpResponse::InternalServerError().json(error_response))
        }
    }
}

#[utoipa::path(
    get,
    path = "/models",
    responses(
        (status = 200, body = String),
    )
)]

// Static introspection over the registered model table. Pure read.
#[get("/models")]
pub async fn models() -> Result<impl Responder, Error> {
    let models_config = &*PORTRAIT_MODELS;
    let prompts = PromptBook::default();

    let mut models = Map::new();
    let mut default_params = Map::new();
    for descriptor in &models_config.models {
        models.insert(descriptor.id.clone(), json!({
            "model_id": descriptor.model_ref,
            "description": descriptor.description,
        }));
        default_params.insert(descriptor.id.clone(), json!(descriptor.default_params));
    }

    let mut styles: Vec<&String> = prompts.templates.keys().collect();
    styles.sort();

    Ok(HttpResponse::Ok().json(json!({
        "models": models,
        "styles": styles,
        "default_params": default_params,
    })))
}
