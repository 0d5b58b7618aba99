use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// Response body for a single-model generation call.
#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct PortraitResponse {
    pub image_url: String,
    pub model_used: String,
    pub generation_id: String,
}

// ------------------------------------------ General Error API ------------------------------------------
#[derive(Serialize, Debug, ToSchema)]
pub struct ErrorResponse {
    pub detail: String,
}
