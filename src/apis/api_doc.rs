use utoipa::OpenApi;

use crate::apis::portraits;
use crate::apis::schemas::{ErrorResponse, PortraitResponse};
use crate::cores::schemas::GenerationResult;

#[derive(OpenApi)]
#[openapi(
    paths(
        portraits::health,
        portraits::generate_portrait,
        portraits::generate_portrait_runall,
        portraits::models,
    ),
    components(
        schemas(PortraitResponse, ErrorResponse, GenerationResult)
    )
)]

pub struct ApiDoc;
