use std::path::Path;

use async_trait::async_trait;

use crate::configs::settings::ModelDescriptor;
use crate::cores::schemas::GenerationResult;
use crate::errors::PortraitError;

#[async_trait]
pub trait PortraitProvider: Send + Sync {
    fn descriptor(&self) -> &ModelDescriptor;

    async fn generate(
        &self,
        image_path: &Path,
        prompt: &str,
        negative_prompt: &str,
    ) -> Result<GenerationResult, PortraitError>;
}
