use std::fs;
use std::path::{Path, PathBuf};

use log::warn;
use uuid::Uuid;

// Persist an uploaded reference image. The caller owns the returned path for
// exactly one request and must clean it up on every exit path.
pub fn save_uploaded_image(image_content: &[u8], temp_dir: &str) -> std::io::Result<PathBuf> {
    let upload_dir = Path::new(temp_dir);
    if !upload_dir.exists() {
        fs::create_dir_all(upload_dir)?;
    }

    let image_id = Uuid::new_v4();
    let image_path = upload_dir.join(format!("temp_{}.jpg", image_id));
    fs::write(&image_path, image_content)?;
    Ok(image_path)
}

// Best-effort removal; a missing file is not an error.
pub fn cleanup_temp_file(image_path: &Path) {
    if image_path.exists() {
        if let Err(err) = fs::remove_file(image_path) {
            warn!("Failed to remove temp image {}: {}", image_path.display(), err);
        }
    }
}
