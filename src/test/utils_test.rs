#[cfg(test)]
pub mod tests {
    use crate::utils::{cleanup_temp_file, save_uploaded_image};

    #[test]
    fn test_save_then_cleanup_removes_the_image() {
        let dir = std::env::temp_dir().join("portraitig_test_uploads");
        let image_path = save_uploaded_image(b"fake image bytes", dir.to_str().unwrap()).unwrap();

        assert!(image_path.exists());
        let file_name = image_path.file_name().unwrap().to_string_lossy().to_string();
        assert!(file_name.starts_with("temp_"));
        assert!(file_name.ends_with(".jpg"));
        assert_eq!(std::fs::read(&image_path).unwrap(), b"fake image bytes");

        cleanup_temp_file(&image_path);
        assert!(!image_path.exists());
    }

    #[test]
    fn test_each_upload_gets_its_own_path() {
        let dir = std::env::temp_dir().join("portraitig_test_uploads");
        let first = save_uploaded_image(b"one", dir.to_str().unwrap()).unwrap();
        let second = save_uploaded_image(b"two", dir.to_str().unwrap()).unwrap();
        assert_ne!(first, second);
        cleanup_temp_file(&first);
        cleanup_temp_file(&second);
    }

    #[test]
    fn test_cleanup_tolerates_a_missing_file() {
        let missing = std::env::temp_dir().join("portraitig_never_created.jpg");
        // must not panic or error
        cleanup_temp_file(&missing);
    }
}
