#[cfg(test)]
pub mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use serde_json::json;

    use crate::configs::settings::ModelDescriptor;
    use crate::cores::portrait_models::replicate::{extract_image_url, run_with_timeout, ReplicatePortrait};
    use crate::errors::PortraitError;

    #[test]
    fn test_normalizes_list_of_urls_to_first_entry() {
        let output = json!(["http://x/img.png", "http://x/other.png"]);
        assert_eq!(extract_image_url(&output).unwrap(), "http://x/img.png");
    }

    #[test]
    fn test_normalizes_bare_string_trimmed() {
        let output = json!("  http://x/img.png\n");
        assert_eq!(extract_image_url(&output).unwrap(), "http://x/img.png");
    }

    #[test]
    fn test_normalizes_object_with_url_field() {
        let output = json!({"url": "http://x/img.png"});
        assert_eq!(extract_image_url(&output).unwrap(), "http://x/img.png");
    }

    #[test]
    fn test_coerces_first_non_string_element() {
        let output = json!([123, 456]);
        assert_eq!(extract_image_url(&output).unwrap(), "123");
    }

    #[test]
    fn test_rejects_unrecognized_scalar_shape() {
        let output = json!(42);
        match extract_image_url(&output) {
            Err(PortraitError::Invocation(msg)) => assert!(msg.contains("unrecognized response shape")),
            other => panic!("expected invocation error, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_empty_output_list() {
        let output = json!([]);
        match extract_image_url(&output) {
            Err(PortraitError::Invocation(msg)) => assert!(msg.contains("unrecognized response shape")),
            other => panic!("expected invocation error, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_object_without_url() {
        let output = json!({"status": "succeeded"});
        assert!(extract_image_url(&output).is_err());
    }

    #[actix_rt::test]
    async fn test_exceeded_bound_is_reported_as_timeout() {
        let result: Result<(), PortraitError> =
            run_with_timeout("instantid", Duration::from_millis(50), async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(())
            })
            .await;
        match result {
            Err(PortraitError::Timeout(msg)) => {
                assert!(msg.contains("instantid"));
                assert!(msg.contains("timed out"));
            }
            other => panic!("expected timeout, got {:?}", other),
        }
    }

    #[actix_rt::test]
    async fn test_fast_worker_completes_within_bound() {
        let result = run_with_timeout("instantid", Duration::from_secs(5), async {
            Ok::<_, PortraitError>(7)
        })
        .await;
        assert_eq!(result.unwrap(), 7);
    }

    fn descriptor(image_field: &str, takes_prompts: bool) -> ModelDescriptor {
        let mut default_params = HashMap::new();
        default_params.insert("width".to_string(), json!(640));
        default_params.insert("height".to_string(), json!(640));
        ModelDescriptor {
            id: "instantid2".to_string(),
            name: "InstantID MultiControlNet".to_string(),
            model_ref: "acme/instant-id:0000000000000000000000000000000000000000".to_string(),
            description: "test descriptor".to_string(),
            image_field: image_field.to_string(),
            takes_prompts,
            default_params,
        }
    }

    fn write_test_image() -> std::path::PathBuf {
        let image_path = std::env::temp_dir()
            .join(format!("portraitig_test_{}.jpg", uuid::Uuid::new_v4()));
        std::fs::write(&image_path, b"not really a jpeg").unwrap();
        image_path
    }

    #[actix_rt::test]
    async fn test_build_input_follows_the_descriptor() {
        let image_path = write_test_image();
        let model = ReplicatePortrait::new(
            descriptor("face_image_path", true),
            "r8_test_token".to_string(),
            Duration::from_secs(1),
            Duration::from_millis(10),
        );

        let input = model.build_input(&image_path, "a portrait", "blurry").await.unwrap();
        std::fs::remove_file(&image_path).ok();

        let data_uri = input["face_image_path"].as_str().unwrap();
        assert!(data_uri.starts_with("data:application/octet-stream;base64,"));
        assert_eq!(input["prompt"], json!("a portrait"));
        assert_eq!(input["negative_prompt"], json!("blurry"));
        assert_eq!(input["width"], json!(640));
        assert_eq!(input["height"], json!(640));
    }

    #[actix_rt::test]
    async fn test_build_input_skips_prompts_when_model_takes_none() {
        let image_path = write_test_image();
        let model = ReplicatePortrait::new(
            descriptor("image", false),
            "r8_test_token".to_string(),
            Duration::from_secs(1),
            Duration::from_millis(10),
        );

        let input = model.build_input(&image_path, "a portrait", "blurry").await.unwrap();
        std::fs::remove_file(&image_path).ok();

        assert!(input.contains_key("image"));
        assert!(!input.contains_key("prompt"));
        assert!(!input.contains_key("negative_prompt"));
    }

    #[actix_rt::test]
    async fn test_build_input_fails_on_missing_image() {
        let model = ReplicatePortrait::new(
            descriptor("image", true),
            "r8_test_token".to_string(),
            Duration::from_secs(1),
            Duration::from_millis(10),
        );

        let missing = std::env::temp_dir().join("portraitig_definitely_missing.jpg");
        match model.build_input(&missing, "a portrait", "blurry").await {
            Err(PortraitError::Invocation(msg)) => assert!(msg.contains("reference image")),
            other => panic!("expected invocation error, got {:?}", other),
        }
    }
}
