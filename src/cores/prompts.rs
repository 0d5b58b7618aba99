use std::collections::HashMap;

// Style-keyed prompt templates. The run-all pass composes one prompt pair and
// hands the same pair to every model so results stay comparable.
#[derive(Debug, Clone)]
pub struct PromptBook {
    pub templates: HashMap<String, String>,
    pub negative_templates: HashMap<String, String>,
}

impl Default for PromptBook {
    fn default() -> Self {
        let mut templates = HashMap::new();
        templates.insert(
            "realistic".to_string(),
            "A high-quality portrait, professional photography, sharp focus, detailed facial features, natural lighting".to_string(),
        );
        templates.insert(
            "artistic".to_string(),
            "An artistic portrait, creative composition, beautiful lighting, professional photography".to_string(),
        );
        templates.insert(
            "professional".to_string(),
            "A professional headshot, business attire, clean background, corporate photography".to_string(),
        );
        templates.insert(
            "casual".to_string(),
            "A casual portrait, natural expression, everyday setting, candid photography".to_string(),
        );

        let mut negative_templates = HashMap::new();
        negative_templates.insert(
            "default".to_string(),
            "blurry, low quality, distorted, deformed, cartoon, anime, painting, drawing".to_string(),
        );
        negative_templates.insert(
            "realistic".to_string(),
            "blurry, low quality, distorted, deformed, cartoon, anime, painting, drawing, artificial".to_string(),
        );
        negative_templates.insert(
            "professional".to_string(),
            "blurry, low quality, distorted, deformed, cartoon, anime, casual, informal".to_string(),
        );

        PromptBook { templates, negative_templates }
    }
}

impl PromptBook {
    // Unknown styles fall back to the "realistic" template; the lookup is total.
    pub fn prompt(&self, style: &str, custom: Option<&str>) -> String {
        let base = self.templates.get(style)
            .or_else(|| self.templates.get("realistic"))
            .cloned()
            .unwrap_or_default();
        join_custom(base, custom)
    }

    // Negative templates fall back to the "default" key.
    pub fn negative(&self, style: &str, custom: Option<&str>) -> String {
        let base = self.negative_templates.get(style)
            .or_else(|| self.negative_templates.get("default"))
            .cloned()
            .unwrap_or_default();
        join_custom(base, custom)
    }
}

fn join_custom(base: String, custom: Option<&str>) -> String {
    match custom {
        Some(custom) if !custom.is_empty() => format!("{}, {}", base, custom),
        _ => base,
    }
}
