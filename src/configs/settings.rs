use serde::Deserialize;
use std::collections::HashMap;
use std::fs::{File, metadata};
use std::io::Read;
use once_cell::sync::Lazy;
use serde_json::Value;
use serde_yaml;

// ---------------------------------------------- Portrait Models ----------------------------------------------
// One registered external model. Everything a backend differs in lives here,
// so adding a backend is a models.yaml edit rather than a code change.
#[derive(Debug, Deserialize, Clone)]
pub struct ModelDescriptor {
    pub id: String,
    pub name: String,
    pub model_ref: String,
    pub description: String,
    pub image_field: String,
    #[serde(default = "default_takes_prompts")]
    pub takes_prompts: bool,
    #[serde(default)]
    pub default_params: HashMap<String, Value>,
}

fn default_takes_prompts() -> bool {
    true
}

#[derive(Debug, Deserialize, Clone)]
pub struct PortraitModelsConfig {
    pub models: Vec<ModelDescriptor>,  // registration order, used by the run-all pass
    pub priority: Vec<String>,         // best-result pick order
}

impl PortraitModelsConfig {
    pub fn descriptor(&self, model_id: &str) -> Option<&ModelDescriptor> {
        self.models.iter().find(|descriptor| descriptor.id == model_id)
    }

    pub fn load_config() -> PortraitModelsConfig {
        let config_path = if metadata("/etc/portraitig/models.yaml").is_ok() {
            "/etc/portraitig/models.yaml"
        } else {
            "src/configs/models.yaml"
        };
        let mut file = File::open(config_path).expect("Failed to open models config file");
        let mut contents = String::new();
        file.read_to_string(&mut contents).expect("Failed to read models config file");
        serde_yaml::from_str(&contents).expect("Failed to parse models config file")
    }
}

// ---------------------------------------------- Config ----------------------------------------------
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    pub port: u16,
    pub replicate_api_token: String,
    pub request_timeout_secs: u64,
    pub poll_interval_secs: u64,
    pub temp_image_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8000,
            replicate_api_token: "your-replicate-api-token-here".to_string(),
            request_timeout_secs: 300,
            poll_interval_secs: 2,
            temp_image_dir: "/root/.portraitig/data/temp_images".to_string(),
        }
    }
}

impl Config {
    pub fn load_config() -> Config {
        let config_path = if metadata("/etc/portraitig/configs.yaml").is_ok() {
            "/etc/portraitig/configs.yaml"
        } else {
            "src/configs/configs.yaml"
        };
        let mut file = File::open(config_path).expect("Failed to open config file");
        let mut contents = String::new();
        file.read_to_string(&mut contents).expect("Failed to read config file");
        let mut config: Config = serde_yaml::from_str(&contents).expect("Failed to parse config file");

        // The provider credential may come from the environment instead of the file
        if let Ok(token) = std::env::var("REPLICATE_API_TOKEN") {
            config.replicate_api_token = token;
        }
        config
    }

    // The shipped file carries a placeholder token; refuse to dispatch with it.
    pub fn api_token_configured(&self) -> bool {
        !self.replicate_api_token.is_empty()
            && self.replicate_api_token != "your-replicate-api-token-here"
    }
}

// 全局静态配置对象
pub static GLOBAL_CONFIG: Lazy<Config> = Lazy::new(|| Config::load_config());
pub static PORTRAIT_MODELS: Lazy<PortraitModelsConfig> = Lazy::new(|| PortraitModelsConfig::load_config());
