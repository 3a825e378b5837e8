use std::path::Path;

use serde::Deserialize;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub bind_address: String,
    pub num_workers: usize,
    pub model_path: String,
    // Optional, features are passed to the model unscaled if not specified
    pub scaler_path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bind_address: "[::]:8080".to_string(),
            num_workers: 2,
            model_path: "models/milk_quality_model.onnx".to_string(),
            scaler_path: None,
        }
    }
}

pub fn parse_config(config_content: &str) -> Result<Config, serde_yaml::Error> {
    serde_yaml::from_str::<Config>(config_content)
}

pub fn load_config(path: &Path) -> Config {
    // Loads the configuration file. Keys left out take their default value,
    // a missing or unreadable file falls back to the defaults entirely.
    match std::fs::read_to_string(path) {
        Ok(config_content) => match parse_config(&config_content) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to parse {}: {}, using defaults",
                    path.display(),
                    e
                );
                Config::default()
            }
        },
        Err(_) => {
            warn!("{} not found, using defaults", path.display());
            Config::default()
        }
    }
}

/// Log filter built from `RUST_LOG` directives, `info` when they are absent
/// or unparsable.
pub fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}
