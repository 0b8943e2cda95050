use std::{
    fs::File,
    io::Read,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Result};
use serde::Deserialize;
use tracing::info;

// ${VAR} and ${VAR:default} are expanded from the environment before parsing
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServeConfig {
    pub host: String,
    pub port: u16,
    pub model_path: PathBuf,
    pub model_url: Option<String>,
    pub fetch_timeout_secs: u64,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            model_path: PathBuf::from("model/sentiment_analysis_model.json"),
            model_url: None,
            fetch_timeout_secs: 30,
        }
    }
}

pub fn load_config(path: Option<&Path>) -> Result<ServeConfig> {
    match path {
        Some(p) => parse_config(p),
        None => {
            info!("No config file given, using defaults");
            Ok(ServeConfig::default())
        }
    }
}

pub fn parse_config(path: &Path) -> Result<ServeConfig> {
    info!(path = %path.display(), "Parsing config file");
    let mut file = File::open(path)?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;

    let contents = subst::substitute(&contents, &subst::Env)?;
    let config: ServeConfig = serde_yaml::from_str(&contents)?;

    validate_config(&config)?;

    Ok(config)
}

fn validate_config(config: &ServeConfig) -> Result<()> {
    if config.host.trim().is_empty() {
        return Err(anyhow!("host must not be empty"));
    }
    if config.port == 0 {
        return Err(anyhow!("port must be non-zero, the service needs a fixed address"));
    }
    if config.model_path.as_os_str().is_empty() {
        return Err(anyhow!("model_path must not be empty"));
    }
    if config.fetch_timeout_secs == 0 {
        return Err(anyhow!("fetch_timeout_secs must be at least 1"));
    }
    if let Some(url) = &config.model_url {
        let parsed = reqwest::Url::parse(url).map_err(|e| anyhow!("model_url {url} is invalid: {e}"))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(anyhow!("model_url must be an http(s) URL, got {url}"));
        }
    }
    Ok(())
}
