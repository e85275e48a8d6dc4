use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use flight_state_core::FlightConfig;

/// Missing keys fall back to [`FlightConfig::default`].
pub fn load_config(path: Option<&Path>) -> Result<FlightConfig> {
    let config = match path {
        Some(path) => {
            let config_str = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            toml::from_str(&config_str)
                .with_context(|| format!("failed to parse config {}", path.display()))?
        }
        None => FlightConfig::default(),
    };
    config.validate().map_err(|e| anyhow!("invalid config: {e}"))?;
    Ok(config)
}

pub fn default_config_toml() -> Result<String> {
    Ok(toml::to_string_pretty(&FlightConfig::default())?)
}
