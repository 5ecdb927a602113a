pub(crate) mod schema;

pub(crate) use schema::Config;

use std::path::PathBuf;

use anyhow::{Context, Result};

/// Load configuration, checking (in order):
/// 1. `$LLMCOST_CONFIG` env var
/// 2. `~/.llmcost/config.yaml`
/// 3. Built-in defaults
pub(crate) fn load_config() -> Result<Config> {
    let path = resolve_config_path();

    let config = match path {
        Some(p) if p.exists() => {
            tracing::info!(path = %p.display(), "loading config");
            let raw = std::fs::read_to_string(&p)
                .with_context(|| format!("reading config from {}", p.display()))?;
            serde_yaml::from_str(&raw)
                .with_context(|| format!("parsing config from {}", p.display()))?
        }
        _ => {
            tracing::debug!("no config file found, using defaults");
            Config::default()
        }
    };

    Ok(config)
}

/// Determine the config file path.
fn resolve_config_path() -> Option<PathBuf> {
    // Check env var first
    if let Ok(path) = std::env::var("LLMCOST_CONFIG") {
        let p = PathBuf::from(path);
        if !p.as_os_str().is_empty() {
            return Some(p);
        }
    }

    // Default location
    dirs::home_dir().map(|h| h.join(".llmcost").join("config.yaml"))
}
