mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    // Try default locations
    let default_paths = [
        "./config.toml",
        "./menagerie.toml",
        "~/.config/menagerie/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            tracing::debug!("Using config file {:?}", path);
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.server.port == 0 {
        anyhow::bail!("Server port cannot be 0");
    }

    let storage = &config.storage;
    if !storage.public_prefix.starts_with('/') || storage.public_prefix.trim_end_matches('/').is_empty() {
        anyhow::bail!(
            "storage.public_prefix must be a path below the root, got {:?}",
            storage.public_prefix
        );
    }

    if storage.max_upload_bytes == 0 {
        anyhow::bail!("storage.max_upload_bytes cannot be 0");
    }

    if storage.upload_dir.as_os_str().is_empty() {
        anyhow::bail!("storage.upload_dir cannot be empty");
    }

    if storage.metadata_file.as_os_str().is_empty() {
        anyhow::bail!("storage.metadata_file cannot be empty");
    }

    if let Some(ref dir) = config.server.static_dir {
        if !dir.exists() {
            tracing::warn!("Static directory does not exist: {:?}", dir);
        }
    }

    Ok(())
}
