mod schema;

pub use schema::Config;

use crate::catalog::Catalog;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Get the config directory path (~/.config/leed-sim/)
pub fn get_config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("leed-sim")
}

/// Get the default config file path (~/.config/leed-sim/config.yaml)
pub fn get_config_path() -> PathBuf {
    get_config_dir().join("config.yaml")
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional explicit path. If None, the default path is used and a
///   missing file simply yields the default configuration.
///
/// # Errors
///
/// Returns an error if:
/// - An explicit config path does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    match path {
        Some(explicit) => {
            if !explicit.exists() {
                anyhow::bail!("Config file not found at {}", explicit.display());
            }
            read_config(&explicit)
        }
        None => {
            let default_path = get_config_path();
            if default_path.exists() {
                read_config(&default_path)
            } else {
                Ok(Config::default())
            }
        }
    }
}

fn read_config(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file at {}", path.display()))?;

    // An empty file means "all defaults"
    if content.trim().is_empty() {
        return Ok(Config::default());
    }

    let config: Config = serde_saphyr::from_str(&content)
        .with_context(|| format!("Failed to parse config: invalid YAML in {}", path.display()))?;

    Ok(config)
}

/// Check a loaded config against the catalog.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config, catalog: &Catalog) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(ref key) = config.default_scheme {
        if let Err(e) = catalog.scheme(key) {
            errors.push(format!("default_scheme: {}", e));
        }
    }

    if let Some(ref dir) = config.export_dir {
        if dir.as_os_str().is_empty() {
            errors.push("export_dir: must not be empty".to_string());
        } else if dir.is_file() {
            errors.push(format!("export_dir: {} is a file, not a directory", dir.display()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
