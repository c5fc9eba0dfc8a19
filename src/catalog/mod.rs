mod types;
mod validation;

pub use types::{Category, Credit, CreditType, Scheme, Threshold};
pub use validation::validate_schemes;

use crate::error::ChecklistError;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

const BUILTIN_CATALOG: &str = include_str!("leed_bdc.yaml");

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    schemes: Vec<Scheme>,
}

/// Immutable, version-keyed table of certification schemes.
///
/// Schemes keep the order in which they were declared; the TUI and the
/// `schemes` subcommand present them in that order.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    schemes: Vec<Scheme>,
}

impl Catalog {
    /// The LEED BD+C catalog compiled into the binary (v4, v4.1, v5)
    pub fn builtin() -> Result<Self> {
        Self::from_yaml(BUILTIN_CATALOG).context("Built-in catalog is invalid")
    }

    /// Parse and validate a catalog document
    pub fn from_yaml(content: &str) -> Result<Self> {
        let file: CatalogFile =
            serde_saphyr::from_str(content).context("Failed to parse catalog YAML")?;

        if let Err(errors) = validate_schemes(&file.schemes) {
            anyhow::bail!("Invalid catalog:\n  - {}", errors.join("\n  - "));
        }

        Ok(Self {
            schemes: file.schemes,
        })
    }

    /// Load a replacement catalog from disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog file at {}", path.display()))?;
        Self::from_yaml(&content)
            .with_context(|| format!("Failed to load catalog from {}", path.display()))
    }

    /// Look up a scheme by key. Unknown keys are an error, never a fallback.
    pub fn scheme(&self, key: &str) -> Result<&Scheme, ChecklistError> {
        self.schemes
            .iter()
            .find(|s| s.key == key)
            .ok_or_else(|| ChecklistError::UnknownScheme {
                key: key.to_string(),
                available: self.keys().iter().map(|k| k.to_string()).collect(),
            })
    }

    pub fn schemes(&self) -> &[Scheme] {
        &self.schemes
    }

    pub fn keys(&self) -> Vec<&str> {
        self.schemes.iter().map(|s| s.key.as_str()).collect()
    }

    /// Key of the first declared scheme, used when nothing else is configured
    pub fn default_key(&self) -> &str {
        // Validation guarantees at least one scheme
        self.schemes.first().map(|s| s.key.as_str()).unwrap_or("v4")
    }

    /// Key of the scheme after (or before, when `forward` is false) `key`,
    /// wrapping around at either end
    pub fn cycle_key(&self, key: &str, forward: bool) -> &str {
        let len = self.schemes.len();
        let pos = self.schemes.iter().position(|s| s.key == key).unwrap_or(0);
        let next = if forward {
            (pos + 1) % len
        } else {
            (pos + len - 1) % len
        };
        &self.schemes[next].key
    }
}
