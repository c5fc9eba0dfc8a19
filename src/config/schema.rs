use crate::export::ExportFormat;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// User defaults read from `~/.config/leed-sim/config.yaml`.
///
/// Every field is optional; command-line flags take precedence.
///
/// Example YAML:
/// ```yaml
/// default_scheme: v4.1
/// project_name: "Green Tower"
/// export_dir: ./exports
/// export_format: csv
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Scheme key selected at startup (default: first catalog scheme)
    #[serde(default)]
    pub default_scheme: Option<String>,

    /// Project name used in exports and file names
    #[serde(default)]
    pub project_name: Option<String>,

    /// Directory exports are written to (default: current directory)
    #[serde(default)]
    pub export_dir: Option<PathBuf>,

    /// Format used by `export` and the TUI `x` key (default: xlsx)
    #[serde(default)]
    pub export_format: Option<ExportFormat>,
}

impl Config {
    pub fn export_dir(&self) -> PathBuf {
        self.export_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn export_format(&self) -> ExportFormat {
        self.export_format.unwrap_or_default()
    }
}
