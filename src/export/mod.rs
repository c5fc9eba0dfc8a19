pub mod filename;
pub mod grid;
pub mod sink;

pub use filename::{export_filename, filename_timestamp, sanitize_filename_part};
pub use grid::{build_grid, Cell, ExportGrid, COLUMN_HEADERS, DOCS_SEPARATOR};
pub use sink::{CsvSink, ExportSink, XlsxSink, SHEET_NAME};

use crate::catalog::Scheme;
use crate::scoring::ScoringState;
use anyhow::{Context, Result};
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Spreadsheet format written by an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    #[default]
    Xlsx,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
        }
    }

    /// The format offered as the alternative export in the TUI
    pub fn other(&self) -> Self {
        match self {
            ExportFormat::Csv => ExportFormat::Xlsx,
            ExportFormat::Xlsx => ExportFormat::Csv,
        }
    }

    pub fn sink(&self) -> Box<dyn ExportSink> {
        match self {
            ExportFormat::Csv => Box::new(CsvSink),
            ExportFormat::Xlsx => Box::new(XlsxSink),
        }
    }
}

/// Build the grid for a scored checklist and write it into `dir`.
///
/// The file name is derived from the project name, scheme key and the local
/// time of the export. Returns the path that was written.
pub fn export_checklist(
    project_name: &str,
    scheme: &Scheme,
    state: &ScoringState,
    dir: &Path,
    format: ExportFormat,
    exported_at: DateTime<Local>,
) -> Result<PathBuf> {
    if !dir.exists() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create export directory at {}", dir.display()))?;
    }

    let path = dir.join(export_filename(project_name, &scheme.key, &exported_at, format));
    let grid = build_grid(project_name, scheme, state, exported_at.with_timezone(&Utc));

    format
        .sink()
        .write(&grid, &path)
        .with_context(|| format!("Export to {} failed", path.display()))?;

    Ok(path)
}
