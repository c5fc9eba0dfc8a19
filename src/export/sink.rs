use super::grid::{Cell, ExportGrid};
use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use rust_xlsxwriter::Workbook;
use std::io::Write;
use std::path::Path;

/// Worksheet name used by the XLSX sink
pub const SHEET_NAME: &str = "LEED_Simulation";

/// Destination for an export grid.
///
/// A sink writes the whole file or nothing; a failed write leaves no
/// partial file behind.
pub trait ExportSink {
    fn write(&self, grid: &ExportGrid, path: &Path) -> Result<()>;
}

/// Comma-separated values, one grid row per line
pub struct CsvSink;

impl ExportSink for CsvSink {
    fn write(&self, grid: &ExportGrid, path: &Path) -> Result<()> {
        let mut file = AtomicWriteFile::open(path)
            .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

        {
            // Rows have different lengths (summary vs. credit rows)
            let mut writer = csv::WriterBuilder::new()
                .flexible(true)
                .from_writer(&mut file);
            for row in grid.rows() {
                writer
                    .write_record(row.iter().map(Cell::to_string))
                    .context("Failed to write CSV row")?;
            }
            writer.flush().context("Failed to flush CSV writer")?;
        }

        file.commit()
            .with_context(|| format!("Failed to save {}", path.display()))?;
        Ok(())
    }
}

/// Single-sheet Excel workbook; numeric cells stay numeric
pub struct XlsxSink;

impl XlsxSink {
    fn render(grid: &ExportGrid) -> Result<Vec<u8>> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(SHEET_NAME)?;

        for (r, row) in grid.rows().iter().enumerate() {
            let r = u32::try_from(r).context("Too many rows for a worksheet")?;
            for (c, cell) in row.iter().enumerate() {
                let c = u16::try_from(c).context("Too many columns for a worksheet")?;
                match cell {
                    Cell::Text(text) => {
                        worksheet.write_string(r, c, text.as_str())?;
                    }
                    Cell::Number(n) => {
                        worksheet.write_number(r, c, f64::from(*n))?;
                    }
                }
            }
        }

        let bytes = workbook
            .save_to_buffer()
            .context("Failed to render XLSX workbook")?;
        Ok(bytes)
    }
}

impl ExportSink for XlsxSink {
    fn write(&self, grid: &ExportGrid, path: &Path) -> Result<()> {
        let bytes = Self::render(grid)?;

        let mut file = AtomicWriteFile::open(path)
            .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
        file.write_all(&bytes)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        file.commit()
            .with_context(|| format!("Failed to save {}", path.display()))?;
        Ok(())
    }
}
