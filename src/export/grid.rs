use crate::catalog::Scheme;
use crate::scoring::{compute_totals, ScoringState};
use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt;

/// Separator placed between required-documentation blocks in one cell
pub const DOCS_SEPARATOR: &str = " || ";

pub const COLUMN_HEADERS: [&str; 8] = [
    "Category",
    "Credit ID",
    "Type",
    "Credit Name",
    "Points Earned",
    "Max Points",
    "Required Documentation (joined)",
    "Source",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Text(String),
    Number(u32),
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => f.write_str(s),
            Cell::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<u32> for Cell {
    fn from(n: u32) -> Self {
        Cell::Number(n)
    }
}

/// Row-major sheet handed to an export sink. Rows may differ in length;
/// blank separator rows are empty.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExportGrid {
    rows: Vec<Vec<Cell>>,
}

impl ExportGrid {
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    fn push<I, C>(&mut self, row: I)
    where
        I: IntoIterator<Item = C>,
        C: Into<Cell>,
    {
        self.rows.push(row.into_iter().map(Into::into).collect());
    }

    fn blank(&mut self) {
        self.rows.push(Vec::new());
    }
}

/// Lay out the scored checklist as a sheet:
/// summary header, blank row, column headers, one row per credit, blank row,
/// then the three total rows.
pub fn build_grid(
    project_name: &str,
    scheme: &Scheme,
    state: &ScoringState,
    exported_at: DateTime<Utc>,
) -> ExportGrid {
    let totals = compute_totals(scheme, state);
    let mut grid = ExportGrid::default();

    grid.push(["Project Name", project_name]);
    grid.push(["LEED Version", scheme.display_name.as_str()]);
    grid.push([
        "Exported At".to_string(),
        exported_at.to_rfc3339_opts(SecondsFormat::Millis, true),
    ]);
    grid.blank();
    grid.push(COLUMN_HEADERS);

    for category in &scheme.categories {
        for credit in &category.credits {
            grid.rows.push(vec![
                Cell::from(category.name.as_str()),
                Cell::from(credit.id.as_str()),
                Cell::from(credit.kind.label()),
                Cell::from(credit.name.as_str()),
                Cell::from(state.earned(&credit.id)),
                Cell::from(credit.max_points),
                Cell::from(credit.required_docs.join(DOCS_SEPARATOR)),
                Cell::from(credit.source.as_str()),
            ]);
        }
    }

    grid.blank();
    grid.rows.push(vec![Cell::from("Total Points Earned"), Cell::from(totals.total_earned)]);
    grid.rows.push(vec![Cell::from("Total Points Available"), Cell::from(totals.total_max)]);
    grid.rows.push(vec![Cell::from("Predicted LEED Level"), Cell::from(totals.level)]);

    grid
}
