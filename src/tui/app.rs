use crate::catalog::{Catalog, Category, Credit, Scheme};
use crate::error::ChecklistError;
use crate::export::{export_checklist, ExportFormat};
use crate::scoring::{coerce_points, compute_totals, migrate, ScoringState, Totals};
use crate::tui::theme::ThemeColors;
use crate::verbose;
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Instant;

const FLASH_SECS: u64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    EditPoints,
    ProjectName,
    SchemePicker,
    Help,
}

/// A visible line of the checklist table, by index into the active scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Row {
    Category(usize),
    Credit(usize, usize),
    /// One required-documentation block of an expanded credit
    Doc(usize, usize, usize),
}

pub struct App {
    pub catalog: Catalog,
    pub scheme: Scheme,
    pub state: ScoringState,
    pub project_name: String,
    pub expanded_categories: BTreeSet<String>,
    pub expanded_credits: BTreeSet<String>,
    pub table_state: ratatui::widgets::TableState,
    pub input_mode: InputMode,
    pub input: String,
    pub flash_message: Option<(String, Instant)>,
    pub should_quit: bool,
    pub export_dir: PathBuf,
    pub export_format: ExportFormat,
    pub theme: ThemeColors,
}

impl App {
    pub fn new(
        catalog: Catalog,
        scheme_key: &str,
        project_name: String,
        export_dir: PathBuf,
        export_format: ExportFormat,
        theme: ThemeColors,
    ) -> Result<Self, ChecklistError> {
        let scheme = catalog.scheme(scheme_key)?.clone();
        let state = ScoringState::new(&scheme);

        let mut table_state = ratatui::widgets::TableState::default();
        if !scheme.categories.is_empty() {
            table_state.select(Some(0));
        }

        Ok(Self {
            catalog,
            scheme,
            state,
            project_name,
            expanded_categories: BTreeSet::new(),
            expanded_credits: BTreeSet::new(),
            table_state,
            input_mode: InputMode::Normal,
            input: String::new(),
            flash_message: None,
            should_quit: false,
            export_dir,
            export_format,
            theme,
        })
    }

    pub fn totals(&self) -> Totals {
        compute_totals(&self.scheme, &self.state)
    }

    /// Rows currently shown: every category, the credits of expanded
    /// categories, and the documentation of expanded credits
    pub fn visible_rows(&self) -> Vec<Row> {
        let mut rows = Vec::new();
        for (ci, category) in self.scheme.categories.iter().enumerate() {
            rows.push(Row::Category(ci));
            if !self.expanded_categories.contains(&category.id) {
                continue;
            }
            for (ki, credit) in category.credits.iter().enumerate() {
                rows.push(Row::Credit(ci, ki));
                if self.expanded_credits.contains(&credit.id) {
                    for di in 0..credit.required_docs.len() {
                        rows.push(Row::Doc(ci, ki, di));
                    }
                }
            }
        }
        rows
    }

    pub fn selected_row(&self) -> Option<Row> {
        let rows = self.visible_rows();
        self.table_state.selected().and_then(|i| rows.get(i).copied())
    }

    /// Category and credit under the cursor (a doc row counts as its credit)
    pub fn selected_credit(&self) -> Option<(&Category, &Credit)> {
        match self.selected_row()? {
            Row::Credit(ci, ki) | Row::Doc(ci, ki, _) => {
                let category = self.scheme.categories.get(ci)?;
                let credit = category.credits.get(ki)?;
                Some((category, credit))
            }
            Row::Category(_) => None,
        }
    }

    pub fn next_row(&mut self) {
        let len = self.visible_rows().len();
        if len == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.table_state.select(Some(i));
    }

    pub fn previous_row(&mut self) {
        let len = self.visible_rows().len();
        if len == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.table_state.select(Some(i));
    }

    /// Expand or collapse whatever is under the cursor
    pub fn toggle_selected(&mut self) {
        let Some(row) = self.selected_row() else {
            return;
        };

        match row {
            Row::Category(ci) => {
                let id = self.scheme.categories[ci].id.clone();
                toggle(&mut self.expanded_categories, &id);
            }
            Row::Credit(ci, ki) | Row::Doc(ci, ki, _) => {
                let id = self.scheme.categories[ci].credits[ki].id.clone();
                toggle(&mut self.expanded_credits, &id);
                // Collapsing from a doc line puts the cursor back on its credit
                self.select_row(Row::Credit(ci, ki));
            }
        }
        self.clamp_selection();
    }

    pub fn expand_all(&mut self) {
        self.expanded_categories = self
            .scheme
            .categories
            .iter()
            .map(|c| c.id.clone())
            .collect();
    }

    pub fn collapse_all(&mut self) {
        let category = match self.selected_row() {
            Some(Row::Category(ci)) | Some(Row::Credit(ci, _)) | Some(Row::Doc(ci, _, _)) => ci,
            None => 0,
        };
        self.expanded_categories.clear();
        self.expanded_credits.clear();
        self.select_row(Row::Category(category));
        self.clamp_selection();
    }

    fn select_row(&mut self, row: Row) {
        if let Some(pos) = self.visible_rows().iter().position(|r| *r == row) {
            self.table_state.select(Some(pos));
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.visible_rows().len();
        match self.table_state.selected() {
            _ if len == 0 => self.table_state.select(None),
            Some(i) if i >= len => self.table_state.select(Some(len - 1)),
            None => self.table_state.select(Some(0)),
            Some(_) => {}
        }
    }

    /// Enter point editing for the selected credit, optionally seeding the
    /// input with the first typed character
    pub fn start_edit(&mut self, first: Option<char>) {
        let (editable, earned) = match self.selected_credit() {
            Some((_, credit)) => (credit.is_editable(), self.state.earned(&credit.id)),
            None => {
                self.show_flash("Select a credit to edit its points".to_string());
                return;
            }
        };

        if !editable {
            self.show_flash("Prerequisites are pass/fail and carry no points".to_string());
            return;
        }

        self.input = match first {
            Some(c) => c.to_string(),
            None => earned.to_string(),
        };
        self.input_mode = InputMode::EditPoints;
    }

    /// Apply the typed value to the selected credit
    pub fn confirm_edit(&mut self) {
        self.input_mode = InputMode::Normal;
        let raw = std::mem::take(&mut self.input);

        let Some((category_id, credit_id, max)) = self
            .selected_credit()
            .map(|(cat, credit)| (cat.id.clone(), credit.id.clone(), credit.max_points))
        else {
            return;
        };

        match self
            .state
            .set_earned_points(&self.scheme, &category_id, &credit_id, &raw)
        {
            Ok(next) => {
                self.state = next;
                let earned = self.state.earned(&credit_id);
                let requested = coerce_points(&raw);
                if requested != earned as i64 {
                    self.show_flash(format!(
                        "Set {}: {}/{} (adjusted from '{}')",
                        credit_id,
                        earned,
                        max,
                        raw.trim()
                    ));
                } else {
                    self.show_flash(format!("Set {}: {}/{}", credit_id, earned, max));
                }
            }
            Err(e) => self.show_flash(format!("Error: {}", e)),
        }
    }

    pub fn cancel_edit(&mut self) {
        self.input_mode = InputMode::Normal;
        self.input.clear();
    }

    /// Step the selected credit's points up or down, staying in range
    pub fn adjust_selected(&mut self, delta: i64) {
        let Some((category_id, credit_id, editable)) = self
            .selected_credit()
            .map(|(cat, credit)| (cat.id.clone(), credit.id.clone(), credit.is_editable()))
        else {
            return;
        };
        if !editable {
            return;
        }

        let value = self.state.earned(&credit_id) as i64 + delta;
        match self
            .state
            .set_points(&self.scheme, &category_id, &credit_id, value)
        {
            Ok(next) => self.state = next,
            Err(e) => self.show_flash(format!("Error: {}", e)),
        }
    }

    pub fn start_project_input(&mut self) {
        self.input = self.project_name.clone();
        self.input_mode = InputMode::ProjectName;
    }

    pub fn confirm_project_input(&mut self) {
        self.project_name = std::mem::take(&mut self.input).trim().to_string();
        self.input_mode = InputMode::Normal;
        if self.project_name.is_empty() {
            self.show_flash("Project name cleared".to_string());
        } else {
            self.show_flash(format!("Project: {}", self.project_name));
        }
    }

    pub fn cancel_project_input(&mut self) {
        self.input_mode = InputMode::Normal;
        self.input.clear();
    }

    /// Switch the active scheme, carrying points over by credit id.
    /// Expanded rows are reset.
    pub fn switch_scheme(&mut self, key: &str) -> Result<(), ChecklistError> {
        if key == self.scheme.key {
            return Ok(());
        }

        let new_scheme = self.catalog.scheme(key)?.clone();
        let (state, report) = migrate(&self.scheme, &self.state, &new_scheme);
        verbose!(
            "Switched {} -> {}: {} (clamped: {:?}, dropped: {:?})",
            self.scheme.key,
            new_scheme.key,
            report.summary(),
            report.clamped,
            report.dropped
        );

        self.scheme = new_scheme;
        self.state = state;
        self.expanded_categories.clear();
        self.expanded_credits.clear();
        self.table_state.select(None);
        self.clamp_selection();

        self.show_flash(format!(
            "Switched to {}: {}",
            self.scheme.display_name,
            report.summary()
        ));
        Ok(())
    }

    pub fn show_scheme_picker(&mut self) {
        self.input_mode = InputMode::SchemePicker;
    }

    /// Switch to the scheme at `index` in catalog order and close the picker
    pub fn pick_scheme(&mut self, index: usize) {
        let Some(key) = self.catalog.schemes().get(index).map(|s| s.key.clone()) else {
            return;
        };
        self.input_mode = InputMode::Normal;
        if let Err(e) = self.switch_scheme(&key) {
            self.show_flash(format!("Error: {}", e));
        }
    }

    pub fn dismiss_scheme_picker(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn cycle_scheme(&mut self, forward: bool) {
        let key = self.catalog.cycle_key(&self.scheme.key, forward).to_string();
        if let Err(e) = self.switch_scheme(&key) {
            self.show_flash(format!("Error: {}", e));
        }
    }

    /// Open the selected credit's source page in the browser
    pub fn open_selected(&mut self) {
        let result = match self.selected_credit() {
            Some((_, credit)) => crate::browser::open_source(credit).map(|_| credit.id.clone()),
            None => return,
        };
        match result {
            Ok(id) => self.show_flash(format!("Opened: {}", id)),
            Err(e) => self.show_flash(format!("Failed to open browser: {}", e)),
        }
    }

    /// Write the checklist to the export directory; the outcome is flashed
    pub fn export(&mut self, format: ExportFormat) {
        match export_checklist(
            &self.project_name,
            &self.scheme,
            &self.state,
            &self.export_dir,
            format,
            chrono::Local::now(),
        ) {
            Ok(path) => {
                verbose!("Exported {}", path.display());
                self.show_flash(format!("Exported: {}", path.display()));
            }
            Err(e) => self.show_flash(format!("Failed to export: {:#}", e)),
        }
    }

    pub fn show_help(&mut self) {
        self.input_mode = InputMode::Help;
    }

    pub fn dismiss_help(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn update_flash(&mut self) {
        if let Some((_, timestamp)) = self.flash_message {
            if timestamp.elapsed().as_secs() >= FLASH_SECS {
                self.flash_message = None;
            }
        }
    }

    pub fn show_flash(&mut self, msg: String) {
        self.flash_message = Some((msg, Instant::now()));
    }
}

/// Symmetric difference of `set` with `{id}`
fn toggle(set: &mut BTreeSet<String>, id: &str) {
    if !set.remove(id) {
        set.insert(id.to_string());
    }
}
