pub mod formatter;
pub mod report;

pub use formatter::{format_checklist, format_scheme_list, format_totals, should_use_colors};
pub use report::{build_report, ChecklistReport};
