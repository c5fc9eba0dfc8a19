use std::io::IsTerminal;
use owo_colors::OwoColorize;
use terminal_size::{Width, terminal_size};

use crate::catalog::{Catalog, Credit, Scheme};
use crate::scoring::{category_totals, ScoringState, Totals};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a name to fit available width, accounting for Unicode
pub(crate) fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// One line per scheme: key, display name, available points, thresholds
pub fn format_scheme_list(catalog: &Catalog, use_colors: bool) -> String {
    let key_width = catalog.keys().iter().map(|k| k.len()).max().unwrap_or(0);

    catalog
        .schemes()
        .iter()
        .map(|scheme| {
            let key = format!("{:<width$}", scheme.key, width = key_width);
            let thresholds = scheme
                .thresholds
                .iter()
                .map(|t| format!("{} {}", t.level, t.min_points))
                .collect::<Vec<_>>()
                .join(", ");
            let points = format!("{} pts", scheme.max_points());

            if use_colors {
                format!(
                    "{}  {}  {}  {}",
                    key.bold(),
                    scheme.display_name,
                    points.cyan(),
                    thresholds.dimmed()
                )
            } else {
                format!("{}  {}  {}  {}", key, scheme.display_name, points, thresholds)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Earned/max cell for a credit; prerequisites show "req"
fn format_points(credit: &Credit, earned: u32) -> String {
    if credit.is_editable() {
        format!("{}/{}", earned, credit.max_points)
    } else {
        "req".to_string()
    }
}

/// Format the scored checklist: a header line per category followed by its
/// credits (id, points, name). Names are truncated to the terminal width.
pub fn format_checklist(scheme: &Scheme, state: &ScoringState, use_colors: bool) -> String {
    let term_width = get_terminal_width();

    // Indent 2 + id 10 + points 6 + separators
    let id_width = 10;
    let points_width = 6;
    let fixed_width = 2 + id_width + 2 + points_width + 2;

    let mut lines = Vec::new();
    for category in &scheme.categories {
        let (earned, max) = category_totals(category, state);
        let subtotal = format!("{}/{}", earned, max);
        if use_colors {
            lines.push(format!("{}  {}", category.name.bold(), subtotal.cyan()));
        } else {
            lines.push(format!("{}  {}", category.name, subtotal));
        }

        for credit in &category.credits {
            let id = format!("{:<width$}", credit.id, width = id_width);
            let points = format!(
                "{:>width$}",
                format_points(credit, state.earned(&credit.id)),
                width = points_width
            );

            let name = match term_width {
                Some(width) if width > fixed_width + 10 => {
                    truncate_name(&credit.name, width - fixed_width)
                }
                Some(_) => truncate_name(&credit.name, 20),
                None => credit.name.clone(),
            };

            if use_colors {
                let points = if credit.is_editable() {
                    points.bold().to_string()
                } else {
                    points.dimmed().to_string()
                };
                lines.push(format!("  {}  {}  {}", id.dimmed(), points, name));
            } else {
                lines.push(format!("  {}  {}  {}", id, points, name));
            }
        }
    }

    lines.join("\n")
}

/// Summary line: total earned against available, level, and the gap to the
/// next level when there is one
pub fn format_totals(totals: &Totals, use_colors: bool) -> String {
    let total = format!("{} / {}", totals.total_earned, totals.total_max);
    let gap = totals
        .next_level
        .as_ref()
        .map(|next| format!(" ({} more for {})", next.points_needed, next.level))
        .unwrap_or_default();

    if use_colors {
        let level = if totals.has_level() {
            totals.level.green().bold().to_string()
        } else {
            totals.level.yellow().to_string()
        };
        format!("Total: {}  Level: {}{}", total.bold(), level, gap.dimmed())
    } else {
        format!("Total: {}  Level: {}{}", total, totals.level, gap)
    }
}
