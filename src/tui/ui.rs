use ratatui::prelude::*;
use ratatui::widgets::{Block, Cell, Clear, Paragraph, Row as TableRow, Table, Tabs};

use crate::catalog::CreditType;
use crate::output::formatter::truncate_name;
use crate::scoring::category_totals;
use crate::tui::app::{App, InputMode, Row};

const APP_TITLE: &str = "LEED Simulator";

pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Handle very small terminal sizes gracefully
    if area.height < 6 || area.width < 30 {
        let msg = Paragraph::new("Terminal too small").alignment(Alignment::Center);
        frame.render_widget(msg, area);
        return;
    }

    // Layout: Title(1) + Tabs(1) + Table(fill) + Status(1)
    let chunks = Layout::vertical([
        Constraint::Length(1), // Title bar
        Constraint::Length(1), // Scheme tabs
        Constraint::Fill(1),   // Checklist table
        Constraint::Length(1), // Status bar
    ])
    .split(area);

    render_title(frame, chunks[0], app);
    render_tabs(frame, chunks[1], app);
    render_table(frame, chunks[2], app);
    render_status_bar(frame, chunks[3], app);

    // Render overlays based on input mode
    match app.input_mode {
        InputMode::EditPoints => render_edit_popup(frame, app),
        InputMode::ProjectName => render_project_popup(frame, app),
        InputMode::SchemePicker => render_scheme_picker(frame, app),
        InputMode::Help => render_help_popup(frame, app),
        InputMode::Normal => {}
    }
}

fn render_title(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let totals = app.totals();

    let left = if app.project_name.is_empty() {
        APP_TITLE.to_string()
    } else {
        format!("{} | {}", APP_TITLE, app.project_name)
    };

    let mut right = format!(
        "{} / {} pts  Level: {}",
        totals.total_earned, totals.total_max, totals.level
    );
    if let Some(next) = &totals.next_level {
        right.push_str(&format!(" ({} to {})", next.points_needed, next.level));
    }

    let level_color = if totals.has_level() {
        theme.progress_high
    } else {
        theme.muted
    };

    let padding_len =
        (area.width as usize).saturating_sub(left.chars().count() + right.chars().count());

    let title = Line::from(vec![
        Span::styled(left, Style::default().fg(theme.title_color).bold()),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right, Style::default().fg(level_color)),
    ]);
    frame.render_widget(Paragraph::new(title), area);
}

fn render_tabs(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let schemes = app.catalog.schemes();
    let titles: Vec<String> = schemes.iter().map(|s| s.display_name.clone()).collect();
    let selected = schemes
        .iter()
        .position(|s| s.key == app.scheme.key)
        .unwrap_or(0);

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(theme.tab_inactive_style)
        .highlight_style(theme.tab_active_style)
        .divider(" | ");

    frame.render_widget(tabs, area);
}

fn render_table(frame: &mut Frame, area: Rect, app: &mut App) {
    let theme = &app.theme;
    let name_width = (area.width as usize).saturating_sub(12 + 14 + 9 + 12 + 6).max(10);

    let rows: Vec<TableRow> = app
        .visible_rows()
        .into_iter()
        .map(|row| match row {
            Row::Category(ci) => {
                let category = &app.scheme.categories[ci];
                let (earned, max) = category_totals(category, &app.state);
                let marker = if app.expanded_categories.contains(&category.id) {
                    "▾"
                } else {
                    "▸"
                };
                TableRow::new(vec![
                    Cell::from(format!(
                        "{} {}",
                        marker,
                        truncate_name(&category.name, name_width)
                    ))
                    .style(Style::default().fg(theme.category_fg).bold()),
                    Cell::from(""),
                    Cell::from(format!("{} credits", category.credits.len()))
                        .style(Style::default().fg(theme.muted)),
                    Cell::from(format!("{:>3}/{:<3}", earned, max)),
                    Cell::from(points_bar(earned, max, 10, app)),
                ])
            }
            Row::Credit(ci, ki) => {
                let credit = &app.scheme.categories[ci].credits[ki];
                let marker = if credit.required_docs.is_empty() {
                    " "
                } else if app.expanded_credits.contains(&credit.id) {
                    "▾"
                } else {
                    "▸"
                };
                let (kind_style, points) = match credit.kind {
                    CreditType::Prerequisite => {
                        (Style::default().fg(theme.prerequisite), "req".to_string())
                    }
                    CreditType::Credit => (
                        Style::default(),
                        format!("{:>3}/{:<3}", app.state.earned(&credit.id), credit.max_points),
                    ),
                };
                TableRow::new(vec![
                    Cell::from(format!(
                        "  {} {}",
                        marker,
                        truncate_name(&credit.name, name_width.saturating_sub(2))
                    )),
                    Cell::from(credit.id.clone()).style(Style::default().fg(theme.credit_id)),
                    Cell::from(credit.kind.label()).style(kind_style),
                    Cell::from(points).style(kind_style),
                    Cell::from(""),
                ])
            }
            Row::Doc(ci, ki, di) => {
                let doc = &app.scheme.categories[ci].credits[ki].required_docs[di];
                TableRow::new(vec![Cell::from(format!("      • {}", doc))
                    .style(Style::default().fg(theme.docs_fg).italic())])
            }
        })
        .collect();

    let widths = [
        Constraint::Fill(1),    // Name
        Constraint::Length(12), // Credit id
        Constraint::Length(14), // Type
        Constraint::Length(9),  // Points: "  3/16 "
        Constraint::Length(12), // Bar
    ];

    let table = Table::new(rows, widths)
        .header(
            TableRow::new(vec!["Name", "ID", "Type", "Points", ""])
                .style(theme.header_style)
                .bottom_margin(1),
        )
        .row_highlight_style(theme.row_selected);

    frame.render_stateful_widget(table, area, &mut app.table_state);
}

fn points_bar(earned: u32, max: u32, width: usize, app: &App) -> Line<'static> {
    let ratio = if max > 0 {
        (earned as f64 / max as f64).min(1.0)
    } else {
        0.0
    };
    let filled = (ratio * width as f64).round() as usize;
    let empty = width.saturating_sub(filled);
    let bar_color = app.theme.progress_color(earned, max);

    let mut spans = Vec::new();
    if filled > 0 {
        spans.push(Span::styled("█".repeat(filled), Style::default().fg(bar_color)));
    }
    if empty > 0 {
        spans.push(Span::styled(
            "░".repeat(empty),
            Style::default().fg(app.theme.bar_empty),
        ));
    }
    Line::from(spans)
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let text = if let Some((ref msg, _)) = app.flash_message {
        let msg_color = if msg.starts_with("Failed") || msg.starts_with("Error") {
            theme.flash_error
        } else if msg.starts_with("Exported:") || msg.starts_with("Set ") {
            theme.flash_success
        } else {
            theme.muted
        };
        Line::from(Span::styled(msg.clone(), Style::default().fg(msg_color)))
    } else {
        let hints = [
            ("j/k", ":nav "),
            ("Enter", ":expand "),
            ("e", ":points "),
            ("Tab", ":scheme "),
            ("x", ":export "),
            ("?", ":help "),
            ("q", ":quit"),
        ];

        let mut spans = vec![
            Span::styled(
                format!("{} ", app.scheme.display_name),
                Style::default().fg(theme.muted),
            ),
            Span::raw(" "),
        ];
        for (i, (key, label)) in hints.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" "));
            }
            spans.push(Span::styled(*key, Style::default().fg(theme.status_key_color)));
            spans.push(Span::raw(*label));
        }
        Line::from(spans)
    };

    frame.render_widget(
        Paragraph::new(text).style(Style::default().bg(theme.status_bar_bg)),
        area,
    );
}

/// Render a single-line input popup
fn render_input_popup(frame: &mut Frame, app: &App, title: String, help: &str) {
    let popup_area = centered_rect_fixed(50, 5, frame.area());

    // Clear the background
    frame.render_widget(Clear, popup_area);

    let block = Block::bordered()
        .title(Span::styled(title, app.theme.popup_title))
        .border_style(Style::default().fg(app.theme.popup_border));
    frame.render_widget(block.clone(), popup_area);

    let inner = block.inner(popup_area);
    let chunks = Layout::vertical([
        Constraint::Length(1), // Input line
        Constraint::Length(1), // Help text
    ])
    .split(inner);

    frame.render_widget(Paragraph::new(format!("{}|", app.input)), chunks[0]);
    frame.render_widget(
        Paragraph::new(help.to_string()).style(Style::default().fg(app.theme.muted)),
        chunks[1],
    );
}

fn render_edit_popup(frame: &mut Frame, app: &App) {
    let title = match app.selected_credit() {
        Some((_, credit)) => format!(" {} (0-{}) ", credit.id, credit.max_points),
        None => " Points ".to_string(),
    };
    render_input_popup(frame, app, title, "Enter: apply | Esc: cancel");
}

fn render_project_popup(frame: &mut Frame, app: &App) {
    render_input_popup(
        frame,
        app,
        " Project Name ".to_string(),
        "Enter: save | Esc: cancel",
    );
}

fn render_scheme_picker(frame: &mut Frame, app: &App) {
    let schemes = app.catalog.schemes();
    let popup_area = centered_rect_fixed(44, schemes.len() as u16 + 4, frame.area());

    frame.render_widget(Clear, popup_area);

    let block = Block::bordered()
        .title(Span::styled(" Switch Scheme ", app.theme.popup_title))
        .border_style(Style::default().fg(app.theme.popup_border));
    frame.render_widget(block.clone(), popup_area);

    let mut lines: Vec<Line> = schemes
        .iter()
        .enumerate()
        .map(|(i, scheme)| {
            let style = if scheme.key == app.scheme.key {
                Style::default().bold()
            } else {
                Style::default()
            };
            Line::from(vec![
                Span::styled(
                    format!("{}  ", i + 1),
                    Style::default().fg(app.theme.status_key_color).bold(),
                ),
                Span::styled(scheme.display_name.clone(), style),
            ])
        })
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Esc to cancel",
        Style::default().fg(app.theme.muted),
    )));

    frame.render_widget(Paragraph::new(lines), block.inner(popup_area));
}

/// Create a centered rectangle with fixed width and height
fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    // Clamp dimensions to area bounds
    let width = width.min(area.width);
    let height = height.min(area.height);

    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;

    Rect {
        x,
        y,
        width,
        height,
    }
}

/// Render the help overlay popup
fn render_help_popup(frame: &mut Frame, app: &App) {
    let popup_area = centered_rect_fixed(52, 20, frame.area());

    frame.render_widget(Clear, popup_area);

    let block = Block::bordered()
        .title(Span::styled(" Keyboard Shortcuts ", app.theme.popup_title))
        .border_style(Style::default().fg(app.theme.popup_border));
    frame.render_widget(block.clone(), popup_area);

    let inner = block.inner(popup_area);

    let export_label = format!("Export ({})", app.export_format.extension());
    let other_label = format!("Export ({})", app.export_format.other().extension());
    let entries: Vec<(&str, &str)> = vec![
        ("j / Down", "Move down"),
        ("k / Up", "Move up"),
        ("Enter / Space", "Expand or collapse"),
        ("E / c", "Expand all / collapse all"),
        ("e / 0-9", "Edit points"),
        ("+ / -", "Step points up or down"),
        ("Tab / S-Tab", "Next / previous scheme"),
        ("v", "Pick a scheme"),
        ("p", "Edit project name"),
        ("o", "Open credit reference"),
        ("x", export_label.as_str()),
        ("X", other_label.as_str()),
        ("?", "Show/hide this help"),
        ("q / Ctrl-c", "Quit"),
    ];

    let key_style = Style::default().fg(app.theme.status_key_color).bold();
    let mut help_lines: Vec<Line> = entries
        .into_iter()
        .map(|(key, desc)| {
            Line::from(vec![
                Span::styled(format!("{:<16}", key), key_style),
                Span::raw(desc.to_string()),
            ])
        })
        .collect();
    help_lines.push(Line::from(""));
    help_lines.push(Line::from(Span::styled(
        "Press any key to close",
        Style::default().fg(app.theme.muted),
    )));

    frame.render_widget(Paragraph::new(help_lines), inner);
}
