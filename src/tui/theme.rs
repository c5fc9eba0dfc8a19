//! Centralized theme module for TUI color constants and styles

use ratatui::prelude::*;

/// Which palette to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Theme {
    /// Detect from the terminal background
    #[default]
    Auto,
    Dark,
    Light,
}

/// Complete color palette for the TUI
#[derive(Debug, Clone)]
pub struct ThemeColors {
    // Progress colors (level reached / close / far)
    pub progress_high: Color,
    pub progress_mid: Color,
    pub progress_low: Color,
    pub bar_empty: Color,

    // Table colors
    pub category_fg: Color,
    pub credit_id: Color,
    pub prerequisite: Color,
    pub docs_fg: Color,
    pub row_selected: Style,
    pub header_style: Style,

    // General colors
    pub muted: Color,
    pub title_color: Color,

    // Tab colors
    pub tab_active_style: Style,
    pub tab_inactive_style: Style,

    // Status bar colors
    pub status_bar_bg: Color,
    pub status_key_color: Color,
    pub flash_success: Color,
    pub flash_error: Color,

    // Popup overlay colors
    pub popup_border: Color,
    pub popup_title: Style,
}

impl ThemeColors {
    pub fn dark() -> Self {
        Self {
            progress_high: Color::Green,
            progress_mid: Color::Yellow,
            progress_low: Color::Red,
            bar_empty: Color::DarkGray,
            category_fg: Color::White,
            credit_id: Color::Gray,
            prerequisite: Color::Magenta,
            docs_fg: Color::Gray,
            row_selected: Style::new().reversed(),
            header_style: Style::new().bold(),
            muted: Color::Gray,
            title_color: Color::Cyan,
            tab_active_style: Style::new().fg(Color::Cyan).bold().reversed(),
            tab_inactive_style: Style::new().fg(Color::DarkGray),
            status_bar_bg: Color::Indexed(236),
            status_key_color: Color::Cyan,
            flash_success: Color::Green,
            flash_error: Color::Red,
            popup_border: Color::Cyan,
            popup_title: Style::new().fg(Color::Cyan).bold(),
        }
    }

    pub fn light() -> Self {
        Self {
            progress_high: Color::Rgb(0, 128, 0),
            progress_mid: Color::Rgb(176, 112, 0),
            progress_low: Color::Rgb(180, 0, 0),
            bar_empty: Color::Indexed(250),
            category_fg: Color::Black,
            credit_id: Color::DarkGray,
            prerequisite: Color::Rgb(128, 0, 128),
            docs_fg: Color::DarkGray,
            row_selected: Style::new().reversed(),
            header_style: Style::new().bold(),
            muted: Color::DarkGray,
            title_color: Color::Blue,
            tab_active_style: Style::new().fg(Color::Blue).bold().reversed(),
            tab_inactive_style: Style::new().fg(Color::Gray),
            status_bar_bg: Color::Indexed(254),
            status_key_color: Color::Blue,
            flash_success: Color::Rgb(0, 128, 0),
            flash_error: Color::Rgb(180, 0, 0),
            popup_border: Color::Blue,
            popup_title: Style::new().fg(Color::Blue).bold(),
        }
    }

    /// Color for a points fraction: green when full, red when empty
    pub fn progress_color(&self, earned: u32, max: u32) -> Color {
        let percentage = if max > 0 {
            (earned as f64 / max as f64) * 100.0
        } else {
            0.0
        };

        if percentage >= 70.0 {
            self.progress_high
        } else if percentage >= 40.0 {
            self.progress_mid
        } else {
            self.progress_low
        }
    }
}

/// Pick a palette, querying the terminal background for `Theme::Auto`.
///
/// Must run before the TUI enters raw mode.
pub fn resolve_theme(theme: Theme) -> ThemeColors {
    match theme {
        Theme::Dark => ThemeColors::dark(),
        Theme::Light => ThemeColors::light(),
        Theme::Auto => match terminal_light::luma() {
            Ok(luma) if luma > 0.6 => ThemeColors::light(),
            _ => ThemeColors::dark(),
        },
    }
}
