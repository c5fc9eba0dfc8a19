pub mod app;
pub mod event;
pub mod theme;
pub mod ui;

pub use app::App;
pub use theme::{resolve_theme, Theme, ThemeColors};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use event::{Event, EventHandler};

pub async fn run_tui(mut app: App) -> anyhow::Result<()> {
    // Hold diagnostics while the TUI owns the terminal
    crate::stderr_buffer::hold();

    // Init terminal (sets up panic hooks automatically)
    let mut terminal = ratatui::init();

    let mut events = EventHandler::new(250);

    let result = loop {
        if let Err(e) = terminal.draw(|frame| ui::draw(frame, &mut app)) {
            break Err(e.into());
        }

        match events.next().await {
            Some(Event::Key(key)) => handle_key_event(&mut app, key),
            Some(Event::Tick) => app.update_flash(),
            None => break Ok(()),
        }

        if app.should_quit {
            break Ok(());
        }
    };

    ratatui::restore();

    // Flush held diagnostics now that the terminal is restored
    for msg in crate::stderr_buffer::release() {
        eprintln!("{}", msg);
    }

    result
}

fn handle_key_event(app: &mut App, key: KeyEvent) {
    match app.input_mode {
        app::InputMode::Normal => match key.code {
            // Quit
            KeyCode::Char('q') => app.should_quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                app.should_quit = true
            }

            // Navigation
            KeyCode::Char('j') | KeyCode::Down => app.next_row(),
            KeyCode::Char('k') | KeyCode::Up => app.previous_row(),

            // Expand / collapse
            KeyCode::Enter | KeyCode::Char(' ') => app.toggle_selected(),
            KeyCode::Char('E') => app.expand_all(),
            KeyCode::Char('c') => app.collapse_all(),

            // Points
            KeyCode::Char('e') => app.start_edit(None),
            KeyCode::Char(c) if c.is_ascii_digit() => app.start_edit(Some(c)),
            KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Right => app.adjust_selected(1),
            KeyCode::Char('-') | KeyCode::Left => app.adjust_selected(-1),

            // Scheme switching
            KeyCode::Tab => app.cycle_scheme(true),
            KeyCode::BackTab => app.cycle_scheme(false),
            KeyCode::Char('v') => app.show_scheme_picker(),

            KeyCode::Char('p') => app.start_project_input(),
            KeyCode::Char('o') => app.open_selected(),

            // Export
            KeyCode::Char('x') => app.export(app.export_format),
            KeyCode::Char('X') => app.export(app.export_format.other()),

            // Help
            KeyCode::Char('?') => app.show_help(),

            _ => {}
        },
        app::InputMode::EditPoints => match key.code {
            KeyCode::Enter => app.confirm_edit(),
            KeyCode::Esc => app.cancel_edit(),
            KeyCode::Backspace => {
                app.input.pop();
            }
            KeyCode::Char(c) if c.is_ascii_digit() || c == '.' || c == '-' => {
                app.input.push(c);
            }
            // Ignore all other keys (don't propagate to Normal mode)
            _ => {}
        },
        app::InputMode::ProjectName => match key.code {
            KeyCode::Enter => app.confirm_project_input(),
            KeyCode::Esc => app.cancel_project_input(),
            KeyCode::Backspace => {
                app.input.pop();
            }
            KeyCode::Char(c) if !c.is_control() => app.input.push(c),
            _ => {}
        },
        app::InputMode::SchemePicker => match key.code {
            KeyCode::Esc | KeyCode::Char('v') | KeyCode::Char('q') => {
                app.dismiss_scheme_picker()
            }
            KeyCode::Char(c) => {
                if let Some(n) = c.to_digit(10).filter(|n| *n > 0) {
                    app.pick_scheme(n as usize - 1);
                }
            }
            _ => {}
        },
        app::InputMode::Help => {
            // Any key exits help
            app.dismiss_help();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::export::ExportFormat;
    use crossterm::event::KeyEvent;

    fn sample_app() -> App {
        App::new(
            Catalog::builtin().unwrap(),
            "v4",
            String::new(),
            std::env::temp_dir(),
            ExportFormat::Csv,
            ThemeColors::dark(),
        )
        .unwrap()
    }

    fn press(app: &mut App, code: KeyCode) {
        handle_key_event(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_digit_starts_edit_and_enter_applies() {
        let mut app = sample_app();
        press(&mut app, KeyCode::Enter); // expand "lt"
        press(&mut app, KeyCode::Char('j')); // LT-1
        press(&mut app, KeyCode::Char('1'));
        press(&mut app, KeyCode::Char('2'));
        assert_eq!(app.input, "12");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.state.earned("LT-1"), 12);
        assert_eq!(app.totals().total_earned, 12);
    }

    #[test]
    fn test_edit_ignores_letters() {
        let mut app = sample_app();
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char('e'));
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.should_quit);
        assert_eq!(app.input, "0");
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.input_mode, app::InputMode::Normal);
    }

    #[test]
    fn test_tab_cycles_scheme() {
        let mut app = sample_app();
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.scheme.key, "v4.1");
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.scheme.key, "v4");
    }

    #[test]
    fn test_scheme_picker_keys() {
        let mut app = sample_app();
        press(&mut app, KeyCode::Char('v'));
        press(&mut app, KeyCode::Char('0'));
        assert_eq!(app.input_mode, app::InputMode::SchemePicker);
        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.scheme.key, "v5");
        assert_eq!(app.input_mode, app::InputMode::Normal);
    }

    #[test]
    fn test_help_dismissed_by_any_key() {
        let mut app = sample_app();
        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.input_mode, app::InputMode::Help);
        press(&mut app, KeyCode::Char('q'));
        assert_eq!(app.input_mode, app::InputMode::Normal);
        assert!(!app.should_quit);
    }

    #[test]
    fn test_quit() {
        let mut app = sample_app();
        handle_key_event(
            &mut app,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );
        assert!(app.should_quit);
    }
}
