use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, size as terminal_size, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;
use tracing::info;

use crate::calendar::ViewMode;
use crate::tui::app::{Mode, NoteField};
use crate::tui::error::TuiError;
use crate::tui::layout::Layout;
use crate::tui::App;
use crate::utils::{parse_key_binding, today, KeyBinding};

/// Restores the terminal when dropped, panics included. A TUI that dies in
/// raw mode or on the alternate screen leaves the user's shell unusable.
struct TerminalGuard {
    raw_mode_enabled: bool,
    alternate_screen_enabled: bool,
}

impl TerminalGuard {
    fn new() -> Result<Self, TuiError> {
        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;
        Ok(Self {
            raw_mode_enabled: true,
            alternate_screen_enabled: true,
        })
    }

    /// Restore on normal exit; drop does nothing afterwards
    fn restore(&mut self) -> Result<(), TuiError> {
        if self.raw_mode_enabled {
            disable_raw_mode()?;
            self.raw_mode_enabled = false;
        }
        if self.alternate_screen_enabled {
            execute!(io::stdout(), LeaveAlternateScreen)?;
            self.alternate_screen_enabled = false;
        }
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        // Already cleaning up; errors have nowhere to go
        if self.raw_mode_enabled {
            let _ = disable_raw_mode();
        }
        if self.alternate_screen_enabled {
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
        }
    }
}

pub fn run_event_loop(mut app: App) -> Result<(), TuiError> {
    // Checked before the alternate screen so the message stays visible
    let (width, height) = terminal_size()?;
    let min_width = Layout::MIN_WIDTH + 2;
    let min_height = Layout::MIN_HEIGHT + 2;
    if width < min_width || height < min_height {
        return Err(TuiError::RenderError(format!(
            "Terminal size too small. Current: {}x{}, Minimum required: {}x{}. Please resize your terminal window.",
            width, height, min_width, min_height
        )));
    }

    let mut guard = TerminalGuard::new()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
    info!("tui started");

    loop {
        app.check_status_message_timeout();
        app.refresh_today(today());

        let size = terminal.size()?;
        let area = Rect::new(0, 0, size.width, size.height);
        terminal.draw(|f| {
            let layout = Layout::calculate(area);
            crate::tui::render::render(f, &mut app, &layout);
        })?;

        if event::poll(Duration::from_millis(16))? {
            // Press only: Windows also reports Release
            if let Event::Key(key_event) = event::read()? {
                if key_event.kind == KeyEventKind::Press && handle_key_event(&mut app, key_event)? {
                    break;
                }
            }
        }
    }

    guard.restore()?;
    info!("tui stopped");
    Ok(())
}

fn binding(keys: &str) -> Result<KeyBinding, TuiError> {
    parse_key_binding(keys).map_err(TuiError::KeyBindingError)
}

/// Dispatch a key press. Returns true when the app should quit.
pub fn handle_key_event(app: &mut App, key_event: KeyEvent) -> Result<bool, TuiError> {
    if key_event.code == KeyCode::Char('c') && key_event.modifiers.contains(KeyModifiers::CONTROL) {
        return Ok(true);
    }

    match app.ui.mode {
        Mode::Help => handle_help_mode(app, key_event),
        Mode::Form => handle_form_mode(app, key_event),
        Mode::ConfirmDelete => handle_delete_confirmation_modal(app, key_event),
        Mode::Drawer => {
            if handle_drawer_keys(app, key_event)? {
                return Ok(false);
            }
            handle_calendar_keys(app, key_event)
        }
        Mode::Calendar => handle_calendar_keys(app, key_event),
    }
}

fn handle_help_mode(app: &mut App, key_event: KeyEvent) -> Result<bool, TuiError> {
    if key_event.code == KeyCode::Esc || binding(&app.config.key_bindings.help)?.matches(&key_event) {
        app.exit_help_mode();
    }
    Ok(false)
}

fn handle_delete_confirmation_modal(app: &mut App, key_event: KeyEvent) -> Result<bool, TuiError> {
    match key_event.code {
        KeyCode::Up | KeyCode::Down | KeyCode::Left | KeyCode::Right | KeyCode::Tab => {
            app.move_delete_selection();
        }
        KeyCode::Enter => app.confirm_delete(),
        KeyCode::Esc => app.cancel_delete(),
        _ => {}
    }
    Ok(false)
}

/// Keys that only mean something while a drawer is open. Returns true
/// when the key was consumed.
fn handle_drawer_keys(app: &mut App, key_event: KeyEvent) -> Result<bool, TuiError> {
    let kb = &app.config.key_bindings;
    let edit = binding(&kb.edit)?;
    let delete = binding(&kb.delete)?;
    let up = binding(&kb.cursor_up)?;
    let down = binding(&kb.cursor_down)?;
    let left = binding(&kb.cursor_left)?;
    let right = binding(&kb.cursor_right)?;

    if key_event.code == KeyCode::Esc {
        app.close_drawer();
    } else if edit.matches(&key_event) {
        app.enter_edit_mode();
    } else if delete.matches(&key_event) {
        app.request_delete();
    } else if key_event.code == KeyCode::Up || up.matches(&key_event) {
        app.move_drawer_selection(false);
    } else if key_event.code == KeyCode::Down || down.matches(&key_event) {
        app.move_drawer_selection(true);
    } else if key_event.code == KeyCode::Left || left.matches(&key_event) {
        app.move_cursor(-1);
        app.open_drawer_at_cursor();
    } else if key_event.code == KeyCode::Right || right.matches(&key_event) {
        app.move_cursor(1);
        app.open_drawer_at_cursor();
    } else {
        return Ok(false);
    }
    Ok(true)
}

fn handle_calendar_keys(app: &mut App, key_event: KeyEvent) -> Result<bool, TuiError> {
    let kb = app.config.key_bindings.clone();

    if binding(&kb.quit)?.matches(&key_event) {
        return Ok(true);
    }

    // Rows are weeks except in day view
    let row_step = if app.view_mode() == ViewMode::Day { 1 } else { 7 };

    if binding(&kb.help)?.matches(&key_event) {
        app.enter_help_mode();
    } else if binding(&kb.cycle_theme)?.matches(&key_event) {
        app.cycle_theme();
    } else if binding(&kb.prev_period)?.matches(&key_event) {
        app.step_period(-1);
    } else if binding(&kb.next_period)?.matches(&key_event) {
        app.step_period(1);
    } else if binding(&kb.view_day)?.matches(&key_event) {
        app.set_view_mode(ViewMode::Day);
    } else if binding(&kb.view_week)?.matches(&key_event) {
        app.set_view_mode(ViewMode::Week);
    } else if binding(&kb.view_month)?.matches(&key_event) {
        app.set_view_mode(ViewMode::Month);
    } else if binding(&kb.today)?.matches(&key_event) {
        app.go_to_today();
    } else if binding(&kb.drawer_today)?.matches(&key_event) {
        let today = app.today;
        app.open_drawer(today);
    } else if binding(&kb.select)?.matches(&key_event) {
        app.open_drawer_at_cursor();
    } else if binding(&kb.new)?.matches(&key_event) {
        app.enter_create_mode();
    } else if key_event.code == KeyCode::Left || binding(&kb.cursor_left)?.matches(&key_event) {
        app.move_cursor(-1);
    } else if key_event.code == KeyCode::Right || binding(&kb.cursor_right)?.matches(&key_event) {
        app.move_cursor(1);
    } else if key_event.code == KeyCode::Up || binding(&kb.cursor_up)?.matches(&key_event) {
        app.move_cursor(-row_step);
    } else if key_event.code == KeyCode::Down || binding(&kb.cursor_down)?.matches(&key_event) {
        app.move_cursor(row_step);
    }
    Ok(false)
}

fn handle_form_mode(app: &mut App, key_event: KeyEvent) -> Result<bool, TuiError> {
    if binding(&app.config.key_bindings.save)?.matches(&key_event) {
        app.save_form();
        return Ok(false);
    }

    let Some(form) = app.form.as_mut() else {
        app.exit_form();
        return Ok(false);
    };
    let on_option = matches!(form.current_field, NoteField::Category | NoteField::Color);
    let on_description = form.current_field == NoteField::Description;

    match key_event.code {
        KeyCode::Esc => app.exit_form(),
        KeyCode::Tab => form.navigate_field(true),
        KeyCode::BackTab => form.navigate_field(false),
        KeyCode::Enter if on_description => form.description.insert_newline(),
        KeyCode::Enter => form.navigate_field(true),
        KeyCode::Up | KeyCode::Left if on_option => form.cycle_option(false),
        KeyCode::Down | KeyCode::Right if on_option => form.cycle_option(true),
        KeyCode::Up if on_description => form.description.move_cursor_up(),
        KeyCode::Down if on_description => form.description.move_cursor_down(),
        KeyCode::Up => form.navigate_field(false),
        KeyCode::Down => form.navigate_field(true),
        code => {
            if let Some(editor) = form.current_editor_mut() {
                match code {
                    KeyCode::Left => editor.move_cursor_left(),
                    KeyCode::Right => editor.move_cursor_right(),
                    KeyCode::Home => editor.move_cursor_home(),
                    KeyCode::End => editor.move_cursor_end(),
                    KeyCode::Backspace => editor.delete_char(),
                    KeyCode::Delete => editor.delete_forward(),
                    KeyCode::Char(c) if !key_event.modifiers.contains(KeyModifiers::CONTROL) => {
                        editor.insert_char(c)
                    }
                    _ => {}
                }
            }
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agenda::{Agenda, AgendaOptions};
    use crate::models::ACCENT_COLOR;
    use crate::store::NoteStore;
    use crate::Config;
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn app() -> App {
        let today = d(2024, 3, 15);
        let options = AgendaOptions {
            accent: ACCENT_COLOR,
            default_category: "Reunião".to_string(),
            view_mode: ViewMode::Month,
        };
        App::new(Config::default(), None, Agenda::new(NoteStore::in_memory(), options, today), today)
    }

    fn press(app: &mut App, code: KeyCode) -> bool {
        handle_key_event(app, KeyEvent::new(code, KeyModifiers::NONE)).unwrap()
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn quit_key_only_quits_outside_the_form() {
        let mut app = app();
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.ui.mode, Mode::Form);
        assert!(!press(&mut app, KeyCode::Char('q')));
        assert_eq!(app.form.as_ref().unwrap().title.text(), "q");
        press(&mut app, KeyCode::Esc);
        assert!(press(&mut app, KeyCode::Char('q')));
    }

    #[test]
    fn add_note_from_keyboard() {
        let mut app = app();
        press(&mut app, KeyCode::Char('l'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.ui.mode, Mode::Drawer);
        assert_eq!(app.agenda.view().drawer_date(), Some(d(2024, 3, 16)));

        press(&mut app, KeyCode::Char('n'));
        type_text(&mut app, "Troca de filtro");
        press(&mut app, KeyCode::Tab); // date
        press(&mut app, KeyCode::Tab); // category
        press(&mut app, KeyCode::Down);
        handle_key_event(&mut app, KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL)).unwrap();

        assert_eq!(app.ui.mode, Mode::Drawer);
        let notes = app.drawer_notes();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].title, "Troca de filtro");
        assert_eq!(notes[0].date, d(2024, 3, 16));
        assert_eq!(notes[0].category, "Manutenção");
    }

    #[test]
    fn period_and_view_keys() {
        let mut app = app();
        press(&mut app, KeyCode::Char(']'));
        assert_eq!(app.agenda.view().label(), "abril de 2024");
        press(&mut app, KeyCode::Char('t'));
        assert_eq!(app.agenda.view().label(), "março de 2024");
        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.view_mode(), ViewMode::Day);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.ui.cursor, d(2024, 3, 16));
        assert!(app.agenda.view().is_visible(d(2024, 3, 16)));
    }

    #[test]
    fn escape_closes_drawer_and_keeps_selected_date() {
        let mut app = app();
        press(&mut app, KeyCode::Char('o'));
        assert_eq!(app.agenda.view().drawer_date(), Some(d(2024, 3, 15)));
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.ui.mode, Mode::Calendar);
        assert_eq!(app.agenda.view().drawer_date(), None);
        assert_eq!(app.agenda.view().selected_date(), Some(d(2024, 3, 15)));
    }

    #[test]
    fn help_returns_to_previous_mode() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::F(1));
        assert_eq!(app.ui.mode, Mode::Help);
        press(&mut app, KeyCode::Char('q'));
        assert_eq!(app.ui.mode, Mode::Help);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.ui.mode, Mode::Drawer);
    }
}
