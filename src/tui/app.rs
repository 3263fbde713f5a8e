use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::{Days, NaiveDate};
use ratatui::widgets::ListState;
use tracing::{debug, warn};

use crate::agenda::Agenda;
use crate::calendar::{self, ViewMode};
use crate::config::ConfigError;
use crate::editor::{CommitOutcome, EditorState, NoteDraft};
use crate::models::Note;
use crate::tui::widgets::editor::Editor;
use crate::utils::now_millis;
use crate::Config;

const STATUS_MESSAGE_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Moving around the grid
    Calendar,
    /// Day drawer open, browsing that day's notes
    Drawer,
    /// Note form open
    Form,
    ConfirmDelete,
    Help,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteField {
    Title,
    Date,
    Category,
    Color,
    Description,
}

impl NoteField {
    const ORDER: [NoteField; 5] = [
        NoteField::Title,
        NoteField::Date,
        NoteField::Category,
        NoteField::Color,
        NoteField::Description,
    ];

    fn offset(self, forward: bool) -> Self {
        let len = Self::ORDER.len();
        let index = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        let next = if forward { (index + 1) % len } else { (index + len - 1) % len };
        Self::ORDER[next]
    }
}

/// On-screen form bound to the agenda's note editor. Text fields are
/// edited in place; category and color pick from the configured lists.
#[derive(Debug, Clone)]
pub struct NoteForm {
    pub current_field: NoteField,
    pub title: Editor,
    pub date: Editor,
    pub description: Editor,
    pub categories: Vec<String>,
    pub category_index: usize,
    pub colors: Vec<String>,
    pub color_index: usize,
    pub editing_note_id: Option<i64>, // None for new notes
}

impl NoteForm {
    pub fn from_draft(draft: &NoteDraft, state: EditorState, categories: &[String], colors: &[String]) -> Self {
        let (categories, category_index) = options_with(categories, &draft.category);
        let (colors, color_index) = options_with(colors, &draft.color);
        Self {
            current_field: NoteField::Title,
            title: Editor::from_string(&draft.title),
            date: Editor::from_string(&draft.date),
            description: Editor::from_string(&draft.description),
            categories,
            category_index,
            colors,
            color_index,
            editing_note_id: match state {
                EditorState::Create => None,
                EditorState::Edit(id) => Some(id),
            },
        }
    }

    /// Copy the form's values into the editor draft
    pub fn apply_to(&self, draft: &mut NoteDraft) {
        draft.title = self.title.text();
        draft.date = self.date.text();
        draft.description = self.description.text();
        draft.category = self.categories.get(self.category_index).cloned().unwrap_or_default();
        draft.color = self.colors.get(self.color_index).cloned().unwrap_or_default();
    }

    pub fn navigate_field(&mut self, forward: bool) {
        self.current_field = self.current_field.offset(forward);
    }

    pub fn current_editor_mut(&mut self) -> Option<&mut Editor> {
        match self.current_field {
            NoteField::Title => Some(&mut self.title),
            NoteField::Date => Some(&mut self.date),
            NoteField::Description => Some(&mut self.description),
            NoteField::Category | NoteField::Color => None,
        }
    }

    /// Step the category or color choice; no-op on text fields
    pub fn cycle_option(&mut self, forward: bool) {
        let (index, len) = match self.current_field {
            NoteField::Category => (&mut self.category_index, self.categories.len()),
            NoteField::Color => (&mut self.color_index, self.colors.len()),
            _ => return,
        };
        if len > 0 {
            *index = if forward { (*index + 1) % len } else { (*index + len - 1) % len };
        }
    }
}

/// `options` plus `current` when it is not one of them, and the index of `current`
fn options_with(options: &[String], current: &str) -> (Vec<String>, usize) {
    let mut options = options.to_vec();
    match options.iter().position(|o| o.eq_ignore_ascii_case(current)) {
        Some(index) => (options, index),
        None => {
            options.insert(0, current.to_string());
            (options, 0)
        }
    }
}

#[derive(Debug, Clone)]
pub struct UiState {
    pub mode: Mode,
    /// Mode to go back to when help closes
    pub previous_mode: Mode,
    /// Focused day in the grid
    pub cursor: NaiveDate,
    pub drawer_state: ListState,
}

#[derive(Debug, Clone, Default)]
pub struct ModalState {
    pub delete_confirmation: Option<Note>,
    pub delete_modal_selection: usize, // 0 = Excluir, 1 = Cancelar
}

#[derive(Debug, Clone, Default)]
pub struct StatusState {
    pub message: Option<String>,
    pub message_time: Option<Instant>,
}

pub struct App {
    pub config: Config,
    /// Where theme changes are written; None skips saving
    pub config_path: Option<PathBuf>,
    pub agenda: Agenda,
    pub today: NaiveDate,
    pub ui: UiState,
    pub form: Option<NoteForm>,
    pub modals: ModalState,
    pub status: StatusState,
}

impl App {
    pub fn new(config: Config, config_path: Option<PathBuf>, agenda: Agenda, today: NaiveDate) -> Self {
        let cursor = agenda.view().anchor();
        Self {
            config,
            config_path,
            agenda,
            today,
            ui: UiState {
                mode: Mode::Calendar,
                previous_mode: Mode::Calendar,
                cursor,
                drawer_state: ListState::default(),
            },
            form: None,
            modals: ModalState::default(),
            status: StatusState::default(),
        }
    }

    /// Pick up a date change while the app stays open
    pub fn refresh_today(&mut self, today: NaiveDate) {
        self.today = today;
    }

    pub fn view_mode(&self) -> ViewMode {
        self.agenda.view().mode()
    }

    /// Move the cursor by `days`, following it into the next period
    pub fn move_cursor(&mut self, days: i64) {
        let moved = if days >= 0 {
            self.ui.cursor.checked_add_days(Days::new(days as u64))
        } else {
            self.ui.cursor.checked_sub_days(Days::new(days.unsigned_abs()))
        };
        if let Some(date) = moved {
            self.set_cursor(date);
        }
    }

    fn set_cursor(&mut self, date: NaiveDate) {
        self.ui.cursor = date;
        if !self.agenda.view().is_visible(date) {
            self.agenda.view_mut().go_to(date);
        }
    }

    /// Step one period back or forward; the cursor keeps its place
    /// within the period when it can
    pub fn step_period(&mut self, delta: i32) {
        self.agenda.step(delta);
        let cursor = calendar::navigate(self.ui.cursor, self.view_mode(), delta);
        self.ui.cursor = if self.agenda.view().is_visible(cursor) {
            cursor
        } else {
            self.agenda.view().anchor()
        };
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.agenda.set_view_mode(mode);
        self.agenda.view_mut().go_to(self.ui.cursor);
    }

    pub fn go_to_today(&mut self) {
        self.ui.cursor = self.today;
        self.agenda.view_mut().go_to(self.today);
    }

    pub fn open_drawer(&mut self, date: NaiveDate) {
        self.set_cursor(date);
        self.agenda.open_drawer(date);
        self.ui.mode = Mode::Drawer;
        self.sync_drawer_selection(0);
    }

    pub fn open_drawer_at_cursor(&mut self) {
        self.open_drawer(self.ui.cursor);
    }

    pub fn close_drawer(&mut self) {
        self.agenda.close_drawer();
        self.ui.mode = Mode::Calendar;
    }

    pub fn drawer_notes(&self) -> Vec<Note> {
        self.agenda.drawer().map(|(_, notes)| notes).unwrap_or_default()
    }

    pub fn selected_drawer_note(&self) -> Option<Note> {
        let index = self.ui.drawer_state.selected()?;
        self.drawer_notes().into_iter().nth(index)
    }

    /// Clamp the drawer selection after the day's notes change
    fn sync_drawer_selection(&mut self, preferred: usize) {
        let count = self.drawer_notes().len();
        if count == 0 {
            self.ui.drawer_state.select(None);
        } else {
            self.ui.drawer_state.select(Some(preferred.min(count - 1)));
        }
    }

    pub fn move_drawer_selection(&mut self, down: bool) {
        let count = self.drawer_notes().len();
        if count == 0 {
            return;
        }
        let current = self.ui.drawer_state.selected().unwrap_or(0);
        let next = if down { (current + 1).min(count - 1) } else { current.saturating_sub(1) };
        self.ui.drawer_state.select(Some(next));
    }

    fn return_mode(&self) -> Mode {
        if self.agenda.view().is_drawer_open() { Mode::Drawer } else { Mode::Calendar }
    }

    /// New note on the drawer's day, or the cursor's day with the drawer closed
    pub fn enter_create_mode(&mut self) {
        let date = self.agenda.view().drawer_date().unwrap_or(self.ui.cursor);
        self.agenda.open_create(Some(date), self.today);
        self.open_form();
    }

    pub fn enter_edit_mode(&mut self) {
        let Some(note) = self.selected_drawer_note() else {
            self.set_status_message("Nenhuma anotação selecionada".to_string());
            return;
        };
        match self.agenda.open_edit(note.id) {
            Ok(()) => self.open_form(),
            Err(e) => self.set_status_message(e.to_string()),
        }
    }

    fn open_form(&mut self) {
        let editor = self.agenda.editor();
        self.form = Some(NoteForm::from_draft(
            editor.draft(),
            editor.state(),
            &self.config.categories,
            &self.config.color_presets,
        ));
        self.ui.mode = Mode::Form;
    }

    pub fn exit_form(&mut self) {
        self.agenda.cancel_edit(self.today);
        self.form = None;
        self.ui.mode = self.return_mode();
    }

    /// Validate and store the form. Validation errors keep the form open.
    pub fn save_form(&mut self) {
        let Some(form) = self.form.as_ref() else {
            return;
        };
        form.apply_to(self.agenda.editor_mut().draft_mut());

        match self.agenda.save_editor(now_millis(), self.today) {
            Ok(outcome) => {
                let message = match outcome {
                    CommitOutcome::Created(_) => "Anotação criada",
                    CommitOutcome::Updated(_) => "Anotação atualizada",
                };
                self.form = None;
                self.ui.mode = self.return_mode();
                let selected = self.ui.drawer_state.selected().unwrap_or(0);
                self.sync_drawer_selection(selected);
                self.set_status_message(message.to_string());
            }
            Err(e) => {
                debug!(error = %e, "note not saved");
                self.set_status_message(e.to_string());
            }
        }
    }

    pub fn request_delete(&mut self) {
        match self.selected_drawer_note() {
            Some(note) => {
                self.modals.delete_confirmation = Some(note);
                self.modals.delete_modal_selection = 0;
                self.ui.mode = Mode::ConfirmDelete;
            }
            None => self.set_status_message("Nenhuma anotação selecionada".to_string()),
        }
    }

    pub fn move_delete_selection(&mut self) {
        self.modals.delete_modal_selection = 1 - self.modals.delete_modal_selection.min(1);
    }

    /// Run the highlighted confirm-dialog choice
    pub fn confirm_delete(&mut self) {
        let Some(note) = self.modals.delete_confirmation.take() else {
            self.ui.mode = self.return_mode();
            return;
        };
        if self.modals.delete_modal_selection == 0 {
            match self.agenda.delete(note.id) {
                Ok(removed) => self.set_status_message(format!("\"{}\" excluída", removed.title)),
                Err(e) => self.set_status_message(e.to_string()),
            }
        }
        self.ui.mode = self.return_mode();
        let selected = self.ui.drawer_state.selected().unwrap_or(0);
        self.sync_drawer_selection(selected);
    }

    pub fn cancel_delete(&mut self) {
        self.modals.delete_confirmation = None;
        self.ui.mode = self.return_mode();
    }

    pub fn enter_help_mode(&mut self) {
        if self.ui.mode != Mode::Help {
            self.ui.previous_mode = self.ui.mode;
            self.ui.mode = Mode::Help;
        }
    }

    pub fn exit_help_mode(&mut self) {
        self.ui.mode = self.ui.previous_mode;
    }

    pub fn cycle_theme(&mut self) {
        let name = self.config.cycle_theme();
        if let Err(e) = self.save_config() {
            warn!(error = %e, "theme not saved");
        }
        self.set_status_message(format!("Tema: {}", name));
    }

    fn save_config(&mut self) -> Result<(), ConfigError> {
        match self.config_path.clone() {
            Some(path) => self.config.save_to(&path),
            None => Ok(()),
        }
    }

    pub fn set_status_message(&mut self, message: String) {
        self.status.message = Some(message);
        self.status.message_time = Some(Instant::now());
    }

    pub fn clear_status_message(&mut self) {
        self.status.message = None;
        self.status.message_time = None;
    }

    pub fn check_status_message_timeout(&mut self) {
        if let Some(time) = self.status.message_time {
            if time.elapsed() >= STATUS_MESSAGE_TIMEOUT {
                self.clear_status_message();
            }
        }
    }

    /// Key hints for the status bar in the current mode
    pub fn key_hints(&self) -> Vec<String> {
        use crate::utils::format_key_binding_for_display as key;
        let kb = &self.config.key_bindings;
        match self.ui.mode {
            Mode::Calendar => vec![
                format!("{}: abrir dia", key(&kb.select)),
                format!("{}: nova", key(&kb.new)),
                format!("{}/{}: período", key(&kb.prev_period), key(&kb.next_period)),
                format!("{}/{}/{}: dia/semana/mês", key(&kb.view_day), key(&kb.view_week), key(&kb.view_month)),
                format!("{}: hoje", key(&kb.today)),
                format!("{}: ajuda", key(&kb.help)),
                format!("{}: sair", key(&kb.quit)),
            ],
            Mode::Drawer => vec![
                format!("{}: nova", key(&kb.new)),
                format!("{}: editar", key(&kb.edit)),
                format!("{}: excluir", key(&kb.delete)),
                "Esc: fechar".to_string(),
            ],
            Mode::Form => vec![
                format!("{}: salvar", key(&kb.save)),
                "Tab: próximo campo".to_string(),
                "↑↓: escolher".to_string(),
                "Esc: cancelar".to_string(),
            ],
            Mode::ConfirmDelete => vec!["↑↓: escolher".to_string(), "Enter: confirmar".to_string(), "Esc: cancelar".to_string()],
            Mode::Help => vec![format!("Esc/{}: fechar", key(&kb.help))],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agenda::AgendaOptions;
    use crate::models::ACCENT_COLOR;
    use crate::store::NoteStore;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn app(today: NaiveDate) -> App {
        let options = AgendaOptions {
            accent: ACCENT_COLOR,
            default_category: "Reunião".to_string(),
            view_mode: ViewMode::Month,
        };
        let agenda = Agenda::new(NoteStore::in_memory(), options, today);
        App::new(Config::default(), None, agenda, today)
    }

    fn type_text(editor: &mut Editor, text: &str) {
        for ch in text.chars() {
            editor.insert_char(ch);
        }
    }

    #[test]
    fn cursor_past_month_end_moves_the_grid() {
        let mut app = app(d(2024, 3, 28));
        app.move_cursor(7);
        assert_eq!(app.ui.cursor, d(2024, 4, 4));
        // 4 April is already on the March grid as padding
        assert_eq!(app.agenda.view().label(), "março de 2024");
        app.move_cursor(7);
        assert_eq!(app.agenda.view().label(), "abril de 2024");
        app.move_cursor(-14);
        assert_eq!(app.agenda.view().label(), "março de 2024");
    }

    #[test]
    fn step_period_keeps_cursor_day_when_possible() {
        let mut app = app(d(2024, 1, 31));
        app.step_period(1);
        assert_eq!(app.ui.cursor, d(2024, 2, 29));
        assert_eq!(app.agenda.view().label(), "fevereiro de 2024");
    }

    #[test]
    fn create_from_drawer_uses_drawer_day_and_reopens_drawer() {
        let mut app = app(d(2024, 3, 1));
        app.open_drawer(d(2024, 3, 15));
        app.enter_create_mode();
        assert_eq!(app.ui.mode, Mode::Form);

        let form = app.form.as_mut().unwrap();
        assert_eq!(form.date.text(), "2024-03-15");
        assert_eq!(form.categories[form.category_index], "Reunião");
        type_text(&mut form.title, "Revisão P09");
        app.save_form();

        assert_eq!(app.ui.mode, Mode::Drawer);
        assert_eq!(app.drawer_notes().len(), 1);
        assert_eq!(app.selected_drawer_note().unwrap().title, "Revisão P09");
    }

    #[test]
    fn invalid_form_stays_open_with_message() {
        let mut app = app(d(2024, 3, 1));
        app.enter_create_mode();
        app.save_form();
        assert_eq!(app.ui.mode, Mode::Form);
        assert!(app.form.is_some());
        assert!(app.status.message.is_some());
        assert!(app.agenda.notes().is_empty());
    }

    #[test]
    fn edit_then_delete_through_the_drawer() {
        let mut app = app(d(2024, 3, 1));
        app.open_drawer(d(2024, 3, 1));
        app.enter_create_mode();
        type_text(&mut app.form.as_mut().unwrap().title, "a");
        app.save_form();

        app.enter_edit_mode();
        let form = app.form.as_mut().unwrap();
        assert!(form.editing_note_id.is_some());
        form.current_field = NoteField::Color;
        form.cycle_option(true);
        app.save_form();
        assert_ne!(app.agenda.notes()[0].color, ACCENT_COLOR);

        app.request_delete();
        assert_eq!(app.ui.mode, Mode::ConfirmDelete);
        app.move_delete_selection();
        app.confirm_delete();
        assert_eq!(app.agenda.notes().len(), 1, "cancel keeps the note");

        app.request_delete();
        app.confirm_delete();
        assert!(app.agenda.notes().is_empty());
        assert_eq!(app.ui.mode, Mode::Drawer);
        assert_eq!(app.ui.drawer_state.selected(), None);
    }

    #[test]
    fn unknown_category_is_offered_first() {
        let draft = NoteDraft {
            title: "x".to_string(),
            date: "2024-03-01".to_string(),
            color: "#123456".to_string(),
            description: String::new(),
            category: "Plantão".to_string(),
        };
        let form = NoteForm::from_draft(&draft, EditorState::Edit(7), &["Outro".to_string()], &[]);
        assert_eq!(form.categories, vec!["Plantão", "Outro"]);
        assert_eq!(form.colors, vec!["#123456"]);
        assert_eq!(form.editing_note_id, Some(7));
    }
}
