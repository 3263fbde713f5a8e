use chrono::NaiveDate;
use thiserror::Error;
use tracing::info;

use crate::calendar::{self, CalendarCell, CalendarView, ViewMode};
use crate::editor::{CommitOutcome, EditorState, NoteEditor, ValidationError};
use crate::models::{Note, NoteColor};
use crate::store::{NoteStore, StoreError};

#[derive(Debug, Error)]
pub enum AgendaError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
    #[error("Note {0} not found")]
    NotFound(i64),
}

/// Settings the agenda needs from configuration
#[derive(Debug, Clone)]
pub struct AgendaOptions {
    pub accent: NoteColor,
    pub default_category: String,
    pub view_mode: ViewMode,
}

/// The calendar component: owns the note store, the loaded collection, the
/// calendar view state and the note editor.
///
/// Mutations reload the collection from the store first, apply the change
/// and write the whole collection back.
pub struct Agenda {
    store: NoteStore,
    notes: Vec<Note>,
    view: CalendarView,
    editor: NoteEditor,
}

impl Agenda {
    pub fn new(store: NoteStore, options: AgendaOptions, today: NaiveDate) -> Self {
        let notes = store.load();
        Self {
            store,
            notes,
            view: CalendarView::new(today, options.view_mode),
            editor: NoteEditor::new(options.accent, options.default_category, today),
        }
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn note(&self, id: i64) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    pub fn view(&self) -> &CalendarView {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut CalendarView {
        &mut self.view
    }

    pub fn editor(&self) -> &NoteEditor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut NoteEditor {
        &mut self.editor
    }

    pub fn cells(&self, today: NaiveDate) -> Vec<CalendarCell> {
        self.view.cells(&self.notes, today)
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.view.set_mode(mode);
    }

    pub fn step(&mut self, delta: i32) {
        self.view.step(delta);
    }

    pub fn open_drawer(&mut self, date: NaiveDate) {
        self.view.open_drawer(date);
    }

    pub fn close_drawer(&mut self) {
        self.view.close_drawer();
    }

    /// Date and full note list of the open drawer
    pub fn drawer(&self) -> Option<(NaiveDate, Vec<Note>)> {
        self.view
            .drawer_date()
            .map(|date| (date, calendar::notes_on(&self.notes, date)))
    }

    pub fn notes_on(&self, date: NaiveDate) -> Vec<Note> {
        calendar::notes_on(&self.notes, date)
    }

    pub fn upcoming(&self, today: NaiveDate, limit: usize) -> (Vec<Note>, usize) {
        calendar::upcoming(&self.notes, today, limit)
    }

    pub fn open_create(&mut self, date: Option<NaiveDate>, today: NaiveDate) {
        self.editor.open_create(date, today);
    }

    pub fn open_edit(&mut self, id: i64) -> Result<(), AgendaError> {
        let note = self.note(id).cloned().ok_or(AgendaError::NotFound(id))?;
        self.editor.open_edit(&note);
        Ok(())
    }

    pub fn cancel_edit(&mut self, today: NaiveDate) {
        self.editor.cancel(today);
    }

    /// Validate and persist the editor's draft. On success the editor is
    /// reset; on failure nothing is written and the draft is kept.
    pub fn save_editor(&mut self, now_millis: i64, today: NaiveDate) -> Result<CommitOutcome, AgendaError> {
        let mut notes = self.store.load();
        let outcome = self.editor.commit(&mut notes, now_millis)?;
        self.store.save(&notes)?;
        self.notes = notes;

        match outcome {
            CommitOutcome::Created(id) => info!(id, "note created"),
            CommitOutcome::Updated(id) => info!(id, "note updated"),
        }
        self.editor.cancel(today);
        Ok(outcome)
    }

    /// Remove the note with `id`. Callers confirm with the user first.
    pub fn delete(&mut self, id: i64) -> Result<Note, AgendaError> {
        let mut notes = self.store.load();
        let index = notes
            .iter()
            .position(|n| n.id == id)
            .ok_or(AgendaError::NotFound(id))?;
        let removed = notes.remove(index);
        self.store.save(&notes)?;
        self.notes = notes;

        // A draft bound to the deleted note would resurrect it on save
        if self.editor.state() == EditorState::Edit(id) {
            self.editor.open_create(Some(removed.date), removed.date);
        }
        info!(id, "note deleted");
        Ok(removed)
    }

    pub fn export_blob(&self) -> Result<String, AgendaError> {
        Ok(self.store.export_blob()?)
    }

    pub fn import_blob(&mut self, blob: &str) -> Result<usize, AgendaError> {
        self.notes = self.store.import_blob(blob)?;
        info!(count = self.notes.len(), "notes imported");
        Ok(self.notes.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ACCENT_COLOR;
    use crate::store::{KeyValueStore, MemoryStorage, SCHEMA_KEY};
    use std::cell::Cell;
    use std::rc::Rc;

    /// Memory storage that rejects schema marker writes while `failing` is set
    struct FlakyStorage {
        inner: MemoryStorage,
        failing: Rc<Cell<bool>>,
    }

    impl KeyValueStore for FlakyStorage {
        fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
            self.inner.get_item(key)
        }

        fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
            if self.failing.get() && key == SCHEMA_KEY {
                return Err(StoreError::DirectoryError("disk full".to_string()));
            }
            self.inner.set_item(key, value)
        }

        fn remove_item(&mut self, key: &str) -> Result<(), StoreError> {
            self.inner.remove_item(key)
        }
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn agenda() -> Agenda {
        let options = AgendaOptions {
            accent: ACCENT_COLOR,
            default_category: "Reunião".to_string(),
            view_mode: ViewMode::Month,
        };
        Agenda::new(NoteStore::in_memory(), options, d(2024, 3, 1))
    }

    fn add(agenda: &mut Agenda, title: &str, date: NaiveDate, now: i64) -> i64 {
        agenda.open_create(Some(date), date);
        agenda.editor_mut().draft_mut().title = title.to_string();
        agenda.save_editor(now, date).unwrap().id()
    }

    #[test]
    fn saved_note_shows_in_open_drawer() {
        let mut agenda = agenda();
        agenda.open_drawer(d(2024, 3, 15));
        add(&mut agenda, "Revisão P09", d(2024, 3, 15), 1);

        let (date, notes) = agenda.drawer().unwrap();
        assert_eq!(date, d(2024, 3, 15));
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].title, "Revisão P09");
    }

    #[test]
    fn delete_unbinds_editor_for_that_note() {
        let mut agenda = agenda();
        let id = add(&mut agenda, "a", d(2024, 3, 15), 1);
        agenda.open_edit(id).unwrap();
        agenda.delete(id).unwrap();
        assert_eq!(agenda.editor().state(), EditorState::Create);
        assert!(matches!(agenda.delete(id), Err(AgendaError::NotFound(_))));
    }

    #[test]
    fn failed_save_keeps_draft() {
        let mut agenda = agenda();
        agenda.open_create(None, d(2024, 3, 1));
        agenda.editor_mut().draft_mut().description = "sem título".to_string();
        assert!(matches!(
            agenda.save_editor(1, d(2024, 3, 1)),
            Err(AgendaError::Validation(ValidationError::MissingTitle))
        ));
        assert_eq!(agenda.editor().draft().description, "sem título");
        assert!(agenda.notes().is_empty());
    }

    #[test]
    fn retry_after_failed_write_creates_one_note() {
        let failing = Rc::new(Cell::new(true));
        let storage = FlakyStorage { inner: MemoryStorage::new(), failing: Rc::clone(&failing) };
        let options = AgendaOptions {
            accent: ACCENT_COLOR,
            default_category: "Reunião".to_string(),
            view_mode: ViewMode::Month,
        };
        let mut agenda = Agenda::new(NoteStore::new(Box::new(storage)), options, d(2024, 3, 1));

        agenda.open_create(Some(d(2024, 3, 15)), d(2024, 3, 1));
        agenda.editor_mut().draft_mut().title = "Revisão P09".to_string();
        assert!(matches!(agenda.save_editor(1000, d(2024, 3, 1)), Err(AgendaError::Store(_))));
        assert!(agenda.notes().is_empty());
        assert_eq!(agenda.editor().draft().title, "Revisão P09");

        failing.set(false);
        agenda.save_editor(1001, d(2024, 3, 1)).unwrap();
        assert_eq!(agenda.notes().len(), 1);
        assert_eq!(agenda.store.load().len(), 1);
    }
}
