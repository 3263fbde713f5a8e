//! Note editor state machine: create (nothing bound) or edit (bound by id).

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{Note, NoteColor};
use crate::store::next_note_id;
use crate::utils::parse_date;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Title is required")]
    MissingTitle,
    #[error("Date is required")]
    MissingDate,
    #[error("Date must be in YYYY-MM-DD format")]
    InvalidDate,
    #[error("Category is required")]
    MissingCategory,
    #[error("{0}")]
    InvalidColor(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorState {
    Create,
    Edit(i64),
}

/// Raw form contents, exactly as typed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: String,
    pub date: String,
    pub color: String,
    pub description: String,
    pub category: String,
}

impl NoteDraft {
    pub fn blank(date: NaiveDate, accent: NoteColor, category: &str) -> Self {
        Self {
            title: String::new(),
            date: date.format("%Y-%m-%d").to_string(),
            color: accent.to_string(),
            description: String::new(),
            category: category.to_string(),
        }
    }

    pub fn from_note(note: &Note) -> Self {
        Self {
            title: note.title.clone(),
            date: note.date.format("%Y-%m-%d").to_string(),
            color: note.color.to_string(),
            description: note.description.clone(),
            category: note.category.clone(),
        }
    }

    /// Check required fields and build the note that would be stored under `id`
    pub fn validate(&self, id: i64) -> Result<Note, ValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ValidationError::MissingTitle);
        }

        let date = self.date.trim();
        if date.is_empty() {
            return Err(ValidationError::MissingDate);
        }
        let date = parse_date(date).map_err(|_| ValidationError::InvalidDate)?;

        let category = self.category.trim();
        if category.is_empty() {
            return Err(ValidationError::MissingCategory);
        }

        let color = self.color
            .parse::<NoteColor>()
            .map_err(|e| ValidationError::InvalidColor(e.to_string()))?;

        Ok(Note {
            id,
            title: title.to_string(),
            date,
            color,
            description: self.description.trim().to_string(),
            category: category.to_string(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    Created(i64),
    Updated(i64),
}

impl CommitOutcome {
    pub fn id(&self) -> i64 {
        match self {
            CommitOutcome::Created(id) | CommitOutcome::Updated(id) => *id,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NoteEditor {
    state: EditorState,
    draft: NoteDraft,
    accent: NoteColor,
    default_category: String,
}

impl NoteEditor {
    pub fn new(accent: NoteColor, default_category: String, today: NaiveDate) -> Self {
        Self {
            state: EditorState::Create,
            draft: NoteDraft::blank(today, accent, &default_category),
            accent,
            default_category,
        }
    }

    pub fn state(&self) -> EditorState {
        self.state
    }

    pub fn draft(&self) -> &NoteDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut NoteDraft {
        &mut self.draft
    }

    pub fn accent(&self) -> NoteColor {
        self.accent
    }

    /// Start a new note on `date`, or on `today` when no date is given
    pub fn open_create(&mut self, date: Option<NaiveDate>, today: NaiveDate) {
        self.state = EditorState::Create;
        self.draft = NoteDraft::blank(date.unwrap_or(today), self.accent, &self.default_category);
    }

    pub fn open_edit(&mut self, note: &Note) {
        self.state = EditorState::Edit(note.id);
        self.draft = NoteDraft::from_note(note);
    }

    /// Discard the draft and unbind any record
    pub fn cancel(&mut self, today: NaiveDate) {
        self.open_create(None, today);
    }

    /// Validate the draft and write it into `notes`.
    ///
    /// On error `notes` is untouched. An edit whose record is no longer in
    /// `notes` is appended under its original id.
    pub fn commit(&self, notes: &mut Vec<Note>, now_millis: i64) -> Result<CommitOutcome, ValidationError> {
        match self.state {
            EditorState::Edit(id) => {
                let note = self.draft.validate(id)?;
                match notes.iter_mut().find(|n| n.id == id) {
                    Some(existing) => *existing = note,
                    None => notes.push(note),
                }
                Ok(CommitOutcome::Updated(id))
            }
            EditorState::Create => {
                let id = next_note_id(notes, now_millis);
                let note = self.draft.validate(id)?;
                notes.push(note);
                Ok(CommitOutcome::Created(id))
            }
        }
    }
}
