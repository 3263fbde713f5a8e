pub mod agenda;
pub mod calendar;
pub mod cli;
pub mod config;
pub mod editor;
pub mod locale;
pub mod logging;
pub mod models;
pub mod store;
pub mod tui;
pub mod utils;

pub use agenda::{Agenda, AgendaError, AgendaOptions};
pub use calendar::{CalendarCell, CalendarView, ViewMode};
pub use config::Config;
pub use models::{Note, NoteColor};
pub use store::{NoteStore, SqliteStorage};
pub use utils::Profile;
