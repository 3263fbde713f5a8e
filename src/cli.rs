use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use thiserror::Error;

use crate::agenda::{Agenda, AgendaError};
use crate::calendar::{self, CalendarCell, ViewMode, UPCOMING_LIMIT};
use crate::locale;
use crate::models::Note;
use crate::utils::{now_millis, parse_date, today};

#[derive(Parser)]
#[command(name = "agenda")]
#[command(about = "Calendar notes - month, week and day views in the terminal")]
#[command(version)]
pub struct Cli {
    /// Custom config file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Use development mode (uses separate dev config/store)
    #[arg(long)]
    pub dev: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Launch interactive calendar (default if no subcommand)
    Tui,
    /// Add a note
    Add {
        /// Note title
        title: String,
        /// Category, e.g. "Manutenção"
        #[arg(long)]
        category: Option<String>,
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
        /// Color (#RRGGBB), defaults to the accent color
        #[arg(long)]
        color: Option<String>,
        /// Free-form description
        #[arg(long)]
        description: Option<String>,
    },
    /// Change fields of an existing note
    Edit {
        /// Note id
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a note
    Delete {
        /// Note id
        id: i64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// List every note on a day
    Day {
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
    },
    /// List upcoming notes
    Upcoming {
        #[arg(long, default_value_t = UPCOMING_LIMIT)]
        limit: usize,
    },
    /// Print the calendar grid
    Grid {
        /// Anchor date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
        /// day, week or month
        #[arg(long)]
        view: Option<ViewMode>,
    },
    /// Print the stored notes as JSON
    Export,
    /// Replace all notes with a JSON file
    Import {
        /// Path to a JSON array of notes
        file: PathBuf,
    },
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Agenda(#[from] AgendaError),
    #[error("Failed to parse date: {0}")]
    DateParseError(String),
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

fn parse_date_arg(date: Option<&str>) -> Result<chrono::NaiveDate, CliError> {
    match date {
        Some(raw) => parse_date(raw)
            .map_err(|e| CliError::DateParseError(format!("Invalid date format '{}': {}", raw, e))),
        None => Ok(today()),
    }
}

/// Handle the add command
pub fn handle_add(
    title: String,
    category: Option<String>,
    date: Option<String>,
    color: Option<String>,
    description: Option<String>,
    agenda: &mut Agenda,
) -> Result<(), CliError> {
    let date = parse_date_arg(date.as_deref())?;
    agenda.open_create(Some(date), today());

    let draft = agenda.editor_mut().draft_mut();
    draft.title = title;
    if let Some(category) = category {
        draft.category = category;
    }
    if let Some(color) = color {
        draft.color = color;
    }
    if let Some(description) = description {
        draft.description = description;
    }

    let outcome = agenda.save_editor(now_millis(), today())?;
    println!("Note created successfully (ID: {})", outcome.id());
    Ok(())
}

/// Handle the edit command; fields left out keep their values
#[allow(clippy::too_many_arguments)]
pub fn handle_edit(
    id: i64,
    title: Option<String>,
    date: Option<String>,
    category: Option<String>,
    color: Option<String>,
    description: Option<String>,
    agenda: &mut Agenda,
) -> Result<(), CliError> {
    agenda.open_edit(id)?;

    let draft = agenda.editor_mut().draft_mut();
    if let Some(title) = title {
        draft.title = title;
    }
    if let Some(date) = date {
        draft.date = date;
    }
    if let Some(category) = category {
        draft.category = category;
    }
    if let Some(color) = color {
        draft.color = color;
    }
    if let Some(description) = description {
        draft.description = description;
    }

    agenda.save_editor(now_millis(), today())?;
    println!("Note {} updated", id);
    Ok(())
}

/// Handle the delete command, asking for confirmation unless `yes`
pub fn handle_delete(id: i64, yes: bool, agenda: &mut Agenda) -> Result<(), CliError> {
    let note = agenda.note(id).cloned().ok_or(AgendaError::NotFound(id))?;

    if !yes {
        let stdin = io::stdin();
        let confirmed = confirm(
            &format!("Excluir a anotação \"{}\"? [s/N] ", note.title),
            &mut stdin.lock(),
            &mut io::stdout(),
        )?;
        if !confirmed {
            println!("Cancelled");
            return Ok(());
        }
    }

    agenda.delete(id)?;
    println!("Note {} deleted", id);
    Ok(())
}

/// Ask a yes/no question; anything but an explicit yes is a no
pub fn confirm(prompt: &str, input: &mut impl BufRead, output: &mut impl Write) -> io::Result<bool> {
    write!(output, "{}", prompt)?;
    output.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "s" | "sim" | "y" | "yes"))
}

/// Handle the day command
pub fn handle_day(date: Option<String>, agenda: &Agenda) -> Result<(), CliError> {
    let date = parse_date_arg(date.as_deref())?;
    println!("{}", locale::long_date(date));
    let notes = agenda.notes_on(date);
    if notes.is_empty() {
        println!("  Nenhuma anotação para este dia.");
    }
    for note in &notes {
        print_note(note, false);
    }
    Ok(())
}

/// Handle the upcoming command
pub fn handle_upcoming(limit: usize, agenda: &Agenda) -> Result<(), CliError> {
    let (notes, total) = agenda.upcoming(today(), limit);
    println!("{} anotações", total);
    for note in &notes {
        print_note(note, true);
    }
    Ok(())
}

fn print_note(note: &Note, with_date: bool) {
    let date = if with_date { format!("{}  ", locale::short_date(note.date)) } else { String::new() };
    println!("  [{}] {}{}  ({})  {}", note.id, date, note.title, note.category, note.color);
    println!("      {}", note.description().unwrap_or("Sem descrição"));
}

/// Handle the grid command
pub fn handle_grid(date: Option<String>, view: Option<ViewMode>, agenda: &Agenda) -> Result<(), CliError> {
    let anchor = parse_date_arg(date.as_deref())?;
    let mode = view.unwrap_or(agenda.view().mode());
    let cells = calendar::build_grid(agenda.notes(), anchor, mode, None, today());
    print!("{}", format_grid(&cells, anchor, mode));
    Ok(())
}

/// Plain-text rendering of grid cells.
///
/// Month view prints a week-per-row table where `*` marks today, `~` a day
/// from a neighbouring month and `(n)` the number of notes. Week and day
/// views print one block per day with its inline notes.
pub fn format_grid(cells: &[CalendarCell], anchor: chrono::NaiveDate, mode: ViewMode) -> String {
    let mut out = String::new();
    out.push_str(&calendar::period_label(anchor, mode));
    out.push('\n');

    if mode == ViewMode::Month {
        for heading in locale::WEEKDAYS_SHORT {
            out.push_str(&format!("{:<8}", heading));
        }
        out.push('\n');
        for week in cells.chunks(7) {
            for cell in week {
                let marker = if cell.today { '*' } else if cell.other_month { '~' } else { ' ' };
                let count = if cell.has_notes() {
                    format!("({})", cell.note_count())
                } else {
                    String::new()
                };
                out.push_str(&format!("{:>2}{}{:<5}", cell.date.format("%d"), marker, count));
            }
            out.push('\n');
        }
        return out;
    }

    for cell in cells {
        let marker = if cell.today { " *" } else { "" };
        out.push_str(&format!("{}{}\n", locale::long_date(cell.date), marker));
        for note in &cell.notes {
            out.push_str(&format!("  - {} ({})\n", note.title, note.category));
        }
        if cell.overflow > 0 {
            out.push_str(&format!("  +{} mais\n", cell.overflow));
        }
    }
    out
}

/// Handle the export command
pub fn handle_export(agenda: &Agenda) -> Result<(), CliError> {
    println!("{}", agenda.export_blob()?);
    Ok(())
}

/// Handle the import command
pub fn handle_import(file: PathBuf, agenda: &mut Agenda) -> Result<(), CliError> {
    let blob = std::fs::read_to_string(&file)?;
    let count = agenda.import_blob(&blob)?;
    println!("Imported {} notes from {}", count, file.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn confirm_accepts_only_explicit_yes() {
        for (answer, expected) in [("s\n", true), ("Sim\n", true), ("y\n", true), ("\n", false), ("n\n", false), ("talvez\n", false)] {
            let mut input = io::Cursor::new(answer.as_bytes());
            let mut output = Vec::new();
            assert_eq!(confirm("? ", &mut input, &mut output).unwrap(), expected, "{:?}", answer);
            assert_eq!(output, b"? ");
        }
    }

    #[test]
    fn month_grid_text_has_a_row_per_week() {
        let anchor = NaiveDate::from_ymd_opt(2024, 2, 10).unwrap();
        let notes = vec![Note::new(1, "x".to_string(), anchor, "Outro".to_string())];
        let cells = calendar::build_grid(&notes, anchor, ViewMode::Month, None, anchor);
        let text = format_grid(&cells, anchor, ViewMode::Month);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "fevereiro de 2024");
        assert!(lines[1].starts_with("Dom"));
        assert_eq!(lines.len(), 2 + cells.len() / 7);
        assert!(text.contains("10*(1)"));
        assert!(text.contains("28~"));
    }

    #[test]
    fn day_grid_text_lists_overflow() {
        let anchor = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let notes: Vec<Note> = (1..=4)
            .map(|i| Note::new(i, format!("n{}", i), anchor, "Outro".to_string()))
            .collect();
        let cells = calendar::build_grid(&notes, anchor, ViewMode::Day, None, anchor);
        let text = format_grid(&cells, anchor, ViewMode::Day);
        assert!(text.contains("  - n1 (Outro)"));
        assert!(!text.contains("n3"));
        assert!(text.contains("+2 mais"));
    }
}
