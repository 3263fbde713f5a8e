//! Calendar grid computation.
//!
//! Everything here is a pure function of the note collection, the anchor
//! date, the view mode, the selected date and "today". Renderers (the TUI
//! grid widget, the `grid` subcommand) only format the resulting cells.

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};
use std::fmt;
use std::str::FromStr;

use crate::locale;
use crate::models::Note;

/// Notes shown inline in a grid cell before the "+N" indicator
pub const INLINE_NOTE_LIMIT: usize = 2;

/// Notes listed in the upcoming panel
pub const UPCOMING_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    Day,
    Week,
    #[default]
    Month,
}

impl ViewMode {
    pub const ALL: [ViewMode; 3] = [ViewMode::Day, ViewMode::Week, ViewMode::Month];

    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Day => "day",
            ViewMode::Week => "week",
            ViewMode::Month => "month",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ViewMode::Day => "Dia",
            ViewMode::Week => "Semana",
            ViewMode::Month => "Mês",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "day" | "dia" => Ok(ViewMode::Day),
            "week" | "semana" => Ok(ViewMode::Week),
            "month" | "mes" | "mês" => Ok(ViewMode::Month),
            other => Err(format!("Unknown view mode '{}': expected day, week or month", other)),
        }
    }
}

/// One day in the visible grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarCell {
    pub date: NaiveDate,
    /// Padding cell from the previous or next month (month view only)
    pub other_month: bool,
    pub today: bool,
    pub weekend: bool,
    pub selected: bool,
    /// At most [`INLINE_NOTE_LIMIT`] notes, in store order
    pub notes: Vec<Note>,
    /// Notes on this day beyond the inline ones
    pub overflow: usize,
}

impl CalendarCell {
    pub fn has_notes(&self) -> bool {
        !self.notes.is_empty()
    }

    pub fn note_count(&self) -> usize {
        self.notes.len() + self.overflow
    }
}

fn weekday_index(date: NaiveDate) -> u64 {
    u64::from(date.weekday().num_days_from_sunday())
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn last_of_month(date: NaiveDate) -> NaiveDate {
    first_of_month(date)
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(date)
}

/// Sunday on or before `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date.checked_sub_days(Days::new(weekday_index(date))).unwrap_or(date)
}

/// First and last date the grid shows for `anchor` in `mode`
pub fn visible_range(anchor: NaiveDate, mode: ViewMode) -> (NaiveDate, NaiveDate) {
    match mode {
        ViewMode::Day => (anchor, anchor),
        ViewMode::Week => {
            let start = week_start(anchor);
            (start, start.checked_add_days(Days::new(6)).unwrap_or(start))
        }
        ViewMode::Month => {
            let first = first_of_month(anchor);
            let last = last_of_month(anchor);
            let start = first.checked_sub_days(Days::new(weekday_index(first))).unwrap_or(first);
            let end = last.checked_add_days(Days::new(6 - weekday_index(last))).unwrap_or(last);
            (start, end)
        }
    }
}

/// Move the anchor by `delta` steps: days in day view, weeks in week view,
/// calendar months in month view. Month steps clamp the day of month
/// (Jan 31 + 1 month = last day of February). Out-of-range results leave
/// the anchor unchanged.
pub fn navigate(anchor: NaiveDate, mode: ViewMode, delta: i32) -> NaiveDate {
    let magnitude = delta.unsigned_abs();
    let moved = match (mode, delta >= 0) {
        (ViewMode::Day, true) => anchor.checked_add_days(Days::new(u64::from(magnitude))),
        (ViewMode::Day, false) => anchor.checked_sub_days(Days::new(u64::from(magnitude))),
        (ViewMode::Week, true) => anchor.checked_add_days(Days::new(u64::from(magnitude) * 7)),
        (ViewMode::Week, false) => anchor.checked_sub_days(Days::new(u64::from(magnitude) * 7)),
        (ViewMode::Month, true) => anchor.checked_add_months(Months::new(magnitude)),
        (ViewMode::Month, false) => anchor.checked_sub_months(Months::new(magnitude)),
    };
    moved.unwrap_or(anchor)
}

/// Build the cells for `anchor` in `mode`.
///
/// `selected` marks the cell whose drawer is open; pass `None` when the
/// drawer is closed.
pub fn build_grid(
    notes: &[Note],
    anchor: NaiveDate,
    mode: ViewMode,
    selected: Option<NaiveDate>,
    today: NaiveDate,
) -> Vec<CalendarCell> {
    let (start, end) = visible_range(anchor, mode);
    let current_month = (anchor.year(), anchor.month());

    start
        .iter_days()
        .take_while(|date| *date <= end)
        .map(|date| {
            let mut on_day = notes.iter().filter(|n| n.date == date);
            let inline: Vec<Note> = on_day.by_ref().take(INLINE_NOTE_LIMIT).cloned().collect();
            let overflow = on_day.count();
            CalendarCell {
                date,
                other_month: mode == ViewMode::Month && (date.year(), date.month()) != current_month,
                today: date == today,
                weekend: is_weekend(date),
                selected: selected == Some(date),
                notes: inline,
                overflow,
            }
        })
        .collect()
}

/// Every note on `date`, sorted alphabetically by title
pub fn notes_on(notes: &[Note], date: NaiveDate) -> Vec<Note> {
    let mut day: Vec<Note> = notes.iter().filter(|n| n.date == date).cloned().collect();
    day.sort_by(|a, b| locale::compare_text(&a.title, &b.title));
    day
}

/// Notes dated `today` or later in date order (ties keep store order),
/// capped at `limit`, together with the uncapped count
pub fn upcoming(notes: &[Note], today: NaiveDate, limit: usize) -> (Vec<Note>, usize) {
    let mut ahead: Vec<&Note> = notes.iter().filter(|n| n.date >= today).collect();
    ahead.sort_by_key(|n| n.date);
    let total = ahead.len();
    (ahead.into_iter().take(limit).cloned().collect(), total)
}

/// Header text for the visible period
pub fn period_label(anchor: NaiveDate, mode: ViewMode) -> String {
    match mode {
        ViewMode::Day => locale::long_date(anchor),
        ViewMode::Week => {
            let (start, end) = visible_range(anchor, mode);
            format!(
                "Semana {} – {} de {}",
                locale::day_month_short(start),
                locale::day_month_short(end),
                end.year()
            )
        }
        ViewMode::Month => locale::month_year(anchor),
    }
}

/// Transient calendar state: what is shown and which day's drawer is open
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarView {
    anchor: NaiveDate,
    mode: ViewMode,
    selected_date: Option<NaiveDate>,
    drawer_open: bool,
}

impl CalendarView {
    pub fn new(anchor: NaiveDate, mode: ViewMode) -> Self {
        Self {
            anchor,
            mode,
            selected_date: None,
            drawer_open: false,
        }
    }

    pub fn anchor(&self) -> NaiveDate {
        self.anchor
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: ViewMode) {
        self.mode = mode;
    }

    pub fn go_to(&mut self, date: NaiveDate) {
        self.anchor = date;
    }

    /// Previous (`-1`) or next (`1`) period
    pub fn step(&mut self, delta: i32) {
        self.anchor = navigate(self.anchor, self.mode, delta);
    }

    pub fn visible_range(&self) -> (NaiveDate, NaiveDate) {
        visible_range(self.anchor, self.mode)
    }

    pub fn is_visible(&self, date: NaiveDate) -> bool {
        let (start, end) = self.visible_range();
        start <= date && date <= end
    }

    pub fn label(&self) -> String {
        period_label(self.anchor, self.mode)
    }

    pub fn open_drawer(&mut self, date: NaiveDate) {
        self.selected_date = Some(date);
        self.drawer_open = true;
    }

    /// Hide the drawer. The selected date is kept so the drawer can be
    /// reopened on the same day.
    pub fn close_drawer(&mut self) {
        self.drawer_open = false;
    }

    pub fn is_drawer_open(&self) -> bool {
        self.drawer_open
    }

    pub fn selected_date(&self) -> Option<NaiveDate> {
        self.selected_date
    }

    /// Date of the open drawer, if any
    pub fn drawer_date(&self) -> Option<NaiveDate> {
        if self.drawer_open { self.selected_date } else { None }
    }

    pub fn cells(&self, notes: &[Note], today: NaiveDate) -> Vec<CalendarCell> {
        build_grid(notes, self.anchor, self.mode, self.drawer_date(), today)
    }
}
