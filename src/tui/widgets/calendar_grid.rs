use chrono::{Datelike, NaiveDate};
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::calendar::{CalendarCell, ViewMode};
use crate::config::Theme;
use crate::locale;
use crate::tui::widgets::color::{note_color, parse_color};
use crate::Config;

/// Theme colors resolved once per frame
struct GridColors {
    fg: Color,
    bg: Color,
    highlight: Color,
    muted: Color,
    weekend: Color,
    today: Color,
}

impl GridColors {
    fn from_theme(theme: &Theme) -> Self {
        Self {
            fg: parse_color(&theme.fg),
            bg: parse_color(&theme.bg),
            highlight: parse_color(&theme.highlight_bg),
            muted: parse_color(&theme.muted_fg),
            weekend: parse_color(&theme.weekend_fg),
            today: parse_color(&theme.today_fg),
        }
    }
}

/// Draw the grid cells: a weekday header plus one row per week for month
/// and week views, a single tall cell for day view.
pub fn render_calendar_grid(
    f: &mut Frame,
    area: Rect,
    cells: &[CalendarCell],
    mode: ViewMode,
    cursor: NaiveDate,
    config: &Config,
) {
    if area.width < 7 || area.height < 3 || cells.is_empty() {
        return;
    }
    let colors = GridColors::from_theme(&config.get_active_theme());

    if mode == ViewMode::Day {
        render_cell(f, area, &cells[0], cursor, mode, &colors);
        return;
    }

    let rows = cells.len().div_ceil(7);
    let [header_area, body_area] = Layout::vertical([Constraint::Length(1), Constraint::Min(1)]).areas(area);

    let columns = Layout::horizontal([Constraint::Ratio(1, 7); 7]).split(header_area);
    for (i, column) in columns.iter().enumerate() {
        let color = if i == 0 || i == 6 { colors.weekend } else { colors.fg };
        let heading = Paragraph::new(locale::WEEKDAYS_SHORT[i])
            .alignment(Alignment::Center)
            .style(Style::default().fg(color).bg(colors.bg).add_modifier(Modifier::BOLD));
        f.render_widget(heading, *column);
    }

    let row_areas = Layout::vertical(vec![Constraint::Ratio(1, rows as u32); rows]).split(body_area);
    for (week, row_area) in cells.chunks(7).zip(row_areas.iter()) {
        let cell_areas = Layout::horizontal([Constraint::Ratio(1, 7); 7]).split(*row_area);
        for (cell, cell_area) in week.iter().zip(cell_areas.iter()) {
            render_cell(f, *cell_area, cell, cursor, mode, &colors);
        }
    }
}

fn render_cell(f: &mut Frame, area: Rect, cell: &CalendarCell, cursor: NaiveDate, mode: ViewMode, colors: &GridColors) {
    let number_style = if cell.today {
        Style::default().fg(colors.today).add_modifier(Modifier::BOLD)
    } else if cell.other_month {
        Style::default().fg(colors.muted)
    } else if cell.weekend {
        Style::default().fg(colors.weekend)
    } else {
        Style::default().fg(colors.fg)
    };

    let label = match mode {
        ViewMode::Day => locale::long_date(cell.date),
        ViewMode::Week | ViewMode::Month if cell.has_notes() => {
            format!("{} ({})", cell.date.day(), cell.note_count())
        }
        ViewMode::Week | ViewMode::Month => cell.date.day().to_string(),
    };
    let title = if cell.selected {
        Line::from(vec![Span::styled("▸", number_style), Span::styled(label, number_style)])
    } else {
        Line::from(Span::styled(label, number_style))
    };

    let border_style = if cell.date == cursor {
        Style::default().fg(colors.highlight).add_modifier(Modifier::BOLD)
    } else if cell.selected {
        Style::default().fg(colors.today)
    } else {
        Style::default().fg(colors.muted)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(title)
        .style(Style::default().bg(colors.bg));

    let width = area.width.saturating_sub(2) as usize;
    let paragraph = Paragraph::new(cell_lines(cell, width, mode, colors)).block(block);
    f.render_widget(paragraph, area);
}

fn cell_lines(cell: &CalendarCell, width: usize, mode: ViewMode, colors: &GridColors) -> Vec<Line<'static>> {
    let text_style = if cell.other_month {
        Style::default().fg(colors.muted)
    } else {
        Style::default().fg(colors.fg)
    };

    let mut lines: Vec<Line> = cell
        .notes
        .iter()
        .map(|note| {
            let text = match mode {
                ViewMode::Day => format!("{} · {}", note.title, note.category),
                _ => note.title.clone(),
            };
            Line::from(vec![
                Span::styled("●", Style::default().fg(note_color(note.color))),
                Span::styled(truncate(&text, width.saturating_sub(1)), text_style),
            ])
        })
        .collect();

    if cell.overflow > 0 {
        lines.push(Line::from(Span::styled(
            truncate(&format!("+{} mais", cell.overflow), width),
            Style::default().fg(colors.muted).add_modifier(Modifier::ITALIC),
        )));
    }
    lines
}

/// Cut `text` to `width` chars, ending in `…` when shortened
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut cut: String = text.chars().take(width - 1).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::build_grid;
    use crate::models::Note;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn screen(cells: &[CalendarCell], mode: ViewMode, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        let config = Config::default();
        terminal
            .draw(|f| render_calendar_grid(f, f.area(), cells, mode, d(2024, 3, 15), &config))
            .unwrap();
        terminal.backend().buffer().content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn truncate_marks_cut_text() {
        assert_eq!(truncate("Manutenção", 20), "Manutenção");
        assert_eq!(truncate("Manutenção", 5), "Manu…");
        assert_eq!(truncate("abc", 0), "");
    }

    #[test]
    fn month_grid_shows_headers_notes_and_overflow() {
        let day = d(2024, 3, 15);
        let notes: Vec<Note> = (1..=3)
            .map(|i| Note::new(i, format!("N{}", i), day, "Outro".to_string()))
            .collect();
        let cells = build_grid(&notes, day, ViewMode::Month, None, day);
        let text = screen(&cells, ViewMode::Month, 140, 40);
        assert!(text.contains("Dom"));
        assert!(text.contains("Sáb"));
        assert!(text.contains("N1"));
        assert!(text.contains("N2"));
        assert!(!text.contains("N3"));
        assert!(text.contains("+1 mais"));
        assert!(text.contains("15 (3)"));
        assert!(!text.contains("14 ("));
    }

    #[test]
    fn day_view_uses_long_date_and_category() {
        let day = d(2024, 3, 15);
        let notes = vec![Note::new(1, "Revisão P09".to_string(), day, "Manutenção".to_string())];
        let cells = build_grid(&notes, day, ViewMode::Day, None, day);
        let text = screen(&cells, ViewMode::Day, 80, 10);
        assert!(text.contains("sexta-feira, 15 de março de 2024"));
        assert!(text.contains("Revisão P09 · Manutenção"));
    }
}
