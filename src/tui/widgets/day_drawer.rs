use chrono::NaiveDate;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

use crate::locale;
use crate::models::Note;
use crate::tui::widgets::calendar_grid::truncate;
use crate::tui::widgets::color::{get_contrast_text_color, note_color, parse_color};
use crate::Config;

/// Side panel listing every note of the drawer's day
pub fn render_day_drawer(
    f: &mut Frame,
    area: Rect,
    date: NaiveDate,
    notes: &[Note],
    list_state: &mut ListState,
    config: &Config,
) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let muted_color = parse_color(&active_theme.muted_fg);
    let highlight_bg = parse_color(&active_theme.highlight_bg);
    let highlight_fg = if active_theme.highlight_fg.is_empty() {
        get_contrast_text_color(highlight_bg)
    } else {
        parse_color(&active_theme.highlight_fg)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(locale::long_date_padded(date))
        .title_bottom(format!(" {} anotações ", notes.len()))
        .style(Style::default().fg(fg_color).bg(bg_color));

    if notes.is_empty() {
        let empty = Paragraph::new("Nenhuma anotação para este dia.")
            .block(block)
            .style(Style::default().fg(muted_color))
            .wrap(Wrap { trim: true });
        f.render_widget(empty, area);
        return;
    }

    // Borders and the highlight symbol
    let max_width = area.width.saturating_sub(4) as usize;

    let items: Vec<ListItem> = notes
        .iter()
        .map(|note| {
            let description = note.description().unwrap_or("Sem descrição");
            ListItem::new(vec![
                Line::from(vec![
                    Span::styled("● ", Style::default().fg(note_color(note.color))),
                    Span::styled(
                        truncate(&note.title, max_width.saturating_sub(2)),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                ]),
                Line::from(Span::styled(
                    format!("  {}", truncate(&note.category, max_width.saturating_sub(2))),
                    Style::default().fg(muted_color),
                )),
                Line::from(format!("  {}", truncate(description, max_width.saturating_sub(2)))),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().fg(highlight_fg).bg(highlight_bg))
        .highlight_symbol("▌");

    f.render_stateful_widget(list, area, list_state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn screen(notes: &[Note]) -> String {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let mut terminal = Terminal::new(TestBackend::new(50, 16)).unwrap();
        let config = Config::default();
        let mut state = ListState::default();
        state.select(Some(0));
        terminal
            .draw(|f| render_day_drawer(f, f.area(), date, notes, &mut state, &config))
            .unwrap();
        terminal.backend().buffer().content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn lists_notes_with_placeholder_description() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let mut described = Note::new(1, "Alfa".to_string(), date, "Evento".to_string());
        described.description = "Sala 2".to_string();
        let bare = Note::new(2, "Beta".to_string(), date, "Outro".to_string());
        let text = screen(&[described, bare]);
        assert!(text.contains("sexta-feira, 15 de março de 2024"));
        assert!(text.contains("Sala 2"));
        assert!(text.contains("Sem descrição"));
        assert!(text.contains("2 anotações"));
    }

    #[test]
    fn empty_day_says_so() {
        assert!(screen(&[]).contains("Nenhuma anotação para este dia."));
    }
}
