use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};
use ratatui::Frame;

use crate::locale;
use crate::models::Note;
use crate::tui::widgets::calendar_grid::truncate;
use crate::tui::widgets::color::{note_color, parse_color};
use crate::Config;

/// Side panel shown while no drawer is open: the next notes from today on.
/// `total` counts every upcoming note, not just the ones listed.
pub fn render_upcoming(f: &mut Frame, area: Rect, notes: &[Note], total: usize, config: &Config) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let muted_color = parse_color(&active_theme.muted_fg);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(panel_title(notes.len(), total))
        .style(Style::default().fg(fg_color).bg(bg_color));

    if notes.is_empty() {
        let empty = Paragraph::new("Nenhuma anotação futura.")
            .block(block)
            .style(Style::default().fg(muted_color));
        f.render_widget(empty, area);
        return;
    }

    let max_width = area.width.saturating_sub(2) as usize;
    let items: Vec<ListItem> = notes
        .iter()
        .map(|note| {
            ListItem::new(vec![
                Line::from(vec![
                    Span::styled("● ", Style::default().fg(note_color(note.color))),
                    Span::styled(locale::short_date(note.date), Style::default().fg(muted_color)),
                ]),
                Line::from(format!("  {}", truncate(&note.title, max_width.saturating_sub(2)))),
            ])
        })
        .collect();

    f.render_widget(List::new(items).block(block), area);
}

/// `Próximas (3)`, or `Próximas (5 de 12)` when the list is capped
fn panel_title(shown: usize, total: usize) -> String {
    if shown < total {
        format!("Próximas ({} de {})", shown, total)
    } else {
        format!("Próximas ({})", total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_says_when_the_list_is_capped() {
        assert_eq!(panel_title(0, 0), "Próximas (0)");
        assert_eq!(panel_title(3, 3), "Próximas (3)");
        assert_eq!(panel_title(5, 12), "Próximas (5 de 12)");
    }
}
