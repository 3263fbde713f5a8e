use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::locale;
use crate::models::Note;
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};
use crate::Config;

pub const DELETE_OPTIONS: [&str; 2] = ["Excluir", "Cancelar"];

pub fn render_confirm_delete(f: &mut Frame, area: Rect, note: &Note, selection: usize, config: &Config) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let highlight_bg = parse_color(&active_theme.highlight_bg);
    let highlight_fg = get_contrast_text_color(highlight_bg);
    let normal = Style::default().fg(fg_color).bg(bg_color);

    let popup_area = popup_area(area, 50, 40);
    f.render_widget(Clear, popup_area);

    let mut lines = vec![
        Line::from(Span::styled("Excluir esta anotação?", normal)),
        Line::default(),
        Line::from(Span::styled(note.title.clone(), normal.add_modifier(Modifier::BOLD))),
        Line::from(Span::styled(
            format!("{} · {}", locale::short_date(note.date), note.category),
            normal,
        )),
        Line::default(),
    ];

    for (index, option) in DELETE_OPTIONS.iter().enumerate() {
        let (prefix, style) = if index == selection {
            ("> ", Style::default().fg(highlight_fg).bg(highlight_bg))
        } else {
            ("  ", normal)
        };
        lines.push(Line::from(Span::styled(format!("{}{}", prefix, option), style)));
    }

    lines.push(Line::default());
    lines.push(Line::from(Span::styled("↑↓ escolher, Enter confirmar, Esc cancelar", normal)));

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Confirmar exclusão")
                .title_alignment(Alignment::Center)
                .style(normal),
        )
        .style(normal)
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Center);

    f.render_widget(paragraph, popup_area);
}

/// Centered rect taking a percentage of `area`
fn popup_area(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::vertical([Constraint::Percentage(percent_y)]).flex(Flex::Center);
    let horizontal = Layout::horizontal([Constraint::Percentage(percent_x)]).flex(Flex::Center);
    let [area] = vertical.areas(area);
    let [area] = horizontal.areas(area);
    area
}
