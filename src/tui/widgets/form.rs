use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::tui::app::{NoteField, NoteForm};
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};
use crate::tui::widgets::editor::Editor;
use crate::Config;

/// Note form as a popup over the calendar
pub fn render_note_form(f: &mut Frame, area: Rect, form: &mut NoteForm, config: &Config) {
    let popup = popup_area(area, 60, 80);
    if popup.width < 10 || popup.height < 10 {
        return;
    }
    f.render_widget(Clear, popup);

    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let highlight_bg = parse_color(&active_theme.highlight_bg);
    let highlight_fg = if active_theme.highlight_fg.is_empty() {
        get_contrast_text_color(highlight_bg)
    } else {
        parse_color(&active_theme.highlight_fg)
    };
    let active_style = Style::default().fg(highlight_fg).bg(highlight_bg);
    let inactive_style = Style::default().fg(fg_color).add_modifier(Modifier::DIM);

    let title = if form.editing_note_id.is_some() { "Editar anotação" } else { "Nova anotação" };
    let outer = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .title_alignment(Alignment::Center)
        .style(Style::default().fg(fg_color).bg(bg_color));
    let inner = outer.inner(popup);
    f.render_widget(outer, popup);

    let [title_area, date_area, category_area, color_area, description_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Min(3),
    ])
    .areas(inner);

    let style_for = |field: NoteField| if form.current_field == field { active_style } else { inactive_style };

    let title_style = style_for(NoteField::Title);
    let date_style = style_for(NoteField::Date);
    let category_style = style_for(NoteField::Category);
    let color_style = style_for(NoteField::Color);
    let description_style = style_for(NoteField::Description);

    render_text_field(f, title_area, "Título *", &mut form.title, title_style);
    render_text_field(f, date_area, "Data * (AAAA-MM-DD)", &mut form.date, date_style);

    let category = form.categories.get(form.category_index).map(String::as_str).unwrap_or("");
    f.render_widget(
        Paragraph::new(format!("◀ {} ▶", category))
            .style(category_style)
            .block(Block::default().borders(Borders::ALL).title("Categoria *")),
        category_area,
    );

    let color = form.colors.get(form.color_index).map(String::as_str).unwrap_or("");
    let swatch = Line::from(vec![
        Span::raw("◀ "),
        Span::styled("██", Style::default().fg(parse_color(color))),
        Span::raw(format!(" {} ▶", color)),
    ]);
    f.render_widget(
        Paragraph::new(swatch)
            .style(color_style)
            .block(Block::default().borders(Borders::ALL).title("Cor")),
        color_area,
    );

    render_text_field(f, description_area, "Descrição", &mut form.description, description_style);

    let cursor = match form.current_field {
        NoteField::Title => form.title.cursor_screen_pos(inner_of(title_area)),
        NoteField::Date => form.date.cursor_screen_pos(inner_of(date_area)),
        NoteField::Description => form.description.cursor_screen_pos(inner_of(description_area)),
        NoteField::Category | NoteField::Color => None,
    };
    if let Some((x, y)) = cursor {
        f.set_cursor_position((x, y));
    }
}

fn inner_of(area: Rect) -> Rect {
    Block::default().borders(Borders::ALL).inner(area)
}

fn render_text_field(f: &mut Frame, area: Rect, label: &str, editor: &mut Editor, style: Style) {
    let inner = inner_of(area);
    editor.update_scroll(inner.height as usize, inner.width as usize);
    let lines: Vec<Line> = editor
        .visible_lines(inner.height as usize, inner.width as usize)
        .into_iter()
        .map(Line::from)
        .collect();
    f.render_widget(
        Paragraph::new(lines)
            .style(style)
            .block(Block::default().borders(Borders::ALL).title(label.to_string())),
        area,
    );
}

/// Centered rect taking a percentage of `area`
fn popup_area(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::vertical([Constraint::Percentage(percent_y)]).flex(Flex::Center);
    let horizontal = Layout::horizontal([Constraint::Percentage(percent_x)]).flex(Flex::Center);
    let [area] = vertical.areas(area);
    let [area] = horizontal.areas(area);
    area
}
