use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Tabs};
use ratatui::Frame;

use crate::calendar::ViewMode;
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};
use crate::Config;

/// Day/week/month tabs on the left, the period label on the right
pub fn render_view_tabs(f: &mut Frame, area: Rect, current: ViewMode, period_label: &str, config: &Config) {
    let active_theme = config.get_active_theme();
    let highlight_bg = parse_color(&active_theme.highlight_bg);
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);

    let titles: Vec<Line> = ViewMode::ALL
        .iter()
        .map(|mode| Line::from(Span::raw(format!(" {} ", mode.label()))))
        .collect();
    let selected = ViewMode::ALL.iter().position(|m| *m == current).unwrap_or(0);

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(fg_color).bg(bg_color))
        .highlight_style(
            Style::default()
                .fg(get_contrast_text_color(highlight_bg))
                .bg(highlight_bg)
                .add_modifier(Modifier::BOLD),
        )
        .divider(" ")
        .padding("", "");

    let label_width = period_label.chars().count() as u16 + 1;
    let [tabs_area, label_area] =
        Layout::horizontal([Constraint::Min(1), Constraint::Length(label_width)]).areas(area);

    f.render_widget(tabs, tabs_area);
    f.render_widget(
        Paragraph::new(period_label.to_string())
            .alignment(Alignment::Right)
            .style(Style::default().fg(fg_color).bg(bg_color).add_modifier(Modifier::BOLD)),
        label_area,
    );
}
