use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::tui::widgets::calendar_grid::truncate;
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};
use crate::Config;

const SEPARATOR: &str = " • ";

/// One-line status bar: the pending message if any, key hints otherwise
pub fn render_status_bar(f: &mut Frame, area: Rect, message: Option<&str>, key_hints: &[String], config: &Config) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let highlight_bg = parse_color(&active_theme.highlight_bg);
    let width = area.width as usize;

    let (content, style) = match message {
        Some(msg) => (
            truncate(msg, width),
            Style::default()
                .fg(get_contrast_text_color(highlight_bg))
                .bg(highlight_bg)
                .add_modifier(Modifier::BOLD),
        ),
        None => (fit_hints(key_hints, width), Style::default().fg(fg_color).bg(bg_color)),
    };

    f.render_widget(Paragraph::new(content).style(style), area);
}

/// Join as many hints as fit in `width`, ending in "..." when some are dropped
pub fn fit_hints(hints: &[String], width: usize) -> String {
    let mut text = String::new();
    for (i, hint) in hints.iter().enumerate() {
        let separator = if i == 0 { "" } else { SEPARATOR };
        let needed = text.chars().count() + separator.chars().count() + hint.chars().count();
        if needed > width {
            if text.is_empty() {
                return truncate(hint, width);
            }
            while text.chars().count() + 3 > width && text.pop().is_some() {}
            text.push_str("...");
            return text;
        }
        text.push_str(separator);
        text.push_str(hint);
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hints() -> Vec<String> {
        vec!["n: nova".to_string(), "q: sair".to_string(), "F1: ajuda".to_string()]
    }

    #[test]
    fn all_hints_fit() {
        assert_eq!(fit_hints(&hints(), 80), "n: nova • q: sair • F1: ajuda");
    }

    #[test]
    fn dropped_hints_leave_ellipsis() {
        assert_eq!(fit_hints(&hints(), 20), "n: nova • q: sair...");
        assert_eq!(fit_hints(&hints(), 4), "n: …");
    }
}
