use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::tui::widgets::color::parse_color;
use crate::utils::format_key_binding_for_display;
use crate::Config;

pub fn render_help(f: &mut Frame, area: Rect, config: &Config) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);

    let popup_area = popup_area(area, 60, 80);
    f.render_widget(Clear, popup_area);

    let paragraph = Paragraph::new(build_help_text(config))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Ajuda - Teclas")
                .title_alignment(Alignment::Center)
                .style(Style::default().fg(fg_color).bg(bg_color)),
        )
        .style(Style::default().fg(fg_color).bg(bg_color))
        .wrap(Wrap { trim: false });

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

pub fn build_help_text(config: &Config) -> String {
    let kb = &config.key_bindings;
    let key = |binding: &str| format_key_binding_for_display(binding);
    let mut text = String::new();

    text.push_str("Calendário:\n");
    text.push_str(&format!(
        "  {} {} {} {} / setas: mover o cursor\n",
        key(&kb.cursor_left),
        key(&kb.cursor_down),
        key(&kb.cursor_up),
        key(&kb.cursor_right)
    ));
    text.push_str(&format!(
        "  {} / {}: período anterior / seguinte\n",
        key(&kb.prev_period),
        key(&kb.next_period)
    ));
    text.push_str(&format!(
        "  {} / {} / {}: visão dia / semana / mês\n",
        key(&kb.view_day),
        key(&kb.view_week),
        key(&kb.view_month)
    ));
    text.push_str(&format!("  {}: ir para hoje\n", key(&kb.today)));
    text.push_str(&format!("  {}: abrir o dia sob o cursor\n", key(&kb.select)));
    text.push_str(&format!("  {}: abrir o dia de hoje\n", key(&kb.drawer_today)));
    text.push('\n');

    text.push_str("Anotações:\n");
    text.push_str(&format!("  {}: nova anotação\n", key(&kb.new)));
    text.push_str(&format!("  {}: editar a anotação selecionada\n", key(&kb.edit)));
    text.push_str(&format!("  {}: excluir a anotação selecionada\n", key(&kb.delete)));
    text.push_str("  Esc: fechar o dia\n");
    text.push('\n');

    text.push_str("Formulário:\n");
    text.push_str(&format!("  {}: salvar\n", key(&kb.save)));
    text.push_str("  Tab / Shift+Tab: próximo / campo anterior\n");
    text.push_str("  ↑ / ↓: escolher categoria ou cor\n");
    text.push_str("  Esc: cancelar\n");
    text.push('\n');

    text.push_str("Geral:\n");
    text.push_str(&format!("  {}: trocar tema\n", key(&kb.cycle_theme)));
    text.push_str(&format!("  {}: mostrar/ocultar ajuda\n", key(&kb.help)));
    text.push_str(&format!("  {}: sair\n", key(&kb.quit)));

    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn help_follows_configured_keys() {
        let mut config = Config::default();
        config.key_bindings.new = "a".to_string();
        let text = build_help_text(&config);
        assert!(text.contains("  a: nova anotação"));
        assert!(text.contains("[ / ]: período anterior / seguinte"));
    }
}
