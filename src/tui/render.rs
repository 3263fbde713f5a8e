use ratatui::layout::Alignment;
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders};
use ratatui::Frame;

use crate::calendar::UPCOMING_LIMIT;
use crate::tui::app::Mode;
use crate::tui::widgets::{
    calendar_grid::render_calendar_grid,
    color::parse_color,
    confirm_delete::render_confirm_delete,
    day_drawer::render_day_drawer,
    form::render_note_form,
    help::render_help,
    status_bar::render_status_bar,
    tabs::render_view_tabs,
    upcoming::render_upcoming,
};
use crate::tui::{App, Layout};

pub fn render(f: &mut Frame, app: &mut App, layout: &Layout) {
    let active_theme = app.config.get_active_theme();
    let outer_block = Block::default()
        .borders(Borders::ALL)
        .title("Agenda")
        .title_alignment(Alignment::Center)
        .style(Style::default().fg(parse_color(&active_theme.fg)).bg(parse_color(&active_theme.bg)));
    f.render_widget(outer_block, f.area());

    let view = app.agenda.view();
    render_view_tabs(f, layout.tabs_area, view.mode(), &view.label(), &app.config);

    let cells = app.agenda.cells(app.today);
    render_calendar_grid(f, layout.grid_area, &cells, app.view_mode(), app.ui.cursor, &app.config);

    match app.agenda.drawer() {
        Some((date, notes)) => {
            render_day_drawer(f, layout.side_area, date, &notes, &mut app.ui.drawer_state, &app.config);
        }
        None => {
            let (notes, total) = app.agenda.upcoming(app.today, UPCOMING_LIMIT);
            render_upcoming(f, layout.side_area, &notes, total, &app.config);
        }
    }

    let hints = app.key_hints();
    render_status_bar(f, layout.status_area, app.status.message.as_deref(), &hints, &app.config);

    // Overlays go last so they sit on top of the calendar
    match app.ui.mode {
        Mode::Form => {
            if let Some(form) = app.form.as_mut() {
                render_note_form(f, layout.inner_area, form, &app.config);
            }
        }
        Mode::ConfirmDelete => {
            if let Some(note) = app.modals.delete_confirmation.as_ref() {
                render_confirm_delete(f, layout.inner_area, note, app.modals.delete_modal_selection, &app.config);
            }
        }
        Mode::Help => render_help(f, layout.inner_area, &app.config),
        Mode::Calendar | Mode::Drawer => {}
    }
}
