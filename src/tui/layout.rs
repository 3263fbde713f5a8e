use ratatui::layout::{Constraint, Direction, Layout as RatLayout, Rect};

pub struct Layout {
    pub inner_area: Rect, // Area inside the outer border
    pub tabs_area: Rect,
    pub grid_area: Rect,
    /// Day drawer when open, upcoming notes otherwise
    pub side_area: Rect,
    pub status_area: Rect,
}

impl Layout {
    /// Minimum terminal size, borders excluded: 7 grid columns of 5 chars
    /// beside a 24-column side panel, and a 6-week month
    pub const MIN_WIDTH: u16 = 60;
    pub const MIN_HEIGHT: u16 = 16;

    const SIDE_MIN_WIDTH: u16 = 24;
    const SIDE_MAX_WIDTH: u16 = 44;

    pub fn calculate(size: Rect) -> Self {
        let width = size.width.max(Self::MIN_WIDTH + 2);
        let height = size.height.max(Self::MIN_HEIGHT + 2);
        let size = Rect::new(size.x, size.y, width, height);

        let inner_area = Rect::new(
            size.x + 1,
            size.y + 1,
            size.width.saturating_sub(2),
            size.height.saturating_sub(2),
        );

        // Side panel takes a third of the width within its bounds
        let side_width = (inner_area.width / 3)
            .clamp(Self::SIDE_MIN_WIDTH, Self::SIDE_MAX_WIDTH)
            .min(inner_area.width.saturating_sub(35));

        let vertical = RatLayout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // View tabs + period label
                Constraint::Min(1),    // Grid + side panel
                Constraint::Length(1), // Status
            ])
            .split(inner_area);

        let horizontal = RatLayout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(1), Constraint::Length(side_width)])
            .split(vertical[1]);

        Self {
            inner_area,
            tabs_area: vertical[0],
            grid_area: horizontal[0],
            side_area: horizontal[1],
            status_area: vertical[2],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_terminals_are_padded_to_minimum() {
        let layout = Layout::calculate(Rect::new(0, 0, 20, 5));
        assert_eq!(layout.inner_area.width, Layout::MIN_WIDTH);
        assert_eq!(layout.inner_area.height, Layout::MIN_HEIGHT);
        assert_eq!(layout.side_area.width, 24);
        assert_eq!(layout.grid_area.width, 36);
    }

    #[test]
    fn side_panel_width_is_capped() {
        let layout = Layout::calculate(Rect::new(0, 0, 202, 50));
        assert_eq!(layout.side_area.width, 44);
        assert_eq!(layout.grid_area.width, 156);
        assert_eq!(layout.status_area.y, 48);
    }
}
