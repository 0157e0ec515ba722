//! Layout calculations for the UI

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Screen areas of the page view
pub struct PageLayout {
    /// One area per table, stacked vertically
    pub tables: Vec<Rect>,
    pub triggers: Rect,
    pub status: Rect,
    pub help: Rect,
}

/// Calculate centered popup area
pub fn centered_popup(area: Rect, width: u16, height: u16) -> Rect {
    let popup_x = area.x + (area.width.saturating_sub(width)) / 2;
    let popup_y = area.y + (area.height.saturating_sub(height)) / 2;

    Rect::new(
        popup_x,
        popup_y,
        width.min(area.width),
        height.min(area.height),
    )
}

/// Split the screen: tables + trigger bar + status line + help bar
pub fn calculate_page_layout(area: Rect, table_count: usize) -> PageLayout {
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(3),
        ])
        .split(area);

    let tables = if table_count == 0 {
        Vec::new()
    } else {
        let share = 100 / table_count as u16;
        Layout::default()
            .direction(Direction::Vertical)
            .constraints(vec![Constraint::Percentage(share); table_count])
            .split(main_chunks[0])
            .to_vec()
    };

    PageLayout {
        tables,
        triggers: main_chunks[1],
        status: main_chunks[2],
        help: main_chunks[3],
    }
}
