//! Key help overlay

use super::centered_popup;
use crate::action::Action;
use crate::component::Component;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Shortcuts shown in the overlay, grouped by section
const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Table",
        &[
            ("h / ←", "Point at previous column"),
            ("l / →", "Point at next column"),
            ("Enter/Space", "Sort by pointed column"),
            ("j / k", "Scroll rows"),
            ("Tab", "Next table"),
            ("Esc", "Leave table / close dialog"),
        ],
    ),
    (
        "Search",
        &[
            ("/", "Edit pointed column's search"),
            ("Enter", "Apply search"),
            ("Esc", "Cancel edit"),
        ],
    ),
    (
        "Page",
        &[
            ("o", "Open first dialog"),
            ("mouse", "Click, hover and point"),
            ("?", "Toggle this help"),
            ("q", "Quit"),
        ],
    ),
];

#[derive(Default)]
pub struct HelpDialog;

fn build_help_content() -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for (title, shortcuts) in SECTIONS {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  {} ", title),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )));
        for (key, description) in shortcuts.iter() {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("  {:12}", key),
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                ),
                Span::styled(description.to_string(), Style::default().fg(Color::White)),
            ]));
        }
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  Press q, Esc, or ? to close",
        Style::default().fg(Color::DarkGray),
    )));
    lines
}

impl Component for HelpDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => Some(Action::ToggleHelp),
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let content = build_help_content();
        let popup = centered_popup(area, 50, content.len() as u16 + 2);
        frame.render_widget(Clear, popup);

        let paragraph = Paragraph::new(content).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Keyboard Shortcuts ")
                .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                .border_style(Style::default().fg(Color::Cyan)),
        );
        frame.render_widget(paragraph, popup);
        Ok(())
    }
}
