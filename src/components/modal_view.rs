//! Modal overlay and trigger bar

use super::centered_popup;
use super::hit_map::HitMap;
use crate::model::modal::Modal;
use crate::page::Page;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

/// Draw every trigger element as a button in one row
pub fn draw_triggers(frame: &mut Frame, area: Rect, page: &Page, hits: &mut HitMap) {
    let doc = page.document();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Dialogs ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut spans = Vec::new();
    let mut x = inner.x;
    for trigger in page.modals().iter().flat_map(|m| m.triggers.iter()) {
        let label = format!(" {} ", doc.text(*trigger));
        let width = label.width() as u16;
        hits.push(Rect::new(x, inner.y, width.min(inner.right().saturating_sub(x)), 1), *trigger);
        spans.push(Span::styled(
            label,
            Style::default()
                .fg(Color::Black)
                .bg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw("  "));
        x = x.saturating_add(width + 2);
    }
    if spans.is_empty() {
        spans.push(Span::styled("No dialogs on this page", Style::default().fg(Color::DarkGray)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), inner);
}

/// Draw a visible modal on top of everything else.
///
/// The whole screen belongs to the modal's overlay, so a click anywhere
/// outside the window lands on the container.
pub fn draw_modal(frame: &mut Frame, area: Rect, page: &Page, modal: &Modal, hits: &mut HitMap) {
    let doc = page.document();
    if doc.has_class(modal.container, &page.classes().modal_hidden) {
        return;
    }
    hits.push(area, modal.container);

    let popup = centered_popup(area, 60, 9);
    frame.render_widget(Clear, popup);
    hits.push(popup, modal.window);

    let title = if modal.id.is_empty() {
        " Dialog ".to_string()
    } else {
        format!(" {} ", modal.id)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta))
        .title(title)
        .title_style(
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        );
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(inner);

    let body = Paragraph::new(doc.text(modal.window).to_string())
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Center);
    frame.render_widget(body, chunks[0]);

    let close_label = format!(" {} ", doc.text(modal.close));
    let width = (close_label.width() as u16).min(chunks[1].width);
    let close_area = Rect::new(
        chunks[1].right().saturating_sub(width),
        chunks[1].y,
        width,
        1,
    );
    hits.push(close_area, modal.close);
    frame.render_widget(
        Paragraph::new(Span::styled(
            close_label,
            Style::default().fg(Color::Black).bg(Color::Red),
        )),
        close_area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StateClasses;
    use crate::markup::{Document, ElementSpec};
    use crate::page::PageEvent;
    use ratatui::{backend::TestBackend, Terminal};

    fn page() -> Page {
        let doc = Document::from_spec(ElementSpec::new("body", "").with_children(vec![
            ElementSpec::new("button", "")
                .with_attr("data-target", "about")
                .with_text("About"),
            ElementSpec::new("div", "modal").with_id("about").with_children(vec![
                ElementSpec::new("div", "modal__window").with_text("Smart table demo"),
                ElementSpec::new("button", "modal__close").with_text("Close"),
            ]),
        ]));
        Page::mount(doc, StateClasses::default()).unwrap()
    }

    fn draw(page: &Page) -> HitMap {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        let mut hits = HitMap::new();
        terminal
            .draw(|frame| {
                let area = frame.area();
                draw_triggers(frame, Rect::new(0, 0, area.width, 3), page, &mut hits);
                for modal in page.modals() {
                    draw_modal(frame, area, page, modal, &mut hits);
                }
            })
            .unwrap();
        hits
    }

    #[test]
    fn test_hidden_modal_records_no_regions() {
        let page = page();
        let hits = draw(&page);
        let trigger = page.modals()[0].triggers[0];
        assert_eq!(hits.at(2, 1), Some(trigger));
        assert_eq!(hits.at(40, 12), None);
    }

    #[test]
    fn test_visible_modal_covers_screen() {
        let mut page = page();
        let trigger = page.modals()[0].triggers[0];
        page.dispatch(PageEvent::Click(trigger));

        let hits = draw(&page);
        let modal = &page.modals()[0];
        assert_eq!(hits.at(40, 12), Some(modal.window));
        assert_eq!(hits.at(0, 23), Some(modal.container));
        // Trigger bar is under the overlay now
        assert_eq!(hits.at(2, 1), Some(modal.container));
    }
}
