//! Table view - draws a smart table from the document's current state
//!
//! Everything shown here is read back from the markup: row order from the
//! body's children, highlights and sort arrows from state classes, hidden
//! rows from the hidden class. Each drawn element records a hit region.

use super::hit_map::HitMap;
use crate::markup::{Document, ElementId};
use crate::page::Page;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const SEPARATOR: &str = " │ ";
const MIN_WIDTH: usize = 4;
const MAX_WIDTH: usize = 30;

/// Pad or truncate `text` to exactly `width` display columns
fn fit(text: &str, width: usize) -> String {
    if text.width() <= width {
        return format!("{}{}", text, " ".repeat(width - text.width()));
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    used += 1;
    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}

/// A table as drawn by the view
pub struct TableView<'a> {
    pub page: &'a Page,
    pub index: usize,
    pub focused: bool,
    /// Column whose search input is being edited, with the edit buffer
    pub editing: Option<(usize, &'a str)>,
    /// Visible rows skipped from the top
    pub scroll: usize,
}

impl<'a> TableView<'a> {
    /// Row elements in document order that are not hidden
    pub fn shown_rows(&self) -> Vec<ElementId> {
        let doc = self.page.document();
        let table = &self.page.tables()[self.index];
        let hidden = &self.page.classes().row_hidden;
        match table.body() {
            Some(body) => doc
                .children(body)
                .iter()
                .copied()
                .filter(|row| doc.has_class(*row, "smart-table__row") && !doc.has_class(*row, hidden))
                .collect(),
            None => Vec::new(),
        }
    }

    fn heading_label(&self, doc: &Document, heading: ElementId) -> String {
        let classes = self.page.classes();
        let arrow = if doc.has_class(heading, &classes.heading_asc) {
            " ▲"
        } else if doc.has_class(heading, &classes.heading_desc) {
            " ▼"
        } else {
            ""
        };
        format!("{}{}", doc.text(heading), arrow)
    }

    fn column_widths(&self) -> Vec<usize> {
        let doc = self.page.document();
        let table = &self.page.tables()[self.index];
        table
            .columns()
            .iter()
            .map(|column| {
                let mut width = doc.text(column.heading).width() + 2;
                for cell in &column.cell_elements {
                    width = width.max(doc.text(*cell).width());
                }
                if let Some(input) = column.search_input {
                    width = width.max(doc.value(input).width() + 2);
                }
                width.clamp(MIN_WIDTH, MAX_WIDTH)
            })
            .collect()
    }

    pub fn draw(&self, frame: &mut Frame, area: Rect, hits: &mut HitMap) {
        let doc = self.page.document();
        let table = &self.page.tables()[self.index];
        let classes = self.page.classes();

        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" Table {} ", self.index + 1))
            .border_style(if self.focused {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default().fg(Color::DarkGray)
            });
        let inner = block.inner(area);
        frame.render_widget(block, area);
        hits.push(area, table.container);

        if table.columns().is_empty() {
            frame.render_widget(Paragraph::new("Table has no columns"), inner);
            return;
        }

        let widths = self.column_widths();
        let mut offsets = Vec::with_capacity(widths.len());
        let mut x = 0usize;
        for width in &widths {
            offsets.push(x);
            x += width + SEPARATOR.width();
        }
        let region = |col: usize, line: u16| -> Rect {
            let left = inner.x.saturating_add(offsets[col] as u16);
            let right = inner.right().min(left.saturating_add(widths[col] as u16));
            Rect::new(left, inner.y + line, right.saturating_sub(left), 1)
        };

        let mut lines = Vec::new();

        // Search inputs
        let mut spans = Vec::new();
        for (i, column) in table.columns().iter().enumerate() {
            let span = match column.search_input {
                Some(input) => {
                    hits.push(region(i, 0), input);
                    match self.editing {
                        Some((col, buffer)) if col == i => Span::styled(
                            fit(&format!("{}▏", buffer), widths[i]),
                            Style::default().fg(Color::Black).bg(Color::Yellow),
                        ),
                        _ => {
                            let value = doc.value(input);
                            let shown = if value.is_empty() { "/" } else { value };
                            Span::styled(
                                fit(shown, widths[i]),
                                Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
                            )
                        }
                    }
                }
                None => Span::raw(" ".repeat(widths[i])),
            };
            spans.push(span);
            spans.push(Span::raw(SEPARATOR));
        }
        lines.push(Line::from(spans));

        // Headings
        let mut spans = Vec::new();
        for (i, column) in table.columns().iter().enumerate() {
            hits.push(region(i, 1), column.heading);
            let mut style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
            if doc.has_class(column.heading, &classes.heading_active) {
                style = style.fg(Color::Yellow);
            }
            if doc.has_class(column.heading, &classes.heading_hover) {
                style = style.bg(Color::DarkGray);
            }
            spans.push(Span::styled(
                fit(&self.heading_label(doc, column.heading), widths[i]),
                style,
            ));
            spans.push(Span::raw(SEPARATOR));
        }
        lines.push(Line::from(spans));

        let separator = widths
            .iter()
            .map(|w| "─".repeat(*w))
            .collect::<Vec<_>>()
            .join("─┼─");
        lines.push(Line::from(Span::styled(
            separator,
            Style::default().fg(Color::DarkGray),
        )));

        // Rows
        let shown = self.shown_rows();
        let room = inner.height.saturating_sub(3) as usize;
        if shown.is_empty() {
            lines.push(Line::from(Span::styled(
                "No matching rows",
                Style::default().fg(Color::Yellow),
            )));
        }
        for (k, row) in shown.iter().skip(self.scroll).take(room).enumerate() {
            let line = 3 + k as u16;
            let mut spans = Vec::new();
            for (i, cell) in doc.query_class(*row, "smart-table__cell").into_iter().enumerate() {
                if i >= widths.len() {
                    break;
                }
                hits.push(region(i, line), cell);
                let mut style = Style::default().fg(Color::White);
                if doc.has_class(cell, &classes.cell_active) {
                    style = style.fg(Color::Yellow);
                }
                if doc.has_class(cell, &classes.cell_hover) {
                    style = style.bg(Color::DarkGray);
                }
                spans.push(Span::styled(fit(doc.text(cell), widths[i]), style));
                spans.push(Span::raw(SEPARATOR));
            }
            lines.push(Line::from(spans));
        }

        frame.render_widget(Paragraph::new(lines), inner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StateClasses;
    use crate::markup::ElementSpec;
    use crate::page::PageEvent;
    use crate::table::testing::table_spec;
    use ratatui::{backend::TestBackend, Terminal};

    fn page() -> Page {
        let doc = Document::from_spec(ElementSpec::new("body", "").with_children(vec![table_spec(
            &["string", "int"],
            &[&["Paris", "30"], &["London", "10"], &["Oslo", "20"]],
        )]));
        Page::mount(doc, StateClasses::default()).unwrap()
    }

    fn render(page: &Page) -> (String, HitMap) {
        let mut terminal = Terminal::new(TestBackend::new(40, 10)).unwrap();
        let mut hits = HitMap::new();
        terminal
            .draw(|frame| {
                let view = TableView {
                    page,
                    index: 0,
                    focused: true,
                    editing: None,
                    scroll: 0,
                };
                view.draw(frame, frame.area(), &mut hits);
            })
            .unwrap();
        let buffer = terminal.backend().buffer().clone();
        let width = buffer.area.width as usize;
        let text = buffer
            .content
            .chunks(width)
            .map(|line| line.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n");
        (text, hits)
    }

    #[test]
    fn test_fit_pads_and_truncates() {
        assert_eq!(fit("ab", 4), "ab  ");
        assert_eq!(fit("abcdef", 4), "abc…");
        assert_eq!(fit("марта", 5), "марта");
    }

    #[test]
    fn test_draws_rows_in_document_order() {
        let mut page = page();
        let (text, _) = render(&page);
        let paris = text.find("Paris").unwrap();
        let london = text.find("London").unwrap();
        assert!(paris < london);

        let heading = page.tables()[0].column(1).unwrap().heading;
        page.dispatch(PageEvent::Click(heading));
        let (text, _) = render(&page);
        assert!(text.contains("▲"));
        assert!(text.find("London").unwrap() < text.find("Oslo").unwrap());
        assert!(text.find("Oslo").unwrap() < text.find("Paris").unwrap());
    }

    #[test]
    fn test_hidden_rows_are_not_drawn() {
        let mut page = page();
        let input = page.tables()[0].column(0).unwrap().search_input.unwrap();
        page.dispatch(PageEvent::InputChange(input, "o".to_string()));
        let (text, _) = render(&page);
        assert!(!text.contains("Paris"));
        assert!(text.contains("Oslo"));
    }

    #[test]
    fn test_hit_map_finds_headings_and_cells() {
        let page = page();
        let (_, hits) = render(&page);
        let table = &page.tables()[0];
        // Border at row 0, inputs at row 1, headings at row 2, first data row at 4
        assert_eq!(hits.at(1, 2), Some(table.column(0).unwrap().heading));
        assert_eq!(hits.at(1, 4), Some(table.rows()[0].cells[0].element));
        assert_eq!(hits.at(0, 0), Some(table.container));
    }
}
