//! Root application component
//!
//! The App owns the mounted page and turns keyboard and mouse Actions into
//! page events. It keeps only front-end state (focus, column pointer, search
//! edit buffer, scroll); everything the widgets own lives in the page.

use crate::action::Action;
use crate::component::Component;
use crate::components::{
    calculate_page_layout, draw_modal, draw_triggers, HelpDialog, HitMap, TableView,
};
use crate::markup::ElementId;
use crate::model::column::SortState;
use crate::page::{Page, PageEvent};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Search input being edited from the keyboard
struct Editing {
    table: usize,
    column: usize,
    input: ElementId,
    buffer: String,
}

// ═══════════════════════════════════════════════════════════════════════════════
// App Struct
// ═══════════════════════════════════════════════════════════════════════════════

pub struct App {
    pub page: Page,

    /// Shown in the status bar
    pub title: String,

    /// Flag to indicate the app should quit
    pub should_quit: bool,

    /// Table receiving keyboard input
    pub focused_table: usize,

    /// Column the keyboard pointer is on, if any
    pub pointer: Option<usize>,

    /// Table the mouse is currently over
    hovered_table: Option<usize>,

    editing: Option<Editing>,

    /// Rows scrolled off the top, per table
    scroll: Vec<usize>,

    pub show_help: bool,
    pub help_dialog: HelpDialog,

    /// Regions recorded by the last draw
    hits: HitMap,

    /// Status message to display
    pub status_message: Option<String>,
}

impl App {
    pub fn new(page: Page, title: impl Into<String>) -> App {
        let scroll = vec![0; page.tables().len()];
        App {
            page,
            title: title.into(),
            should_quit: false,
            focused_table: 0,
            pointer: None,
            hovered_table: None,
            editing: None,
            scroll,
            show_help: false,
            help_dialog: HelpDialog,
            hits: HitMap::new(),
            status_message: None,
        }
    }

    fn column_count(&self) -> usize {
        self.page
            .tables()
            .get(self.focused_table)
            .map(|t| t.columns().len())
            .unwrap_or(0)
    }

    fn pointed_heading(&self) -> Option<ElementId> {
        let column = self.pointer?;
        let table = self.page.tables().get(self.focused_table)?;
        table.column(column).map(|c| c.heading)
    }

    fn visible_modal_container(&self) -> Option<ElementId> {
        self.page
            .modals()
            .iter()
            .find(|m| m.is_visible())
            .map(|m| m.container)
    }

    /// Hover the pointed heading, as the mouse would
    fn point(&mut self, column: usize) -> Option<Action> {
        self.pointer = Some(column);
        let table = self.page.tables().get(self.focused_table)?;
        if table.hovered_column() == Some(column) {
            return None;
        }
        self.pointed_heading()
            .map(|heading| Action::Dispatch(PageEvent::PointerEnter(heading)))
    }

    fn leave_focused_table(&mut self) -> Option<Action> {
        self.pointer = None;
        self.page
            .tables()
            .get(self.focused_table)
            .map(|t| Action::Dispatch(PageEvent::PointerLeave(t.container)))
    }

    fn handle_edit_key_event(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Esc => Some(Action::CancelSearch),
            KeyCode::Enter => Some(Action::CommitSearch),
            KeyCode::Backspace => Some(Action::SearchBackspace),
            KeyCode::Char(c) => Some(Action::SearchInput(c)),
            _ => None,
        }
    }

    /// One line summary of the focused table
    fn status_line(&self) -> Line<'static> {
        let mut spans = vec![Span::styled(
            format!(" {} ", self.title),
            Style::default().fg(Color::Black).bg(Color::Cyan),
        )];

        match self.page.tables().get(self.focused_table) {
            Some(table) => {
                spans.push(Span::raw(format!(
                    " Table {}/{}  {} of {} rows",
                    self.focused_table + 1,
                    self.page.tables().len(),
                    table.visible_rows().len(),
                    table.rows().len()
                )));

                if let Some(column) = table.active_column().and_then(|id| table.column(id)) {
                    let order = match column.sort {
                        SortState::Default => "(default order)",
                        sort => sort.arrow(),
                    };
                    spans.push(Span::styled(
                        format!("  sorted by {} {}", self.page.document().text(column.heading), order),
                        Style::default().fg(Color::Yellow),
                    ));
                }

                let malformed = table.diagnostics().len();
                if malformed > 0 {
                    spans.push(Span::styled(
                        format!("  {} malformed cells", malformed),
                        Style::default().fg(Color::Red),
                    ));
                }
            }
            None => spans.push(Span::raw(" No smart tables on this page")),
        }

        if let Some(message) = &self.status_message {
            spans.push(Span::styled(
                format!("  {}", message),
                Style::default().fg(Color::DarkGray),
            ));
        }
        Line::from(spans)
    }

    fn help_bar(&self) -> Paragraph<'static> {
        let key = |k: &'static str| {
            Span::styled(k, Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        };
        let text = |t: &'static str| Span::styled(t, Style::default().fg(Color::Gray));

        let line = if self.editing.is_some() {
            Line::from(vec![
                key(" Enter"),
                text(" apply  "),
                key("Esc"),
                text(" cancel  "),
                key("Backspace"),
                text(" delete"),
            ])
        } else {
            Line::from(vec![
                key(" ←/→"),
                text(" point  "),
                key("Enter"),
                text(" sort  "),
                key("/"),
                text(" search  "),
                key("Tab"),
                text(" next table  "),
                key("o"),
                text(" dialog  "),
                key("?"),
                text(" help  "),
                key("q"),
                text(" quit"),
            ])
        };

        Paragraph::new(line).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Component Implementation
// ═══════════════════════════════════════════════════════════════════════════════

impl Component for App {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Ok(Some(Action::Quit));
        }
        if self.show_help {
            return self.help_dialog.handle_key_event(key);
        }
        if self.editing.is_some() {
            return Ok(self.handle_edit_key_event(key));
        }

        let action = match key.code {
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Char('?') => Some(Action::ToggleHelp),
            KeyCode::Left | KeyCode::Char('h') => Some(Action::PointerPrev),
            KeyCode::Right | KeyCode::Char('l') => Some(Action::PointerNext),
            KeyCode::Enter | KeyCode::Char(' ') => Some(Action::ClickPointed),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::ScrollDown),
            KeyCode::Up | KeyCode::Char('k') => Some(Action::ScrollUp),
            KeyCode::Tab => Some(Action::NextTable),
            KeyCode::Char('/') => Some(Action::BeginSearch),
            KeyCode::Char('o') => Some(Action::OpenFirstTrigger),
            KeyCode::Esc => {
                if self.visible_modal_container().is_some() {
                    Some(Action::DismissModal)
                } else {
                    Some(Action::LeaveTable)
                }
            }
            _ => None,
        };
        Ok(action)
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        if self.show_help {
            return Ok(None);
        }
        let action = match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => Some(Action::MouseClick(mouse.column, mouse.row)),
            MouseEventKind::Moved => Some(Action::MouseMove(mouse.column, mouse.row)),
            MouseEventKind::ScrollDown => Some(Action::ScrollDown),
            MouseEventKind::ScrollUp => Some(Action::ScrollUp),
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        if !matches!(action, Action::Tick) {
            tracing::trace!("Action {}", action);
        }
        match action {
            Action::Tick | Action::Resize(_, _) => {}
            Action::Quit => self.should_quit = true,
            Action::ToggleHelp => self.show_help = !self.show_help,

            // ─────────────────────────────────────────────────────────────────
            // Column pointer
            // ─────────────────────────────────────────────────────────────────
            Action::PointerNext => {
                let count = self.column_count();
                if count == 0 {
                    return Ok(None);
                }
                let next = match self.pointer {
                    Some(p) => (p + 1).min(count - 1),
                    None => 0,
                };
                return Ok(self.point(next));
            }
            Action::PointerPrev => {
                if self.column_count() == 0 {
                    return Ok(None);
                }
                let prev = self.pointer.map(|p| p.saturating_sub(1)).unwrap_or(0);
                return Ok(self.point(prev));
            }
            Action::ClickPointed => {
                return Ok(self
                    .pointed_heading()
                    .map(|heading| Action::Dispatch(PageEvent::Click(heading))));
            }
            Action::LeaveTable => return Ok(self.leave_focused_table()),
            Action::NextTable => {
                let count = self.page.tables().len();
                if count < 2 {
                    return Ok(None);
                }
                let leave = self.leave_focused_table();
                self.focused_table = (self.focused_table + 1) % count;
                return Ok(leave);
            }
            Action::ScrollDown => {
                if let Some(table) = self.page.tables().get(self.focused_table) {
                    let last = table.visible_rows().len().saturating_sub(1);
                    let offset = &mut self.scroll[self.focused_table];
                    *offset = (*offset + 1).min(last);
                }
            }
            Action::ScrollUp => {
                if let Some(offset) = self.scroll.get_mut(self.focused_table) {
                    *offset = offset.saturating_sub(1);
                }
            }

            // ─────────────────────────────────────────────────────────────────
            // Search
            // ─────────────────────────────────────────────────────────────────
            Action::BeginSearch => {
                let Some(column) = self.pointer else {
                    self.status_message = Some("Point at a column first".to_string());
                    return Ok(None);
                };
                let input = self
                    .page
                    .tables()
                    .get(self.focused_table)
                    .and_then(|t| t.column(column))
                    .and_then(|c| c.search_input);
                match input {
                    Some(input) => {
                        self.editing = Some(Editing {
                            table: self.focused_table,
                            column,
                            input,
                            buffer: self.page.document().value(input).to_string(),
                        });
                        self.status_message = None;
                    }
                    None => self.status_message = Some("Column has no search field".to_string()),
                }
            }
            Action::SearchInput(c) => {
                if let Some(editing) = &mut self.editing {
                    editing.buffer.push(c);
                }
            }
            Action::SearchBackspace => {
                if let Some(editing) = &mut self.editing {
                    editing.buffer.pop();
                }
            }
            Action::CommitSearch => {
                if let Some(editing) = self.editing.take() {
                    if let Some(offset) = self.scroll.get_mut(editing.table) {
                        *offset = 0;
                    }
                    return Ok(Some(Action::Dispatch(PageEvent::InputChange(
                        editing.input,
                        editing.buffer,
                    ))));
                }
            }
            Action::CancelSearch => self.editing = None,

            // ─────────────────────────────────────────────────────────────────
            // Modals
            // ─────────────────────────────────────────────────────────────────
            Action::OpenFirstTrigger => {
                let trigger = self
                    .page
                    .modals()
                    .iter()
                    .flat_map(|m| m.triggers.iter())
                    .next()
                    .copied();
                return Ok(trigger.map(|t| Action::Dispatch(PageEvent::Click(t))));
            }
            Action::DismissModal => {
                return Ok(self
                    .visible_modal_container()
                    .map(|c| Action::Dispatch(PageEvent::Click(c))));
            }

            // ─────────────────────────────────────────────────────────────────
            // Mouse
            // ─────────────────────────────────────────────────────────────────
            Action::MouseClick(x, y) => {
                let Some(target) = self.hits.at(x, y) else {
                    return Ok(None);
                };
                if let Some(table) = self.page.table_at(target) {
                    self.focused_table = table;
                }
                return Ok(Some(Action::Dispatch(PageEvent::Click(target))));
            }
            Action::MouseMove(x, y) => {
                let target = self.hits.at(x, y);
                let table = target.and_then(|t| self.page.table_at(t));
                if self.hovered_table != table {
                    if let Some(previous) = self.hovered_table.take() {
                        let container = self.page.tables()[previous].container;
                        self.page.dispatch(PageEvent::PointerLeave(container));
                        if previous == self.focused_table {
                            self.pointer = None;
                        }
                    }
                    self.hovered_table = table;
                }
                if let (Some(table), Some(target)) = (table, target) {
                    if let Some(column) = self.page.tables()[table].column_of(target) {
                        self.focused_table = table;
                        self.pointer = Some(column);
                    }
                    return Ok(Some(Action::Dispatch(PageEvent::PointerEnter(target))));
                }
            }

            Action::Dispatch(event) => {
                let changes = self.page.dispatch(event);
                tracing::trace!("{} view changes", changes);
            }
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        self.hits = HitMap::new();
        let layout = calculate_page_layout(area, self.page.tables().len());

        for (index, table_area) in layout.tables.iter().enumerate() {
            let editing = self
                .editing
                .as_ref()
                .filter(|e| e.table == index)
                .map(|e| (e.column, e.buffer.as_str()));
            let view = TableView {
                page: &self.page,
                index,
                focused: index == self.focused_table,
                editing,
                scroll: self.scroll.get(index).copied().unwrap_or(0),
            };
            view.draw(frame, *table_area, &mut self.hits);
        }

        draw_triggers(frame, layout.triggers, &self.page, &mut self.hits);
        frame.render_widget(Paragraph::new(self.status_line()), layout.status);
        frame.render_widget(self.help_bar(), layout.help);

        // Visible modals sit on top of the whole page
        for modal in self.page.modals() {
            draw_modal(frame, area, &self.page, modal, &mut self.hits);
        }

        if self.show_help {
            self.help_dialog.draw(frame, area)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StateClasses;
    use crate::markup::csv::table_document;
    use ratatui::{backend::TestBackend, Terminal};

    const DATA: &str = "city:string,population:int,founded:date\n\
                        Paris,30,01.03.2000\n\
                        London,10,15 марта 1999\n\
                        Oslo,20,01.01.2001\n";

    fn app() -> App {
        let doc = table_document(DATA.as_bytes(), "cities").unwrap();
        let page = Page::mount(doc, StateClasses::default()).unwrap();
        App::new(page, "cities")
    }

    /// Run an action and every follow-up it produces
    fn run(app: &mut App, action: Action) {
        let mut current = Some(action);
        while let Some(a) = current {
            current = app.update(a).unwrap();
        }
    }

    fn key(app: &mut App, code: KeyCode) {
        if let Some(action) = app
            .handle_key_event(KeyEvent::new(code, KeyModifiers::NONE))
            .unwrap()
        {
            run(app, action);
        }
    }

    fn draw(app: &mut App) {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal
            .draw(|frame| app.draw(frame, frame.area()).unwrap())
            .unwrap();
    }

    fn visible(app: &App) -> Vec<usize> {
        app.page.tables()[0].visible_rows()
    }

    #[test]
    fn test_pointer_hovers_and_click_sorts() {
        let mut app = app();
        key(&mut app, KeyCode::Right);
        key(&mut app, KeyCode::Right);
        assert_eq!(app.pointer, Some(1));
        assert_eq!(app.page.tables()[0].hovered_column(), Some(1));

        key(&mut app, KeyCode::Enter);
        let table = &app.page.tables()[0];
        assert_eq!(table.active_column(), Some(1));
        assert_eq!(table.visible_rows(), vec![1, 2, 0]);

        key(&mut app, KeyCode::Esc);
        assert_eq!(app.pointer, None);
        assert_eq!(app.page.tables()[0].hovered_column(), None);
    }

    #[test]
    fn test_pointer_stays_in_bounds() {
        let mut app = app();
        key(&mut app, KeyCode::Left);
        assert_eq!(app.pointer, Some(0));
        for _ in 0..5 {
            key(&mut app, KeyCode::Char('l'));
        }
        assert_eq!(app.pointer, Some(2));
    }

    #[test]
    fn test_search_edit_commits_input_change() {
        let mut app = app();
        key(&mut app, KeyCode::Right);
        key(&mut app, KeyCode::Char('/'));
        for c in "Lx".chars() {
            key(&mut app, KeyCode::Char(c));
        }
        key(&mut app, KeyCode::Backspace);
        // Nothing filters until the edit is committed
        assert_eq!(visible(&app).len(), 3);

        key(&mut app, KeyCode::Enter);
        assert_eq!(visible(&app), vec![1]);
        let input = app.page.tables()[0].column(0).unwrap().search_input.unwrap();
        assert_eq!(app.page.document().value(input), "L");
    }

    #[test]
    fn test_cancelled_search_changes_nothing() {
        let mut app = app();
        key(&mut app, KeyCode::Right);
        key(&mut app, KeyCode::Char('/'));
        key(&mut app, KeyCode::Char('z'));
        key(&mut app, KeyCode::Esc);
        assert_eq!(visible(&app).len(), 3);
        // q quits again once editing is over
        key(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn test_search_requires_pointer() {
        let mut app = app();
        key(&mut app, KeyCode::Char('/'));
        assert!(app.editing.is_none());
        assert!(app.status_message.is_some());
    }

    #[test]
    fn test_open_and_dismiss_modal() {
        let mut app = app();
        key(&mut app, KeyCode::Char('o'));
        assert!(app.page.modals()[0].is_visible());
        assert_eq!(app.page.listeners().len(), 1);

        key(&mut app, KeyCode::Esc);
        assert!(!app.page.modals()[0].is_visible());
        assert!(app.page.listeners().is_empty());
    }

    #[test]
    fn test_mouse_click_on_heading_sorts() {
        let mut app = app();
        draw(&mut app);
        // Table border at row 0, search inputs at 1, headings at 2
        run(&mut app, Action::MouseClick(1, 2));
        assert_eq!(app.page.tables()[0].active_column(), Some(0));
        assert_eq!(visible(&app), vec![1, 2, 0]);
    }

    #[test]
    fn test_mouse_move_hovers_and_leaves() {
        let mut app = app();
        draw(&mut app);
        run(&mut app, Action::MouseMove(1, 2));
        assert_eq!(app.page.tables()[0].hovered_column(), Some(0));
        assert_eq!(app.pointer, Some(0));

        // Bottom help bar is outside every table
        run(&mut app, Action::MouseMove(1, 23));
        assert_eq!(app.page.tables()[0].hovered_column(), None);
        assert_eq!(app.pointer, None);
    }

    #[test]
    fn test_help_captures_keys() {
        let mut app = app();
        key(&mut app, KeyCode::Char('?'));
        assert!(app.show_help);
        key(&mut app, KeyCode::Char('q'));
        assert!(!app.show_help);
        assert!(!app.should_quit);
    }

    #[test]
    fn test_status_line_reports_rows_and_sort() {
        let mut app = app();
        key(&mut app, KeyCode::Right);
        key(&mut app, KeyCode::Enter);
        let text: String = app
            .status_line()
            .spans
            .iter()
            .map(|s| s.content.to_string())
            .collect();
        assert!(text.contains("3 of 3 rows"));
        assert!(text.contains("sorted by city ▲"));
    }
}
