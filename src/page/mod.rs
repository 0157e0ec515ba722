//! Page - mounts widgets on a document and routes events to them
//!
//! The host decides when to mount and how long the page lives. Events are
//! handled one at a time, in delivery order, each running to completion.

pub mod listeners;

use crate::config::StateClasses;
use crate::error::MarkupError;
use crate::markup::{Document, ElementId, ViewPatch};
use crate::model::modal::Modal;
use crate::table::SmartTable;
use listeners::{Listener, ListenerRegistry};

/// Input delivered to the page, addressed to a document element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    Click(ElementId),
    PointerEnter(ElementId),
    PointerLeave(ElementId),
    /// A form field committed a new value
    InputChange(ElementId, String),
}

pub struct Page {
    document: Document,
    tables: Vec<SmartTable>,
    modals: Vec<Modal>,
    listeners: ListenerRegistry,
    classes: StateClasses,
}

impl Page {
    /// Attach a widget to every `.smart-table` and `.modal` container
    pub fn mount(document: Document, classes: StateClasses) -> Result<Self, MarkupError> {
        let tables = SmartTable::attach_all(&document, &containers(&document, "smart-table"))?;
        let modals = Modal::attach_all(&document, &containers(&document, "modal"))?;
        tracing::info!("Mounted {} tables and {} modals", tables.len(), modals.len());

        let mut page = Self {
            document,
            tables,
            modals,
            listeners: ListenerRegistry::new(),
            classes,
        };
        page.refresh();
        Ok(page)
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn tables(&self) -> &[SmartTable] {
        &self.tables
    }

    pub fn modals(&self) -> &[Modal] {
        &self.modals
    }

    #[cfg(test)]
    pub fn listeners(&self) -> &ListenerRegistry {
        &self.listeners
    }

    pub fn classes(&self) -> &StateClasses {
        &self.classes
    }

    /// Index of the table whose container holds `element`
    pub fn table_at(&self, element: ElementId) -> Option<usize> {
        self.tables
            .iter()
            .position(|t| self.document.contains(t.container, element))
    }

    /// Handle one event and apply the resulting view; returns the number of changes
    pub fn dispatch(&mut self, event: PageEvent) -> usize {
        tracing::trace!("Dispatch {:?}", event);
        match event {
            PageEvent::Click(target) => self.click(target),
            PageEvent::PointerEnter(target) => {
                if let Some(t) = self.table_at(target) {
                    if let Some(column) = self.tables[t].column_of(target) {
                        self.tables[t].hover_column(column);
                    }
                }
            }
            PageEvent::PointerLeave(target) => {
                if let Some(table) = self.tables.iter_mut().find(|t| t.container == target) {
                    table.leave_table();
                }
            }
            PageEvent::InputChange(input, value) => {
                self.document.set_value(input, &value);
                for table in &mut self.tables {
                    if table.search_input_changed(&self.document, input) {
                        break;
                    }
                }
            }
        }
        if !self.listeners.is_empty() {
            tracing::trace!("{} document listeners registered", self.listeners.len());
        }
        self.refresh()
    }

    /// Bubble a click from `target` up to the root, then to document listeners
    fn click(&mut self, target: ElementId) {
        let mut stopped = false;
        let mut current = Some(target);

        while let Some(element) = current {
            if let Some(modal) = self.modals.iter_mut().find(|m| m.is_trigger(element)) {
                modal.open(&mut self.listeners);
                // The click that opened the modal must not reach its outside-click listener
                stopped = true;
                break;
            }
            if let Some(modal) = self.modals.iter_mut().find(|m| m.close == element) {
                modal.close(&mut self.listeners);
            }
            if self.tables.iter().any(|t| t.container == element) {
                // Clicks inside a table never count as outside clicks
                stopped = true;
                break;
            }
            for table in &mut self.tables {
                if let Some(column) = table.column_of(element) {
                    table.click_column(column);
                }
            }
            current = self.document.parent(element);
        }

        if stopped {
            return;
        }

        for (id, listener) in self.listeners.snapshot() {
            if !self.listeners.is_registered(id) {
                continue;
            }
            match listener {
                Listener::OutsideClick { modal } => {
                    if let Some(modal) = self.modals.get_mut(modal) {
                        modal.outside_click(&self.document, target, &mut self.listeners);
                    }
                }
            }
        }
    }

    /// Current view state of every widget
    pub fn render(&self) -> Vec<ViewPatch> {
        let mut patches = Vec::new();
        for table in &self.tables {
            patches.extend(table.render(&self.classes));
        }
        for modal in &self.modals {
            patches.extend(modal.render(&self.classes));
        }
        patches
    }

    fn refresh(&mut self) -> usize {
        let patches = self.render();
        self.document.apply(&patches)
    }
}

/// Containers carrying `class`, including the root itself
fn containers(doc: &Document, class: &str) -> Vec<ElementId> {
    let mut found = Vec::new();
    if doc.has_class(doc.root(), class) {
        found.push(doc.root());
    }
    found.extend(doc.query_class(doc.root(), class));
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::ElementSpec;
    use crate::table::testing::table_spec;

    fn page() -> Page {
        let doc = Document::from_spec(ElementSpec::new("body", "").with_children(vec![
            table_spec(
                &["string", "int"],
                &[&["Paris", "30"], &["London", "10"], &["Oslo", "20"]],
            ),
            ElementSpec::new("button", "trigger")
                .with_attr("data-target", "info")
                .with_children(vec![ElementSpec::new("span", "trigger-label")]),
            ElementSpec::new("p", "elsewhere"),
            ElementSpec::new("div", "modal")
                .with_id("info")
                .with_children(vec![
                    ElementSpec::new("div", "modal__window").with_text("Hello"),
                    ElementSpec::new("button", "modal__close"),
                ]),
        ]));
        Page::mount(doc, StateClasses::default()).unwrap()
    }

    fn find(page: &Page, class: &str) -> ElementId {
        let doc = page.document();
        doc.first_class(doc.root(), class).unwrap()
    }

    fn modal_hidden(page: &Page) -> bool {
        let modal = page.modals()[0].container;
        page.document().has_class(modal, "modal_hidden")
    }

    #[test]
    fn test_mount_applies_initial_view() {
        let page = page();
        assert_eq!(page.tables().len(), 1);
        assert_eq!(page.modals().len(), 1);
        assert!(modal_hidden(&page));
        assert!(page.listeners().is_empty());
    }

    #[test]
    fn test_modal_scenario() {
        let mut page = page();

        // Clicking a child of the trigger bubbles to the trigger
        page.dispatch(PageEvent::Click(find(&page, "trigger-label")));
        assert!(!modal_hidden(&page));
        assert_eq!(page.listeners().len(), 1);

        page.dispatch(PageEvent::Click(find(&page, "modal__window")));
        assert!(!modal_hidden(&page));

        page.dispatch(PageEvent::Click(find(&page, "elsewhere")));
        assert!(modal_hidden(&page));
        assert!(page.listeners().is_empty());
    }

    #[test]
    fn test_close_button_hides() {
        let mut page = page();
        page.dispatch(PageEvent::Click(find(&page, "trigger")));
        page.dispatch(PageEvent::Click(find(&page, "modal__close")));
        assert!(modal_hidden(&page));
        assert!(page.listeners().is_empty());
    }

    #[test]
    fn test_table_click_is_not_an_outside_click() {
        let mut page = page();
        page.dispatch(PageEvent::Click(find(&page, "trigger")));

        let heading = page.tables()[0].column(1).unwrap().heading;
        page.dispatch(PageEvent::Click(heading));
        assert!(!modal_hidden(&page));
        assert_eq!(page.tables()[0].active_column(), Some(1));
    }

    #[test]
    fn test_cell_click_sorts_its_column() {
        let mut page = page();
        let cell = page.tables()[0].rows()[0].cells[1].element;
        page.dispatch(PageEvent::Click(cell));

        let table = &page.tables()[0];
        assert_eq!(table.active_column(), Some(1));
        assert_eq!(table.visible_rows(), vec![1, 2, 0]);

        let doc = page.document();
        let body = doc.first_tag(table.container, "tbody").unwrap();
        let names: Vec<&str> = doc
            .children(body)
            .iter()
            .map(|row| doc.text(doc.children(*row)[0]))
            .collect();
        assert_eq!(names, vec!["London", "Oslo", "Paris"]);
    }

    #[test]
    fn test_hover_and_leave() {
        let mut page = page();
        let cell = page.tables()[0].rows()[2].cells[0].element;
        page.dispatch(PageEvent::PointerEnter(cell));

        let heading = page.tables()[0].column(0).unwrap().heading;
        assert!(page.document().has_class(heading, "smart-table__heading_hover"));
        assert!(page.document().has_class(cell, "smart-table__cell_hover"));

        let container = page.tables()[0].container;
        page.dispatch(PageEvent::PointerLeave(container));
        assert!(!page.document().has_class(heading, "smart-table__heading_hover"));
        assert!(!page.document().has_class(cell, "smart-table__cell_hover"));
    }

    #[test]
    fn test_input_change_filters() {
        let mut page = page();
        let input = page.tables()[0].column(0).unwrap().search_input.unwrap();
        let changed = page.dispatch(PageEvent::InputChange(input, "o".to_string()));
        assert!(changed > 0);
        assert_eq!(page.document().value(input), "o");

        let hidden: Vec<bool> = page.tables()[0]
            .rows()
            .iter()
            .map(|r| page.document().has_class(r.element, "smart-table__row_hidden"))
            .collect();
        assert_eq!(hidden, vec![true, false, false]);
    }

    #[test]
    fn test_repeated_cycles_keep_one_listener() {
        let mut page = page();
        for _ in 0..3 {
            page.dispatch(PageEvent::Click(find(&page, "trigger")));
            assert_eq!(page.listeners().len(), 1);
            page.dispatch(PageEvent::Click(find(&page, "elsewhere")));
            assert_eq!(page.listeners().len(), 0);
        }
    }
}
