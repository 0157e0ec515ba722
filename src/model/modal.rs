//! Modal dialog state machine
//!
//! A modal is either hidden or visible. Its outside-click listener exists
//! only while it is visible: it is registered on show and removed on hide,
//! so repeated open/close cycles never accumulate listeners.

use crate::config::StateClasses;
use crate::error::MarkupError;
use crate::markup::{Document, ElementId, ViewPatch};
use crate::page::listeners::{Listener, ListenerId, ListenerRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalState {
    Hidden,
    Visible,
}

/// A dismissible overlay attached to a `.modal` container
#[derive(Debug)]
pub struct Modal {
    /// Position of this modal on the page
    pub index: usize,
    pub id: String,
    pub container: ElementId,
    pub window: ElementId,
    pub close: ElementId,
    /// Elements anywhere in the document with `data-target` equal to `id`
    pub triggers: Vec<ElementId>,
    state: ModalState,
    outside_click: Option<ListenerId>,
}

impl Modal {
    pub fn attach(doc: &Document, container: ElementId, index: usize) -> Result<Self, MarkupError> {
        let id = doc.get(container).id.clone().unwrap_or_default();
        let window = doc
            .first_class(container, "modal__window")
            .ok_or_else(|| MarkupError::MissingModalPart {
                id: id.clone(),
                part: "window",
            })?;
        let close = doc
            .first_class(container, "modal__close")
            .ok_or_else(|| MarkupError::MissingModalPart {
                id: id.clone(),
                part: "close",
            })?;
        let triggers = if id.is_empty() {
            Vec::new()
        } else {
            doc.query_attr("data-target", &id)
        };

        Ok(Self {
            index,
            id,
            container,
            window,
            close,
            triggers,
            state: ModalState::Hidden,
            outside_click: None,
        })
    }

    /// Attach one modal per container
    pub fn attach_all(doc: &Document, containers: &[ElementId]) -> Result<Vec<Self>, MarkupError> {
        containers
            .iter()
            .enumerate()
            .map(|(i, container)| Self::attach(doc, *container, i))
            .collect()
    }

    pub fn is_visible(&self) -> bool {
        self.state == ModalState::Visible
    }

    pub fn is_trigger(&self, element: ElementId) -> bool {
        self.triggers.contains(&element)
    }

    /// Trigger clicked: show if hidden
    pub fn open(&mut self, listeners: &mut ListenerRegistry) -> bool {
        if self.state != ModalState::Hidden {
            return false;
        }
        self.state = ModalState::Visible;
        self.outside_click = Some(listeners.add(Listener::OutsideClick { modal: self.index }));
        tracing::debug!("Modal '{}' shown", self.id);
        true
    }

    /// Close control clicked: hide if visible
    pub fn close(&mut self, listeners: &mut ListenerRegistry) -> bool {
        if self.state != ModalState::Visible {
            return false;
        }
        self.state = ModalState::Hidden;
        if let Some(id) = self.outside_click.take() {
            listeners.remove(id);
        }
        tracing::debug!("Modal '{}' hidden", self.id);
        true
    }

    /// A click reached the document: hide unless it landed in the window
    pub fn outside_click(
        &mut self,
        doc: &Document,
        target: ElementId,
        listeners: &mut ListenerRegistry,
    ) -> bool {
        if doc.contains(self.window, target) {
            return false;
        }
        self.close(listeners)
    }

    pub fn render(&self, classes: &StateClasses) -> Vec<ViewPatch> {
        vec![ViewPatch::class(
            self.container,
            &classes.modal_hidden,
            self.state == ModalState::Hidden,
        )]
    }
}
