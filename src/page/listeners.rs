//! Document-level click listeners

/// Handle returned when a listener is registered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// What a document-level listener does when a click reaches the document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Listener {
    /// Hide modal `modal` unless the click landed inside its window
    OutsideClick { modal: usize },
}

/// Listeners attached to the document, run in registration order
#[derive(Debug, Default)]
pub struct ListenerRegistry {
    next_id: u64,
    entries: Vec<(ListenerId, Listener)>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, listener));
        id
    }

    /// Remove a listener; returns false if it was not registered
    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot of current listeners, so handlers may add or remove while dispatching
    pub fn snapshot(&self) -> Vec<(ListenerId, Listener)> {
        self.entries.clone()
    }

    pub fn is_registered(&self, id: ListenerId) -> bool {
        self.entries.iter().any(|(entry_id, _)| *entry_id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_remove() {
        let mut registry = ListenerRegistry::new();
        let a = registry.add(Listener::OutsideClick { modal: 0 });
        let b = registry.add(Listener::OutsideClick { modal: 1 });
        assert_ne!(a, b);
        assert_eq!(registry.len(), 2);

        assert!(registry.remove(a));
        assert!(!registry.remove(a));
        assert_eq!(registry.snapshot(), vec![(b, Listener::OutsideClick { modal: 1 })]);
    }
}
