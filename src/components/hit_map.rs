//! Maps screen cells back to the document elements drawn there

use crate::markup::ElementId;
use ratatui::layout::{Position, Rect};

#[derive(Debug, Default, Clone)]
pub struct HitMap {
    regions: Vec<(Rect, ElementId)>,
}

impl HitMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a region; later regions sit on top of earlier ones
    pub fn push(&mut self, area: Rect, element: ElementId) {
        if area.width > 0 && area.height > 0 {
            self.regions.push((area, element));
        }
    }

    /// Topmost element at a screen position
    pub fn at(&self, x: u16, y: u16) -> Option<ElementId> {
        let position = Position::new(x, y);
        self.regions
            .iter()
            .rev()
            .find(|(area, _)| area.contains(position))
            .map(|(_, element)| *element)
    }
}
