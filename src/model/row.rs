//! Row and cell models

use super::value::CellValue;
use crate::markup::ElementId;

#[derive(Debug, Clone)]
pub struct Cell {
    pub column_id: usize,
    pub element: ElementId,
    pub value: CellValue,
    /// Whether the cell matches its column's current search term
    pub relevant: bool,
}

/// One entry per data row
#[derive(Debug, Clone)]
pub struct Row {
    /// Index at attach time, used to restore document order
    pub default_position: usize,
    pub element: ElementId,
    pub cells: Vec<Cell>,
}

impl Row {
    /// A row is shown only when every one of its cells is relevant
    pub fn is_visible(&self) -> bool {
        self.cells.iter().all(|cell| cell.relevant)
    }

    pub fn cell(&self, column: usize) -> Option<&Cell> {
        self.cells.get(column)
    }
}
