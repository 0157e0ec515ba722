//! Column model

use super::value::ColumnType;
use crate::markup::ElementId;

/// Sort direction of a column, cycling default → ascending → descending
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortState {
    #[default]
    Default,
    Ascending,
    Descending,
}

impl SortState {
    pub fn next(self) -> SortState {
        match self {
            SortState::Default => SortState::Ascending,
            SortState::Ascending => SortState::Descending,
            SortState::Descending => SortState::Default,
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            SortState::Default => "",
            SortState::Ascending => "▲",
            SortState::Descending => "▼",
        }
    }
}

/// One entry per table heading
#[derive(Debug, Clone)]
pub struct Column {
    /// Position of the column's cells within each row
    pub id: usize,
    /// Search name; `None` disables filtering for the column
    pub name: Option<String>,
    pub column_type: ColumnType,
    pub sort: SortState,
    pub active: bool,
    pub hovered: bool,
    pub heading: ElementId,
    pub search_input: Option<ElementId>,
    /// Cell elements of this column, for highlighting only
    pub cell_elements: Vec<ElementId>,
}

impl Column {
    pub fn new(id: usize, name: Option<String>, column_type: ColumnType, heading: ElementId) -> Self {
        Self {
            id,
            name,
            column_type,
            sort: SortState::Default,
            active: false,
            hovered: false,
            heading,
            search_input: None,
            cell_elements: Vec::new(),
        }
    }

    /// Drop the column's sort target status
    pub fn deactivate(&mut self) {
        self.active = false;
        self.sort = SortState::Default;
    }
}
