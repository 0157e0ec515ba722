//! Smart table - sortable, filterable table attached to existing markup
//!
//! `SmartTable` owns the column and row models and is the only writer of
//! them. Interaction goes through `click_column`, `hover_column`,
//! `leave_table` and `set_search_term`; the resulting view state is read
//! back with `render`, which describes every state class and the row order
//! as `ViewPatch`es for the document to apply.

pub mod filter;
pub mod sort;

use crate::config::StateClasses;
use crate::error::{MarkupError, ParseError};
use crate::markup::{Document, ElementId, ViewPatch};
use crate::model::column::{Column, SortState};
use crate::model::row::{Cell, Row};
use crate::model::value::{CellValue, ColumnType};
use filter::SearchTerm;
use std::collections::HashMap;

/// A cell whose text could not be read in its column's type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellDiagnostic {
    pub row: usize,
    pub column: usize,
    pub error: ParseError,
}

#[derive(Debug)]
pub struct SmartTable {
    pub container: ElementId,
    body: Option<ElementId>,
    columns: Vec<Column>,
    /// Rows in their current display order
    rows: Vec<Row>,
    active: Option<usize>,
    hovered: Option<usize>,
    /// Heading and cell elements mapped to their column
    element_columns: HashMap<ElementId, usize>,
    diagnostics: Vec<CellDiagnostic>,
}

impl SmartTable {
    /// Scan a `.smart-table` container and build its models
    pub fn attach(doc: &Document, container: ElementId) -> Result<Self, MarkupError> {
        let mut element_columns = HashMap::new();
        let mut columns = Vec::new();

        for (i, heading) in doc
            .query_class(container, "smart-table__heading")
            .into_iter()
            .enumerate()
        {
            let name = doc
                .attr(heading, "data-name")
                .filter(|n| !n.is_empty())
                .map(str::to_string);
            let column_type = match doc.attr(heading, "data-type") {
                None => ColumnType::String,
                Some(value) => value
                    .parse::<ColumnType>()
                    .map_err(|value| MarkupError::UnknownColumnType { column: i, value })?,
            };

            let mut column = Column::new(i, name, column_type, heading);
            if let Some(ref name) = column.name {
                let input = doc
                    .first_class_attr(container, "smart-table__search", "name", name)
                    .ok_or_else(|| MarkupError::MissingSearchInput {
                        column: i,
                        name: name.clone(),
                    })?;
                column.search_input = Some(input);
            }
            element_columns.insert(heading, i);
            columns.push(column);
        }

        let row_elements = doc.query_class(container, "smart-table__row");
        let body = doc
            .first_tag(container, "tbody")
            .or_else(|| row_elements.first().and_then(|r| doc.parent(*r)));
        if body.is_none() && !row_elements.is_empty() {
            return Err(MarkupError::MissingBody);
        }

        let mut rows = Vec::with_capacity(row_elements.len());
        let mut diagnostics = Vec::new();
        for (position, row_element) in row_elements.into_iter().enumerate() {
            let cell_elements = doc.query_class(row_element, "smart-table__cell");
            if cell_elements.len() != columns.len() {
                return Err(MarkupError::RaggedRow {
                    row: position,
                    found: cell_elements.len(),
                    expected: columns.len(),
                });
            }

            let mut cells = Vec::with_capacity(cell_elements.len());
            for (j, cell_element) in cell_elements.into_iter().enumerate() {
                let column = &mut columns[j];
                let value = CellValue::from_text(doc.text(cell_element), column.column_type);
                if let CellValue::Malformed { ref raw, ref error } = value {
                    tracing::warn!("Row {} column {}: cannot read '{}': {}", position, j, raw, error);
                    diagnostics.push(CellDiagnostic {
                        row: position,
                        column: j,
                        error: error.clone(),
                    });
                }
                column.cell_elements.push(cell_element);
                element_columns.insert(cell_element, j);
                cells.push(Cell {
                    column_id: j,
                    element: cell_element,
                    value,
                    relevant: true,
                });
            }

            rows.push(Row {
                default_position: position,
                element: row_element,
                cells,
            });
        }

        tracing::debug!(
            "Attached smart table: {} columns, {} rows, {} malformed cells",
            columns.len(),
            rows.len(),
            diagnostics.len()
        );

        Ok(Self {
            container,
            body,
            columns,
            rows,
            active: None,
            hovered: None,
            element_columns,
            diagnostics,
        })
    }

    /// Attach one smart table per container
    pub fn attach_all(doc: &Document, containers: &[ElementId]) -> Result<Vec<Self>, MarkupError> {
        containers
            .iter()
            .map(|container| Self::attach(doc, *container))
            .collect()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    /// Element the rows are re-appended to
    pub fn body(&self) -> Option<ElementId> {
        self.body
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, id: usize) -> Option<&Column> {
        self.columns.get(id)
    }

    /// Rows in display order
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Default positions of visible rows, in display order
    pub fn visible_rows(&self) -> Vec<usize> {
        self.rows
            .iter()
            .filter(|row| row.is_visible())
            .map(|row| row.default_position)
            .collect()
    }

    pub fn active_column(&self) -> Option<usize> {
        self.active
    }

    pub fn hovered_column(&self) -> Option<usize> {
        self.hovered
    }

    pub fn diagnostics(&self) -> &[CellDiagnostic] {
        &self.diagnostics
    }

    /// Column of a heading or cell element
    pub fn column_of(&self, element: ElementId) -> Option<usize> {
        self.element_columns.get(&element).copied()
    }

    pub fn column_for_input(&self, input: ElementId) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.search_input == Some(input))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Interaction
    // ─────────────────────────────────────────────────────────────────────────

    /// Heading or cell clicked: make the column the sort target and advance its sort
    pub fn click_column(&mut self, id: usize) {
        if id >= self.columns.len() {
            return;
        }
        if !self.columns[id].active {
            if let Some(previous) = self.active.take() {
                self.columns[previous].deactivate();
            }
            self.columns[id].active = true;
            self.active = Some(id);
        }

        let column = &mut self.columns[id];
        column.sort = column.sort.next();
        let state = column.sort;
        sort::sort_rows(&mut self.rows, id, state);
        tracing::debug!("Column {} sorted {:?}", id, state);
    }

    /// Pointer entered a heading or cell of the column
    pub fn hover_column(&mut self, id: usize) {
        if id >= self.columns.len() || self.columns[id].hovered {
            return;
        }
        if let Some(previous) = self.hovered.take() {
            self.columns[previous].hovered = false;
        }
        self.columns[id].hovered = true;
        self.hovered = Some(id);
    }

    /// Pointer left the table
    pub fn leave_table(&mut self) {
        if let Some(previous) = self.hovered.take() {
            self.columns[previous].hovered = false;
        }
    }

    /// Recompute relevance for one column from its new search term
    pub fn set_search_term(&mut self, id: usize, term: &str) {
        let Some(column) = self.columns.get(id) else {
            return;
        };
        let term = SearchTerm::parse(term, column.column_type);
        filter::apply_term(&mut self.rows, id, &term);
        tracing::debug!(
            "Column {} filtered by {:?}: {} of {} rows visible",
            id,
            term,
            self.visible_rows().len(),
            self.rows.len()
        );
    }

    /// A search input changed: read its value from the document and filter
    pub fn search_input_changed(&mut self, doc: &Document, input: ElementId) -> bool {
        match self.column_for_input(input) {
            Some(id) => {
                self.set_search_term(id, doc.value(input));
                true
            }
            None => false,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Render
    // ─────────────────────────────────────────────────────────────────────────

    /// Describe the full view state of the table
    pub fn render(&self, classes: &StateClasses) -> Vec<ViewPatch> {
        let mut patches = Vec::new();

        for column in &self.columns {
            let heading = column.heading;
            patches.push(ViewPatch::class(heading, &classes.heading_active, column.active));
            patches.push(ViewPatch::class(heading, &classes.heading_hover, column.hovered));
            patches.push(ViewPatch::class(
                heading,
                &classes.heading_asc,
                column.sort == SortState::Ascending,
            ));
            patches.push(ViewPatch::class(
                heading,
                &classes.heading_desc,
                column.sort == SortState::Descending,
            ));
            for cell in &column.cell_elements {
                patches.push(ViewPatch::class(*cell, &classes.cell_active, column.active));
                patches.push(ViewPatch::class(*cell, &classes.cell_hover, column.hovered));
            }
        }

        for row in &self.rows {
            patches.push(ViewPatch::class(row.element, &classes.row_hidden, !row.is_visible()));
        }

        if let Some(body) = self.body {
            patches.push(ViewPatch::Reorder {
                parent: body,
                children: self.rows.iter().map(|row| row.element).collect(),
            });
        }

        patches
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::markup::{Document, ElementSpec};
    use crate::model::row::Row;

    /// Markup for a smart table whose columns are named `c0`, `c1`, ...
    pub fn table_spec(types: &[&str], rows: &[&[&str]]) -> ElementSpec {
        let searches = (0..types.len())
            .map(|i| ElementSpec::new("input", "smart-table__search").with_attr("name", format!("c{}", i)))
            .collect();
        let headings = types
            .iter()
            .enumerate()
            .map(|(i, ty)| {
                ElementSpec::new("th", "smart-table__heading")
                    .with_text(format!("C{}", i))
                    .with_attr("data-name", format!("c{}", i))
                    .with_attr("data-type", *ty)
            })
            .collect();
        let body = rows
            .iter()
            .map(|cells| {
                ElementSpec::new("tr", "smart-table__row").with_children(
                    cells
                        .iter()
                        .map(|text| ElementSpec::new("td", "smart-table__cell").with_text(*text))
                        .collect(),
                )
            })
            .collect();

        ElementSpec::new("div", "smart-table").with_children(vec![
            ElementSpec::new("div", "").with_children(searches),
            ElementSpec::new("tr", "").with_children(headings),
            ElementSpec::new("tbody", "").with_children(body),
        ])
    }

    pub fn document(types: &[&str], rows: &[&[&str]]) -> Document {
        Document::from_spec(ElementSpec::new("body", "").with_children(vec![table_spec(types, rows)]))
    }

    pub fn rows_from(types: &[&str], rows: &[&[&str]]) -> Vec<Row> {
        let doc = document(types, rows);
        let container = doc.first_class(doc.root(), "smart-table").unwrap();
        super::SmartTable::attach(&doc, container).unwrap().rows
    }
}
