//! Filter engine - per-column relevance combined across columns
//!
//! Each column keeps its own relevance flags on its cells. Changing one
//! column's term only touches that column's flags; visibility is the AND
//! over all of a row's cells, always recomputed from the flags.

use crate::model::row::Row;
use crate::model::value::{parse_date_term, parse_int, CellValue, ColumnType, TypedValue};
use chrono::NaiveDate;

/// A search term interpreted in its column's type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchTerm {
    /// Empty term; everything matches
    Any,
    Int(i64),
    Date(NaiveDate),
    Text(String),
    /// Term could not be read in the column's type; nothing matches
    Unmatchable,
}

impl SearchTerm {
    pub fn parse(raw: &str, column_type: ColumnType) -> SearchTerm {
        if raw.is_empty() {
            return SearchTerm::Any;
        }
        match column_type {
            ColumnType::Int => parse_int(raw)
                .map(SearchTerm::Int)
                .unwrap_or(SearchTerm::Unmatchable),
            ColumnType::Date => parse_date_term(raw)
                .map(SearchTerm::Date)
                .unwrap_or(SearchTerm::Unmatchable),
            ColumnType::String => SearchTerm::Text(raw.to_string()),
        }
    }

    pub fn matches(&self, value: &CellValue) -> bool {
        match (self, value.typed()) {
            (SearchTerm::Any, _) => true,
            (SearchTerm::Int(term), Some(TypedValue::Int(n))) => n == term,
            (SearchTerm::Date(term), Some(TypedValue::Date(d))) => d == term,
            (SearchTerm::Text(term), Some(TypedValue::Text(s))) => s.contains(term.as_str()),
            _ => false,
        }
    }
}

/// Recompute relevance of `column`'s cells; other columns are untouched
pub fn apply_term(rows: &mut [Row], column: usize, term: &SearchTerm) {
    for row in rows.iter_mut() {
        for cell in row.cells.iter_mut().filter(|c| c.column_id == column) {
            cell.relevant = term.matches(&cell.value);
        }
    }
}
