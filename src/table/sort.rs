//! Sort engine - orders rows by one column or restores document order

use crate::model::column::SortState;
use crate::model::row::Row;
use crate::model::value::{compare, CellValue};
use std::cmp::Ordering;

/// Compare two cells of the same column in ascending order.
/// Malformed cells come after every parsed value regardless of direction.
fn compare_cells(a: &CellValue, b: &CellValue, descending: bool) -> Ordering {
    match (a.typed(), b.typed()) {
        (Some(x), Some(y)) => {
            let ord = compare(x, y);
            if descending {
                ord.reverse()
            } else {
                ord
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Reorder `rows` for `column` in the given direction.
///
/// Ties keep document order in both directions, and `Default` restores it.
pub fn sort_rows(rows: &mut [Row], column: usize, state: SortState) {
    match state {
        SortState::Default => rows.sort_by_key(|row| row.default_position),
        SortState::Ascending | SortState::Descending => {
            let descending = state == SortState::Descending;
            rows.sort_by(|a, b| {
                let ord = match (a.cell(column), b.cell(column)) {
                    (Some(x), Some(y)) => compare_cells(&x.value, &y.value, descending),
                    _ => Ordering::Equal,
                };
                ord.then(a.default_position.cmp(&b.default_position))
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::testing::rows_from;

    fn order(rows: &[Row]) -> Vec<usize> {
        rows.iter().map(|r| r.default_position).collect()
    }

    #[test]
    fn test_int_scenario() {
        let mut rows = rows_from(&["int"], &[&["30"], &["10"], &["20"]]);
        sort_rows(&mut rows, 0, SortState::Ascending);
        assert_eq!(order(&rows), vec![1, 2, 0]);
        sort_rows(&mut rows, 0, SortState::Descending);
        assert_eq!(order(&rows), vec![0, 2, 1]);
        sort_rows(&mut rows, 0, SortState::Default);
        assert_eq!(order(&rows), vec![0, 1, 2]);
    }

    #[test]
    fn test_ties_keep_document_order_both_ways() {
        let mut rows = rows_from(
            &["int", "string"],
            &[&["2", "a"], &["1", "b"], &["2", "c"], &["1", "d"]],
        );
        sort_rows(&mut rows, 0, SortState::Ascending);
        assert_eq!(order(&rows), vec![1, 3, 0, 2]);
        sort_rows(&mut rows, 0, SortState::Descending);
        assert_eq!(order(&rows), vec![0, 2, 1, 3]);
    }

    #[test]
    fn test_dates_sort_by_time() {
        let mut rows = rows_from(
            &["date"],
            &[&["01.02.2024"], &["15 января 2024"], &["31.12.2023"]],
        );
        sort_rows(&mut rows, 0, SortState::Ascending);
        assert_eq!(order(&rows), vec![2, 1, 0]);
    }

    #[test]
    fn test_strings_sort_case_insensitively() {
        let mut rows = rows_from(&["string"], &[&["paris"], &["London"], &["oslo"]]);
        sort_rows(&mut rows, 0, SortState::Ascending);
        assert_eq!(order(&rows), vec![1, 2, 0]);
    }

    #[test]
    fn test_malformed_cells_sort_last() {
        let mut rows = rows_from(&["int"], &[&["n/a"], &["5"], &["1"]]);
        sort_rows(&mut rows, 0, SortState::Ascending);
        assert_eq!(order(&rows), vec![2, 1, 0]);
        sort_rows(&mut rows, 0, SortState::Descending);
        assert_eq!(order(&rows), vec![1, 2, 0]);
    }
}
