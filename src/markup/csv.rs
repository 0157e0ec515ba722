//! Builds smart table markup from CSV data
//!
//! Header cells are written `name:type`. An empty name turns off searching
//! for that column and an omitted type means `string`:
//!
//! ```text
//! city:string,population:int,:date
//! Paris,2100000,15.03.2024
//! ```

use super::{Document, ElementSpec};
use anyhow::{Context, Result};
use std::io::Read;

/// Id of the modal added next to the generated table
pub const ABOUT_MODAL_ID: &str = "about";

/// Split a header cell into its search name and declared type
fn split_header(cell: &str) -> (String, String) {
    match cell.trim().split_once(':') {
        Some((name, ty)) if !ty.trim().is_empty() => {
            (name.trim().to_string(), ty.trim().to_string())
        }
        Some((name, _)) => (name.trim().to_string(), "string".to_string()),
        None => (cell.trim().to_string(), "string".to_string()),
    }
}

/// Read CSV and produce a document with one smart table and an about modal
pub fn table_document<R: Read>(reader: R, title: &str) -> Result<Document> {
    let mut csv_reader = ::csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<(String, String)> = csv_reader
        .headers()
        .context("Failed to read CSV header")?
        .iter()
        .map(split_header)
        .collect();

    let mut rows = Vec::new();
    for (i, record) in csv_reader.records().enumerate() {
        let record = record.with_context(|| format!("Failed to read CSV record {}", i + 1))?;
        let cells = record
            .iter()
            .map(|value| ElementSpec::new("td", "smart-table__cell").with_text(value))
            .collect();
        rows.push(ElementSpec::new("tr", "smart-table__row").with_children(cells));
    }
    let row_count = rows.len();

    let searches = headers
        .iter()
        .filter(|(name, _)| !name.is_empty())
        .map(|(name, _)| {
            ElementSpec::new("input", "smart-table__search")
                .with_attr("name", name.clone())
                .with_attr("value", "")
        })
        .collect();

    let headings = headers
        .iter()
        .enumerate()
        .map(|(i, (name, ty))| {
            let label = if name.is_empty() {
                format!("#{}", i + 1)
            } else {
                name.clone()
            };
            ElementSpec::new("th", "smart-table__heading")
                .with_text(label)
                .with_attr("data-name", name.clone())
                .with_attr("data-type", ty.clone())
        })
        .collect();

    let table = ElementSpec::new("div", "smart-table").with_children(vec![
        ElementSpec::new("div", "smart-table__searches").with_children(searches),
        ElementSpec::new("table", "smart-table__grid").with_children(vec![
            ElementSpec::new("thead", "").with_children(vec![
                ElementSpec::new("tr", "").with_children(headings),
            ]),
            ElementSpec::new("tbody", "").with_children(rows),
        ]),
    ]);

    let trigger = ElementSpec::new("button", "modal-trigger")
        .with_attr("data-target", ABOUT_MODAL_ID)
        .with_text("About");

    let modal = ElementSpec::new("div", "modal modal_hidden")
        .with_id(ABOUT_MODAL_ID)
        .with_children(vec![
            ElementSpec::new("div", "modal__window").with_text(format!(
                "{}: {} columns, {} rows",
                title,
                headers.len(),
                row_count
            )),
            ElementSpec::new("button", "modal__close").with_text("Close"),
        ]);

    let page = ElementSpec::new("body", "").with_children(vec![table, trigger, modal]);
    Ok(Document::from_spec(page))
}
