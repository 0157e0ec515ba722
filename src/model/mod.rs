//! Model layer - widget state
//!
//! - `value` - cell parsing and typed values
//! - `column` / `row` - the smart table's column, row and cell models
//! - `modal` - modal dialog state machine

pub mod column;
pub mod modal;
pub mod row;
pub mod value;
