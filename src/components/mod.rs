//! UI Components
//!
//! Views draw the page document; dialogs own their own key handling.

pub mod help_dialog;
pub mod hit_map;
pub mod layout;
pub mod modal_view;
pub mod table_view;

pub use help_dialog::HelpDialog;
pub use hit_map::HitMap;
pub use layout::{calculate_page_layout, centered_popup};
pub use modal_view::{draw_modal, draw_triggers};
pub use table_view::TableView;
