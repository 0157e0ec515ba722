//! Action enum - All possible application actions
//!
//! Key and mouse events are turned into Actions; `App::update` turns
//! Actions into page events for the widgets.

use crate::page::PageEvent;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // ─────────────────────────────────────────────────────────────────────────
    // App Lifecycle
    // ─────────────────────────────────────────────────────────────────────────
    Tick,
    Resize(u16, u16),
    Quit,
    ToggleHelp,

    // ─────────────────────────────────────────────────────────────────────────
    // Column pointer
    // ─────────────────────────────────────────────────────────────────────────
    /// Move the pointer to the next column (hover)
    PointerNext,
    /// Move the pointer to the previous column (hover)
    PointerPrev,
    /// Click the heading under the pointer
    ClickPointed,
    /// Move the pointer off the table
    LeaveTable,
    /// Focus the next table on the page
    NextTable,
    ScrollUp,
    ScrollDown,

    // ─────────────────────────────────────────────────────────────────────────
    // Search
    // ─────────────────────────────────────────────────────────────────────────
    /// Start editing the pointed column's search input
    BeginSearch,
    SearchInput(char),
    SearchBackspace,
    /// Commit the edited value as an input change
    CommitSearch,
    CancelSearch,

    // ─────────────────────────────────────────────────────────────────────────
    // Modals
    // ─────────────────────────────────────────────────────────────────────────
    /// Click the first modal trigger on the page
    OpenFirstTrigger,
    /// Click outside every modal window
    DismissModal,

    // ─────────────────────────────────────────────────────────────────────────
    // Mouse
    // ─────────────────────────────────────────────────────────────────────────
    MouseClick(u16, u16),
    MouseMove(u16, u16),

    /// Deliver an event straight to the page
    Dispatch(PageEvent),
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Tick => write!(f, "Tick"),
            Action::Resize(w, h) => write!(f, "Resize({}, {})", w, h),
            Action::Quit => write!(f, "Quit"),
            Action::ToggleHelp => write!(f, "ToggleHelp"),
            Action::PointerNext => write!(f, "PointerNext"),
            Action::PointerPrev => write!(f, "PointerPrev"),
            Action::ClickPointed => write!(f, "ClickPointed"),
            Action::LeaveTable => write!(f, "LeaveTable"),
            Action::NextTable => write!(f, "NextTable"),
            Action::ScrollUp => write!(f, "ScrollUp"),
            Action::ScrollDown => write!(f, "ScrollDown"),
            Action::BeginSearch => write!(f, "BeginSearch"),
            Action::SearchInput(c) => write!(f, "SearchInput('{}')", c),
            Action::SearchBackspace => write!(f, "SearchBackspace"),
            Action::CommitSearch => write!(f, "CommitSearch"),
            Action::CancelSearch => write!(f, "CancelSearch"),
            Action::OpenFirstTrigger => write!(f, "OpenFirstTrigger"),
            Action::DismissModal => write!(f, "DismissModal"),
            Action::MouseClick(x, y) => write!(f, "MouseClick({}, {})", x, y),
            Action::MouseMove(x, y) => write!(f, "MouseMove({}, {})", x, y),
            Action::Dispatch(event) => write!(f, "Dispatch({:?})", event),
        }
    }
}
