//! Headless view-models for issue screens.
//!
//! Each view-model owns its state and talks to the server through an
//! [`IssueService`](crate::IssueService) handle. Child view-models (detail,
//! create) report back to the list through explicit event values instead
//! of callbacks.

pub mod create;
pub mod detail;
pub mod list;
pub mod query;

pub use create::{CreateEvent, IssueCreateViewModel};
pub use detail::{DetailEvent, DetailSource, DetailState, EditForm, IssueDetailViewModel};
pub use list::{IssueListViewModel, LoadTicket};
pub use query::{IssueQuery, SortIndicator};

/// Fetch state of the issue list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded,
    /// User-visible failure message. The previous page stays cached.
    Error(String),
}

impl LoadState {
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error(msg) => Some(msg),
            _ => None,
        }
    }
}
