// tracker-core: service facade and headless view-models between tracker-api
// and hosts (CLI, interactive shells).

pub mod config;
pub mod error;
pub mod pagination;
pub mod service;
pub mod view;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{DEFAULT_API_URL, DEFAULT_PAGE_SIZE, TlsVerification, TrackerConfig};
pub use error::CoreError;
pub use service::{IssueService, parse_issue_id};
pub use view::{
    CreateEvent, DetailEvent, DetailSource, DetailState, EditForm, IssueCreateViewModel,
    IssueDetailViewModel, IssueListViewModel, IssueQuery, LoadState, LoadTicket, SortIndicator,
};

// Wire types consumers need alongside the view-models.
pub use tracker_api::{
    DeleteAck, HealthStatus, Issue, IssueCreate, IssuePage, IssuePriority, IssueStatus,
    IssueUpdate, ListIssuesParams, SortField, SortOrder,
};
