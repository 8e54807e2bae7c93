//! Async Rust client for the issue tracker REST API.
//!
//! - [`IssueClient`]: one method per endpoint (`/issues`, `/issues/{id}`,
//!   `/health`), each a single request with no retry.
//! - [`models`]: wire types: [`Issue`], [`IssueCreate`], the partial
//!   [`IssueUpdate`] patch, and the closed [`IssueStatus`] / [`IssuePriority`]
//!   enumerations.
//! - [`ListIssuesParams`]: list filters, sorting and paging, mapped onto the
//!   query string with empty values left out.

pub mod client;
pub mod error;
pub mod models;
pub mod query;
pub mod transport;

pub use client::IssueClient;
pub use error::Error;
pub use models::{
    DeleteAck, HealthStatus, Issue, IssueCreate, IssuePage, IssuePriority, IssueStatus,
    IssueUpdate,
};
pub use query::{ListIssuesParams, SortField, SortOrder};
pub use transport::{TlsMode, TransportConfig};
