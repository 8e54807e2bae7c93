// Wire types for the issue tracker REST API.
//
// Field names and enum values match the server's JSON exactly; there is
// no camelCase translation layer.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

// ── Enumerations ────────────────────────────────────────────────────

/// Workflow status of an issue.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum IssueStatus {
    #[default]
    Open,
    InProgress,
    Closed,
}

/// Urgency of an issue.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum IssuePriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

// ── Issue ───────────────────────────────────────────────────────────

/// A tracked work item as returned by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: IssueStatus,
    pub priority: IssuePriority,
    #[serde(default)]
    pub assignee: Option<String>,
    /// Server-set timestamp, kept opaque.
    pub created_at: String,
    /// Server-set timestamp, kept opaque.
    pub updated_at: String,
}

// ── Create / update payloads ────────────────────────────────────────

/// Payload for `POST /issues`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueCreate {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub status: IssueStatus,
    #[serde(default)]
    pub priority: IssuePriority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
}

impl Default for IssueCreate {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: None,
            status: IssueStatus::Open,
            priority: IssuePriority::Medium,
            assignee: None,
        }
    }
}

impl IssueCreate {
    /// A draft with the given title and every other field at its default.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Copy of this draft with blank optional strings dropped, so they are
    /// omitted from the request body instead of sent as `""`.
    pub fn normalized(&self) -> Self {
        Self {
            title: self.title.clone(),
            description: non_blank(self.description.as_deref()),
            status: self.status,
            priority: self.priority,
            assignee: non_blank(self.assignee.as_deref()),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(ToOwned::to_owned)
}

/// Partial update for `PUT /issues/{id}`.
///
/// Only fields that are `Some` are serialized; absent fields leave the
/// server's value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<IssueStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<IssuePriority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
}

impl IssueUpdate {
    /// `true` when no field is set.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.assignee.is_none()
    }
}

// ── List responses ──────────────────────────────────────────────────

/// One page of issues from `GET /issues`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IssuePage {
    pub issues: Vec<Issue>,
    /// Grand total reported by the server, when it reports one.
    pub total: Option<u64>,
}

/// The list endpoint answers either a bare array or a paginated envelope.
#[derive(Deserialize)]
#[serde(untagged)]
enum IssueListBody {
    Plain(Vec<Issue>),
    Paginated { issues: Vec<Issue>, total: u64 },
}

impl<'de> Deserialize<'de> for IssuePage {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Ok(match IssueListBody::deserialize(deserializer)? {
            IssueListBody::Plain(issues) => Self {
                issues,
                total: None,
            },
            IssueListBody::Paginated { issues, total } => Self {
                issues,
                total: Some(total),
            },
        })
    }
}

// ── Misc ────────────────────────────────────────────────────────────

/// `GET /health` payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl HealthStatus {
    pub fn is_ok(&self) -> bool {
        self.status.eq_ignore_ascii_case("ok")
    }
}

/// `DELETE /issues/{id}` acknowledgement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteAck {
    #[serde(default)]
    pub message: Option<String>,
}
