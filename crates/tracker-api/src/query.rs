// List query parameters and their mapping onto the `/issues` query string.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::models::{IssuePriority, IssueStatus};

/// Column the server sorts by.
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
pub enum SortField {
    Id,
    Title,
    Status,
    Priority,
    Assignee,
    CreatedAt,
    #[default]
    UpdatedAt,
}

/// Sort direction.
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
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// Parameters for `GET /issues`.
///
/// Every field is optional; unset or empty values are left off the wire so
/// the server applies its own defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListIssuesParams {
    /// Zero-based page index.
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub search: Option<String>,
    pub status: Option<IssueStatus>,
    pub priority: Option<IssuePriority>,
    pub assignee: Option<String>,
    pub sort_by: Option<SortField>,
    pub sort_order: Option<SortOrder>,
}

impl ListIssuesParams {
    /// Offset of the first row on the requested page, when paging is set.
    pub fn offset(&self) -> Option<u64> {
        match (self.page, self.page_size) {
            (Some(page), Some(size)) => Some(u64::from(page) * u64::from(size)),
            _ => None,
        }
    }

    /// Query-string pairs in a stable order.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();

        if let (Some(skip), Some(size)) = (self.offset(), self.page_size) {
            pairs.push(("skip", skip.to_string()));
            pairs.push(("limit", size.to_string()));
        }
        if let Some(search) = non_empty(self.search.as_deref()) {
            pairs.push(("search", search.to_owned()));
        }
        if let Some(status) = self.status {
            pairs.push(("status", status.to_string()));
        }
        if let Some(priority) = self.priority {
            pairs.push(("priority", priority.to_string()));
        }
        if let Some(assignee) = non_empty(self.assignee.as_deref()) {
            pairs.push(("assignee", assignee.to_owned()));
        }
        if let Some(sort_by) = self.sort_by {
            pairs.push(("sort_by", sort_by.to_string()));
        }
        if let Some(order) = self.sort_order {
            pairs.push(("sort_order", order.to_string()));
        }

        pairs
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn keys(params: &ListIssuesParams) -> Vec<&'static str> {
        params.to_query().into_iter().map(|(k, _)| k).collect()
    }

    #[test]
    fn offset_is_page_times_page_size() {
        for (page, size) in [(0, 10), (1, 10), (3, 25), (7, 1), (12, 100)] {
            let params = ListIssuesParams {
                page: Some(page),
                page_size: Some(size),
                ..ListIssuesParams::default()
            };
            let q = params.to_query();
            assert_eq!(q[0], ("skip", (page * size).to_string()));
            assert_eq!(q[1], ("limit", size.to_string()));
        }
    }

    #[test]
    fn paging_needs_both_page_and_size() {
        let params = ListIssuesParams {
            page: Some(2),
            ..ListIssuesParams::default()
        };
        assert!(params.to_query().is_empty());
    }

    #[test]
    fn empty_strings_are_omitted() {
        let params = ListIssuesParams {
            search: Some(String::new()),
            assignee: Some(String::new()),
            ..ListIssuesParams::default()
        };
        assert!(params.to_query().is_empty());
    }

    #[test]
    fn all_fields_map_to_wire_names() {
        let params = ListIssuesParams {
            page: Some(1),
            page_size: Some(20),
            search: Some("crash".into()),
            status: Some(IssueStatus::InProgress),
            priority: Some(IssuePriority::Urgent),
            assignee: Some("alice".into()),
            sort_by: Some(SortField::CreatedAt),
            sort_order: Some(SortOrder::Asc),
        };
        assert_eq!(
            params.to_query(),
            vec![
                ("skip", "20".to_owned()),
                ("limit", "20".to_owned()),
                ("search", "crash".to_owned()),
                ("status", "in_progress".to_owned()),
                ("priority", "urgent".to_owned()),
                ("assignee", "alice".to_owned()),
                ("sort_by", "created_at".to_owned()),
                ("sort_order", "asc".to_owned()),
            ]
        );
    }

    #[test]
    fn sort_only() {
        let params = ListIssuesParams {
            sort_by: Some(SortField::Title),
            ..ListIssuesParams::default()
        };
        assert_eq!(keys(&params), vec!["sort_by"]);
    }

    #[test]
    fn flipping_sort_order() {
        assert_eq!(SortOrder::Asc.flipped(), SortOrder::Desc);
        assert_eq!(SortOrder::Desc.flipped(), SortOrder::Asc);
    }
}
