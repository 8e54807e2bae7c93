// ── List query state ──
//
// Filter / sort / page state owned by the list view-model. Every filter
// setter resets the page to 0; sort and page changes leave the filters
// alone.

use tracker_api::{IssuePriority, IssueStatus, ListIssuesParams, SortField, SortOrder};

/// How a column header should show its sort state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortIndicator {
    Unsorted,
    Ascending,
    Descending,
}

/// Current list query: paging, free-text search, filters and sort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueQuery {
    /// Zero-based page index.
    pub page: u32,
    pub page_size: u32,
    pub search: String,
    pub status: Option<IssueStatus>,
    pub priority: Option<IssuePriority>,
    pub assignee: String,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
}

impl IssueQuery {
    /// First page, no filters, newest updates first.
    pub fn new(page_size: u32) -> Self {
        Self {
            page: 0,
            page_size: page_size.max(1),
            search: String::new(),
            status: None,
            priority: None,
            assignee: String::new(),
            sort_by: SortField::default(),
            sort_order: SortOrder::default(),
        }
    }

    /// Wire parameters for this query. Empty strings stay off the wire.
    pub fn to_params(&self) -> ListIssuesParams {
        ListIssuesParams {
            page: Some(self.page),
            page_size: Some(self.page_size),
            search: Some(self.search.clone()).filter(|s| !s.is_empty()),
            status: self.status,
            priority: self.priority,
            assignee: Some(self.assignee.clone()).filter(|s| !s.is_empty()),
            sort_by: Some(self.sort_by),
            sort_order: Some(self.sort_order),
        }
    }

    // ── Filters (reset paging) ───────────────────────────────────────

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
        self.page = 0;
    }

    pub fn set_status(&mut self, status: Option<IssueStatus>) {
        self.status = status;
        self.page = 0;
    }

    pub fn set_priority(&mut self, priority: Option<IssuePriority>) {
        self.priority = priority;
        self.page = 0;
    }

    pub fn set_assignee(&mut self, assignee: impl Into<String>) {
        self.assignee = assignee.into();
        self.page = 0;
    }

    pub fn clear_filters(&mut self) {
        self.search.clear();
        self.status = None;
        self.priority = None;
        self.assignee.clear();
        self.page = 0;
    }

    pub fn has_active_filters(&self) -> bool {
        !self.search.is_empty()
            || self.status.is_some()
            || self.priority.is_some()
            || !self.assignee.is_empty()
    }

    // ── Sort & paging (keep filters) ─────────────────────────────────

    /// Same column flips direction; a new column starts ascending.
    pub fn toggle_sort(&mut self, field: SortField) {
        if self.sort_by == field {
            self.sort_order = self.sort_order.flipped();
        } else {
            self.sort_by = field;
            self.sort_order = SortOrder::Asc;
        }
    }

    pub fn sort_indicator(&self, field: SortField) -> SortIndicator {
        if self.sort_by != field {
            return SortIndicator::Unsorted;
        }
        match self.sort_order {
            SortOrder::Asc => SortIndicator::Ascending,
            SortOrder::Desc => SortIndicator::Descending,
        }
    }

    pub fn set_page(&mut self, page: u32) {
        self.page = page;
    }
}

impl Default for IssueQuery {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_PAGE_SIZE)
    }
}
