// ── Issue list view-model ──
//
// Owns the list query and the last fetched page. Each fetch is tagged
// with a sequence number; a completion that lands after a newer fetch
// was issued is dropped instead of overwriting fresher data.

use std::collections::BTreeSet;

use tracing::{debug, warn};

use tracker_api::{Issue, IssuePage, IssuePriority, IssueStatus, ListIssuesParams, SortField};

use super::create::CreateEvent;
use super::detail::{DetailEvent, DetailSource, IssueDetailViewModel};
use super::query::{IssueQuery, SortIndicator};
use super::LoadState;
use crate::error::CoreError;
use crate::pagination;
use crate::service::IssueService;

/// Handle for one in-flight list fetch.
#[derive(Debug, Clone)]
pub struct LoadTicket {
    seq: u64,
    params: ListIssuesParams,
}

impl LoadTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn params(&self) -> &ListIssuesParams {
        &self.params
    }
}

/// State behind an issue list screen.
#[derive(Debug)]
pub struct IssueListViewModel {
    service: IssueService,
    query: IssueQuery,
    state: LoadState,
    issues: Vec<Issue>,
    total_items: u64,
    unique_assignees: Vec<String>,
    selected: Option<Issue>,
    show_detail: bool,
    show_create_form: bool,
    /// Sequence number of the newest fetch handed out.
    latest_seq: u64,
}

impl IssueListViewModel {
    /// Idle view-model using the service's configured page size.
    pub fn new(service: IssueService) -> Self {
        let page_size = service.config().page_size;
        Self::with_query(service, IssueQuery::new(page_size))
    }

    pub fn with_query(service: IssueService, query: IssueQuery) -> Self {
        Self {
            service,
            query,
            state: LoadState::Idle,
            issues: Vec::new(),
            total_items: 0,
            unique_assignees: Vec::new(),
            selected: None,
            show_detail: false,
            show_create_form: false,
            latest_seq: 0,
        }
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn service(&self) -> &IssueService {
        &self.service
    }

    pub fn query(&self) -> &IssueQuery {
        &self.query
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// Issues on the current page, in server order.
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn total_items(&self) -> u64 {
        self.total_items
    }

    pub fn total_pages(&self) -> u32 {
        pagination::total_pages(self.total_items, self.query.page_size)
    }

    pub fn visible_pages(&self) -> Vec<u32> {
        pagination::visible_pages(self.query.page, self.total_pages())
    }

    /// Sorted, distinct assignees seen on the current page only.
    pub fn unique_assignees(&self) -> &[String] {
        &self.unique_assignees
    }

    pub fn selected_issue(&self) -> Option<&Issue> {
        self.selected.as_ref()
    }

    /// Mutable access to the detail snapshot. Edits here never reach the
    /// cached page.
    pub fn selected_issue_mut(&mut self) -> Option<&mut Issue> {
        self.selected.as_mut()
    }

    pub fn show_detail(&self) -> bool {
        self.show_detail
    }

    pub fn show_create_form(&self) -> bool {
        self.show_create_form
    }

    pub fn has_active_filters(&self) -> bool {
        self.query.has_active_filters()
    }

    pub fn sort_indicator(&self, field: SortField) -> SortIndicator {
        self.query.sort_indicator(field)
    }

    // ── Loading ──────────────────────────────────────────────────────

    /// Start a fetch with the current query. The returned ticket must be
    /// passed back to [`apply_load`](Self::apply_load) with the result.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.latest_seq += 1;
        self.state = LoadState::Loading;
        LoadTicket {
            seq: self.latest_seq,
            params: self.query.to_params(),
        }
    }

    /// Apply a finished fetch. Returns `Ok(false)` when the ticket was
    /// superseded by a newer fetch and the result was dropped.
    ///
    /// On failure the previous page stays cached.
    pub fn apply_load(
        &mut self,
        ticket: &LoadTicket,
        result: Result<IssuePage, CoreError>,
    ) -> Result<bool, CoreError> {
        if ticket.seq < self.latest_seq {
            debug!(
                seq = ticket.seq,
                latest = self.latest_seq,
                "dropping superseded issue list result"
            );
            return Ok(false);
        }

        match result {
            Ok(page) => {
                // Without a server-reported total only the page length is known.
                self.total_items = page
                    .total
                    .unwrap_or_else(|| u64::try_from(page.issues.len()).unwrap_or(u64::MAX));
                self.unique_assignees = collect_assignees(&page.issues);
                self.issues = page.issues;
                self.state = LoadState::Loaded;
                Ok(true)
            }
            Err(e) => {
                warn!(error = %e, "error loading issues");
                self.state = LoadState::Error(format!("Error loading issues: {e}"));
                Err(e)
            }
        }
    }

    /// Fetch the current page and apply it.
    pub async fn load_issues(&mut self) -> Result<(), CoreError> {
        let ticket = self.begin_load();
        let result = self.service.list_issues(ticket.params()).await;
        self.apply_load(&ticket, result).map(|_| ())
    }

    // ── Query mutations ──────────────────────────────────────────────

    pub async fn set_search(&mut self, term: impl Into<String>) -> Result<(), CoreError> {
        self.query.set_search(term);
        self.load_issues().await
    }

    pub async fn set_status_filter(
        &mut self,
        status: Option<IssueStatus>,
    ) -> Result<(), CoreError> {
        self.query.set_status(status);
        self.load_issues().await
    }

    pub async fn set_priority_filter(
        &mut self,
        priority: Option<IssuePriority>,
    ) -> Result<(), CoreError> {
        self.query.set_priority(priority);
        self.load_issues().await
    }

    pub async fn set_assignee_filter(
        &mut self,
        assignee: impl Into<String>,
    ) -> Result<(), CoreError> {
        self.query.set_assignee(assignee);
        self.load_issues().await
    }

    pub async fn clear_filters(&mut self) -> Result<(), CoreError> {
        self.query.clear_filters();
        self.load_issues().await
    }

    /// Same column flips direction, a new column sorts ascending.
    pub async fn on_sort(&mut self, field: SortField) -> Result<(), CoreError> {
        self.query.toggle_sort(field);
        self.load_issues().await
    }

    pub async fn on_page_change(&mut self, page: u32) -> Result<(), CoreError> {
        self.query.set_page(page);
        self.load_issues().await
    }

    // ── Selection & panels ───────────────────────────────────────────

    /// Open the detail panel on a copy of `issue`.
    pub fn select_issue(&mut self, issue: &Issue) {
        self.selected = Some(issue.clone());
        self.show_detail = true;
    }

    /// Open the detail panel on the `index`-th issue of the current page.
    pub fn select_index(&mut self, index: usize) -> bool {
        match self.issues.get(index).cloned() {
            Some(issue) => {
                self.selected = Some(issue);
                self.show_detail = true;
                true
            }
            None => false,
        }
    }

    /// A detail view-model seeded with the selected snapshot.
    pub fn detail_view_model(&self) -> Option<IssueDetailViewModel> {
        self.selected.as_ref().map(|issue| {
            IssueDetailViewModel::new(self.service.clone(), DetailSource::Issue(issue.clone()))
        })
    }

    pub fn close_detail(&mut self) {
        self.show_detail = false;
        self.selected = None;
    }

    pub fn open_create_form(&mut self) {
        self.show_create_form = true;
    }

    pub fn close_create_form(&mut self) {
        self.show_create_form = false;
    }

    // ── Child view-model events ──────────────────────────────────────

    /// Reload after an edit. The detail panel stays open.
    pub async fn on_issue_updated(&mut self) -> Result<(), CoreError> {
        self.load_issues().await
    }

    pub async fn on_issue_created(&mut self) -> Result<(), CoreError> {
        self.show_create_form = false;
        self.load_issues().await
    }

    /// Route an event from a detail view-model.
    pub async fn on_detail_event(&mut self, event: DetailEvent) -> Result<(), CoreError> {
        match event {
            DetailEvent::Updated(issue) => {
                if let Some(selected) = self.selected.as_mut().filter(|s| s.id == issue.id) {
                    *selected = issue;
                }
                self.on_issue_updated().await
            }
            DetailEvent::Unchanged => Ok(()),
            DetailEvent::Closed => {
                self.close_detail();
                Ok(())
            }
        }
    }

    /// Route an event from a create view-model.
    pub async fn on_create_event(&mut self, event: CreateEvent) -> Result<(), CoreError> {
        match event {
            CreateEvent::Created(_) => self.on_issue_created().await,
            CreateEvent::Cancelled => {
                self.close_create_form();
                Ok(())
            }
        }
    }

    /// Delete an issue, close its detail panel if open, and reload.
    pub async fn delete_issue(&mut self, id: u64) -> Result<(), CoreError> {
        if let Err(e) = self.service.delete_issue(id).await {
            warn!(id, error = %e, "error deleting issue");
            return Err(e);
        }
        if self.selected.as_ref().is_some_and(|s| s.id == id) {
            self.close_detail();
        }
        self.load_issues().await
    }
}

fn collect_assignees(issues: &[Issue]) -> Vec<String> {
    issues
        .iter()
        .filter_map(|i| i.assignee.as_deref())
        .filter(|a| !a.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(ToOwned::to_owned)
        .collect()
}
