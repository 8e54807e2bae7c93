// ── Issue detail / edit view-model ──
//
// Holds its own copy of one issue. Edits go into an `EditForm` and only the
// fields that differ from the snapshot are sent on save.

use tracing::{debug, info, warn};

use tracker_api::{Issue, IssuePriority, IssueStatus, IssueUpdate};

use crate::error::CoreError;
use crate::service::{IssueService, parse_issue_id};

/// Where the detail view gets its issue from.
#[derive(Debug, Clone)]
pub enum DetailSource {
    /// Snapshot handed over by the list. No fetch needed.
    Issue(Issue),
    /// Known numeric id.
    Id(u64),
    /// Raw routing parameter, validated on load.
    Route(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailState {
    Loading,
    Loaded,
    /// The issue could not be loaded; carries a user-visible message.
    NotFound(String),
}

/// Outcome reported back to the hosting list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailEvent {
    Updated(Issue),
    /// Save with nothing changed. No request was made.
    Unchanged,
    Closed,
}

/// Editable copy of an issue's user-settable fields.
///
/// Optional strings are edited as plain text; an empty string means unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditForm {
    pub title: String,
    pub description: String,
    pub status: IssueStatus,
    pub priority: IssuePriority,
    pub assignee: String,
}

impl Default for EditForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            status: IssueStatus::Open,
            priority: IssuePriority::Medium,
            assignee: String::new(),
        }
    }
}

impl EditForm {
    pub fn from_issue(issue: &Issue) -> Self {
        Self {
            title: issue.title.clone(),
            description: issue.description.clone().unwrap_or_default(),
            status: issue.status,
            priority: issue.priority,
            assignee: issue.assignee.clone().unwrap_or_default(),
        }
    }

    /// Patch carrying only the fields that differ from `issue`.
    ///
    /// Clearing a description or assignee sends an empty string.
    pub fn patch_against(&self, issue: &Issue) -> IssueUpdate {
        let changed_text = |form: &str, current: Option<&str>| {
            let current = current.unwrap_or_default();
            (form.trim() != current.trim()).then(|| form.trim().to_owned())
        };

        IssueUpdate {
            title: (self.title != issue.title).then(|| self.title.clone()),
            description: changed_text(&self.description, issue.description.as_deref()),
            status: (self.status != issue.status).then_some(self.status),
            priority: (self.priority != issue.priority).then_some(self.priority),
            assignee: changed_text(&self.assignee, issue.assignee.as_deref()),
        }
    }
}

/// State behind one issue's detail panel.
#[derive(Debug)]
pub struct IssueDetailViewModel {
    service: IssueService,
    source: DetailSource,
    state: DetailState,
    issue: Option<Issue>,
    form: Option<EditForm>,
    last_error: Option<String>,
}

impl IssueDetailViewModel {
    pub fn new(service: IssueService, source: DetailSource) -> Self {
        let (state, issue) = match &source {
            DetailSource::Issue(issue) => (DetailState::Loaded, Some(issue.clone())),
            DetailSource::Id(_) | DetailSource::Route(_) => (DetailState::Loading, None),
        };
        Self {
            service,
            source,
            state,
            issue,
            form: None,
            last_error: None,
        }
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    pub fn issue(&self) -> Option<&Issue> {
        self.issue.as_ref()
    }

    /// `true` until the first successful or failed load for id/route sources.
    pub fn needs_load(&self) -> bool {
        self.issue.is_none() && self.state == DetailState::Loading
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    fn target_id(&self) -> Result<u64, CoreError> {
        if let Some(issue) = &self.issue {
            return Ok(issue.id);
        }
        match &self.source {
            DetailSource::Issue(issue) => Ok(issue.id),
            DetailSource::Id(id) => Ok(*id),
            DetailSource::Route(raw) => parse_issue_id(raw),
        }
    }

    /// Fetch the issue. An invalid route parameter fails without a request.
    pub async fn load(&mut self) -> Result<(), CoreError> {
        let id = match self.target_id() {
            Ok(id) => id,
            Err(e) => {
                warn!(error = %e, "rejecting issue route");
                self.state = DetailState::NotFound(e.to_string());
                self.last_error = Some(e.to_string());
                return Err(e);
            }
        };

        self.state = DetailState::Loading;
        match self.service.get_issue(id).await {
            Ok(issue) => {
                debug!(id, "issue loaded");
                self.issue = Some(issue);
                self.state = DetailState::Loaded;
                self.last_error = None;
                Ok(())
            }
            Err(e) => {
                warn!(id, error = %e, "error loading issue");
                self.state = DetailState::NotFound(e.to_string());
                self.last_error = Some(format!("Error loading issue: {e}"));
                Err(e)
            }
        }
    }

    /// Refetch the current issue from the server.
    pub async fn reload_issue(&mut self) -> Result<(), CoreError> {
        self.load().await
    }

    // ── Editing ──────────────────────────────────────────────────────

    /// Enter edit mode with a form filled from the snapshot. Returns `false`
    /// when no issue is loaded.
    pub fn start_edit(&mut self) -> bool {
        match &self.issue {
            Some(issue) => {
                self.form = Some(EditForm::from_issue(issue));
                true
            }
            None => false,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.form.is_some()
    }

    pub fn edit_form(&self) -> Option<&EditForm> {
        self.form.as_ref()
    }

    pub fn edit_form_mut(&mut self) -> Option<&mut EditForm> {
        self.form.as_mut()
    }

    /// Send the changed fields. On failure the form and edit mode are kept.
    pub async fn save_edit(&mut self) -> Result<DetailEvent, CoreError> {
        let (Some(issue), Some(form)) = (&self.issue, &self.form) else {
            return Err(CoreError::validation("no edit in progress"));
        };
        let id = issue.id;
        let patch = form.patch_against(issue);

        if patch.is_empty() {
            debug!(id, "edit saved with no changes");
            self.form = None;
            return Ok(DetailEvent::Unchanged);
        }

        match self.service.update_issue(id, &patch).await {
            Ok(updated) => {
                info!(id, "issue updated");
                self.issue = Some(updated.clone());
                self.form = None;
                self.last_error = None;
                Ok(DetailEvent::Updated(updated))
            }
            Err(e) => {
                warn!(id, error = %e, "error updating issue");
                self.last_error = Some(format!("Error updating issue: {e}"));
                Err(e)
            }
        }
    }

    pub fn cancel_edit(&mut self) {
        self.form = None;
    }

    pub fn close(&mut self) -> DetailEvent {
        self.form = None;
        DetailEvent::Closed
    }

    /// Pretty-printed JSON of the snapshot, for copying.
    pub fn issue_json(&self) -> Option<String> {
        self.issue
            .as_ref()
            .and_then(|issue| serde_json::to_string_pretty(issue).ok())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::TrackerConfig;
    use pretty_assertions::assert_eq;

    fn sample() -> Issue {
        Issue {
            id: 7,
            title: "Login fails".into(),
            description: Some("500 on submit".into()),
            status: IssueStatus::Open,
            priority: IssuePriority::High,
            assignee: Some("alice".into()),
            created_at: "2024-01-01T00:00:00".into(),
            updated_at: "2024-01-02T00:00:00".into(),
        }
    }

    fn detail(source: DetailSource) -> IssueDetailViewModel {
        IssueDetailViewModel::new(IssueService::new(TrackerConfig::default()).unwrap(), source)
    }

    #[test]
    fn unchanged_form_gives_empty_patch() {
        let issue = sample();
        assert!(EditForm::from_issue(&issue).patch_against(&issue).is_empty());
    }

    #[test]
    fn patch_holds_only_changed_fields() {
        let issue = sample();
        let mut form = EditForm::from_issue(&issue);
        form.status = IssueStatus::Closed;
        assert_eq!(
            form.patch_against(&issue),
            IssueUpdate {
                status: Some(IssueStatus::Closed),
                ..IssueUpdate::default()
            }
        );
    }

    #[test]
    fn clearing_optional_text_sends_empty_string() {
        let issue = sample();
        let mut form = EditForm::from_issue(&issue);
        form.assignee.clear();
        let patch = form.patch_against(&issue);
        assert_eq!(patch.assignee.as_deref(), Some(""));
        assert_eq!(patch.description, None);
    }

    #[test]
    fn whitespace_only_change_is_ignored_for_optional_text() {
        let mut issue = sample();
        issue.description = None;
        let mut form = EditForm::from_issue(&issue);
        form.description = "   ".into();
        assert!(form.patch_against(&issue).is_empty());
    }

    #[test]
    fn default_form_is_open_medium() {
        let form = EditForm::default();
        assert_eq!(form.status, IssueStatus::Open);
        assert_eq!(form.priority, IssuePriority::Medium);
    }

    #[test]
    fn snapshot_source_starts_loaded() {
        let vm = detail(DetailSource::Issue(sample()));
        assert_eq!(vm.state(), &DetailState::Loaded);
        assert!(!vm.needs_load());
        assert_eq!(vm.issue().unwrap().id, 7);
    }

    #[test]
    fn id_source_needs_load() {
        let vm = detail(DetailSource::Id(3));
        assert_eq!(vm.state(), &DetailState::Loading);
        assert!(vm.needs_load());
        assert!(vm.issue().is_none());
    }

    #[test]
    fn edit_then_cancel_discards_form() {
        let mut vm = detail(DetailSource::Issue(sample()));
        assert!(vm.start_edit());
        vm.edit_form_mut().unwrap().title = "changed".into();
        vm.cancel_edit();
        assert!(!vm.is_editing());
        assert_eq!(vm.issue().unwrap().title, "Login fails");
    }

    #[test]
    fn start_edit_without_issue_is_refused() {
        let mut vm = detail(DetailSource::Id(3));
        assert!(!vm.start_edit());
        assert!(vm.edit_form().is_none());
    }

    #[test]
    fn close_leaves_edit_mode() {
        let mut vm = detail(DetailSource::Issue(sample()));
        vm.start_edit();
        assert_eq!(vm.close(), DetailEvent::Closed);
        assert!(!vm.is_editing());
    }

    #[test]
    fn issue_json_is_pretty() {
        let vm = detail(DetailSource::Issue(sample()));
        let json = vm.issue_json().unwrap();
        assert!(json.contains("\n  \"id\": 7"));
        assert!(json.contains("\"status\": \"open\""));
    }
}
