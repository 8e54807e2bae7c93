// ── Issue create view-model ──

use tracing::{info, warn};

use tracker_api::{Issue, IssueCreate};

use crate::error::CoreError;
use crate::service::IssueService;

/// Outcome reported back to the hosting list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateEvent {
    Created(Issue),
    Cancelled,
}

/// Draft state behind the "new issue" form.
#[derive(Debug)]
pub struct IssueCreateViewModel {
    service: IssueService,
    draft: IssueCreate,
    last_error: Option<String>,
}

impl IssueCreateViewModel {
    /// Empty draft with `open` status and `medium` priority.
    pub fn new(service: IssueService) -> Self {
        Self::with_draft(service, IssueCreate::default())
    }

    pub fn with_draft(service: IssueService, draft: IssueCreate) -> Self {
        Self {
            service,
            draft,
            last_error: None,
        }
    }

    pub fn draft(&self) -> &IssueCreate {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut IssueCreate {
        &mut self.draft
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Create the issue. A blank title is rejected without a request; on any
    /// failure the draft is kept for another attempt.
    pub async fn submit(&mut self) -> Result<CreateEvent, CoreError> {
        match self.service.create_issue(&self.draft).await {
            Ok(issue) => {
                info!(id = issue.id, "issue created");
                self.draft = IssueCreate::default();
                self.last_error = None;
                Ok(CreateEvent::Created(issue))
            }
            Err(e) => {
                warn!(error = %e, "error creating issue");
                self.last_error = Some(format!("Error creating issue: {e}"));
                Err(e)
            }
        }
    }

    /// Discard the draft.
    pub fn cancel(&mut self) -> CreateEvent {
        self.draft = IssueCreate::default();
        self.last_error = None;
        CreateEvent::Cancelled
    }
}
