// ── Issue service ──
//
// Thin facade over `IssueClient`: builds the HTTP client from a
// `TrackerConfig`, validates input locally, and translates transport
// errors into `CoreError`. View-models hold a clone of this handle.

use std::sync::Arc;

use tracing::debug;

use tracker_api::transport::{TlsMode, TransportConfig};
use tracker_api::{
    DeleteAck, HealthStatus, Issue, IssueClient, IssueCreate, IssuePage, IssueUpdate,
    ListIssuesParams,
};

use crate::config::{TlsVerification, TrackerConfig};
use crate::error::CoreError;

/// Parse a raw identifier (e.g. a routing parameter) into an issue id.
///
/// Rejected locally, before any request is made.
pub fn parse_issue_id(raw: &str) -> Result<u64, CoreError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| CoreError::validation(format!("invalid issue ID: {raw:?}")))
}

/// Cheaply cloneable handle to the issue tracker API.
#[derive(Debug, Clone)]
pub struct IssueService {
    inner: Arc<ServiceInner>,
}

#[derive(Debug)]
struct ServiceInner {
    config: TrackerConfig,
    client: IssueClient,
}

impl IssueService {
    /// Build the HTTP client described by `config`. Does not contact the server.
    pub fn new(config: TrackerConfig) -> Result<Self, CoreError> {
        if config.page_size == 0 {
            return Err(CoreError::Config {
                message: "page size must be at least 1".into(),
            });
        }
        let transport = build_transport(&config);
        let client = IssueClient::new(config.api_url.as_str(), &transport)?;
        Ok(Self {
            inner: Arc::new(ServiceInner { config, client }),
        })
    }

    /// Access the service configuration.
    pub fn config(&self) -> &TrackerConfig {
        &self.inner.config
    }

    fn client(&self) -> &IssueClient {
        &self.inner.client
    }

    // ── Operations ───────────────────────────────────────────────────

    pub async fn health(&self) -> Result<HealthStatus, CoreError> {
        Ok(self.client().health().await?)
    }

    pub async fn list_issues(&self, params: &ListIssuesParams) -> Result<IssuePage, CoreError> {
        let page = self.client().list_issues(params).await?;
        debug!(count = page.issues.len(), total = ?page.total, "issues fetched");
        Ok(page)
    }

    pub async fn get_issue(&self, id: u64) -> Result<Issue, CoreError> {
        self.client()
            .get_issue(id)
            .await
            .map_err(|e| map_for_issue(e, id))
    }

    /// Create an issue from a draft. Blank titles are rejected locally and
    /// blank optional fields are omitted from the request.
    pub async fn create_issue(&self, draft: &IssueCreate) -> Result<Issue, CoreError> {
        if draft.title.trim().is_empty() {
            return Err(CoreError::validation("title must not be empty"));
        }
        let created = self.client().create_issue(&draft.normalized()).await?;
        debug!(id = created.id, "issue created");
        Ok(created)
    }

    pub async fn update_issue(&self, id: u64, patch: &IssueUpdate) -> Result<Issue, CoreError> {
        if patch.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(CoreError::validation("title must not be empty"));
        }
        self.client()
            .update_issue(id, patch)
            .await
            .map_err(|e| map_for_issue(e, id))
    }

    pub async fn delete_issue(&self, id: u64) -> Result<DeleteAck, CoreError> {
        self.client()
            .delete_issue(id)
            .await
            .map_err(|e| map_for_issue(e, id))
    }
}

/// Like `From`, but names the issue in "not found" errors.
fn map_for_issue(err: tracker_api::Error, id: u64) -> CoreError {
    if err.is_not_found() {
        CoreError::issue_not_found(id)
    } else {
        err.into()
    }
}

fn build_transport(config: &TrackerConfig) -> TransportConfig {
    let tls = match &config.tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    };
    TransportConfig {
        tls,
        timeout: config.timeout,
    }
}
