// Async HTTP client for the issue tracker REST API.
//
// Endpoints: /issues, /issues/{id}, /health. JSON in both directions,
// no authentication.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::Error;
use crate::models::{DeleteAck, HealthStatus, Issue, IssueCreate, IssuePage, IssueUpdate};
use crate::query::ListIssuesParams;
use crate::transport::TransportConfig;

// ── Error response shape ─────────────────────────────────────────────

/// FastAPI-style error body: `{"detail": "Issue not found"}`.
#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the issue tracker API.
///
/// Every method is a single request: no retries, no caching. Failures come
/// back as [`Error`] values for the caller to surface.
#[derive(Debug, Clone)]
pub struct IssueClient {
    http: reqwest::Client,
    base_url: Url,
}

impl IssueClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client with its own `reqwest::Client` from a transport config.
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::from_reqwest(base_url, http)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    /// Ensure the base path ends with `/` so relative joins keep any prefix
    /// (`http://host/api` → `http://host/api/issues`).
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        url.set_query(None);
        Ok(url)
    }

    /// The normalized base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        Self::handle_response(resp).await
    }

    async fn get_with_params<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url} params={params:?}");

        let resp = self.http.get(url).query(params).send().await?;
        Self::handle_response(resp).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self.http.post(url).json(body).send().await?;
        Self::handle_response(resp).await
    }

    async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("PUT {url}");

        let resp = self.http.put(url).json(body).send().await?;
        Self::handle_response(resp).await
    }

    async fn delete<T: DeserializeOwned + Default>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("DELETE {url}");

        let resp = self.http.delete(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Self::parse_error(status, resp).await);
        }
        let body = resp.text().await?;
        if body.trim().is_empty() {
            return Ok(T::default());
        }
        decode(body)
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            decode(body)
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    async fn parse_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        let path = resp.url().path().to_owned();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Error::NotFound { path };
        }

        let raw = resp.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<ErrorResponse>(&raw)
            .ok()
            .and_then(|e| e.detail)
            .map(|d| match d {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            });

        Error::Api {
            status: status.as_u16(),
            message: detail.unwrap_or_else(|| {
                if raw.is_empty() {
                    status.to_string()
                } else {
                    raw
                }
            }),
        }
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// Liveness check.
    pub async fn health(&self) -> Result<HealthStatus, Error> {
        self.get("health").await
    }

    /// One page of issues matching `params`.
    pub async fn list_issues(&self, params: &ListIssuesParams) -> Result<IssuePage, Error> {
        self.get_with_params("issues", &params.to_query()).await
    }

    pub async fn get_issue(&self, id: u64) -> Result<Issue, Error> {
        self.get(&format!("issues/{id}")).await
    }

    pub async fn create_issue(&self, issue: &IssueCreate) -> Result<Issue, Error> {
        self.post("issues", issue).await
    }

    /// Send a partial update; only the fields set in `patch` go on the wire.
    pub async fn update_issue(&self, id: u64, patch: &IssueUpdate) -> Result<Issue, Error> {
        self.put(&format!("issues/{id}"), patch).await
    }

    pub async fn delete_issue(&self, id: u64) -> Result<DeleteAck, Error> {
        self.delete(&format!("issues/{id}")).await
    }
}

fn decode<T: DeserializeOwned>(body: String) -> Result<T, Error> {
    serde_json::from_str(&body).map_err(|e| {
        let preview: String = body.chars().take(200).collect();
        Error::Deserialization {
            message: format!("{e} (body preview: {preview:?})"),
            body: body.clone(),
        }
    })
}
