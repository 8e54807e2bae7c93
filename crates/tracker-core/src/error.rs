// ── Core error types ──
//
// User-facing errors from tracker-core. Consumers never match on HTTP
// status codes or JSON parse failures directly; the
// `From<tracker_api::Error>` impl translates transport-layer errors into
// domain variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Local validation ─────────────────────────────────────────────
    /// Rejected before any request was sent.
    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    // ── Transport errors ─────────────────────────────────────────────
    #[error("Cannot reach issue tracker at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    Timeout,

    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::ValidationFailed {
            message: message.into(),
        }
    }

    pub(crate) fn issue_not_found(id: u64) -> Self {
        Self::NotFound {
            entity_type: "issue".into(),
            identifier: id.to_string(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationFailed { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Network or HTTP failure other than "not found".
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed { .. } | Self::Timeout | Self::Api { .. } | Self::Internal(_)
        )
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<tracker_api::Error> for CoreError {
    fn from(err: tracker_api::Error) -> Self {
        match err {
            tracker_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            tracker_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            tracker_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            // Issue lookups name the issue themselves; any other 404 means the
            // endpoint is missing, usually a wrong base URL.
            tracker_api::Error::NotFound { path } => CoreError::Api {
                message: format!("endpoint not found: {path}"),
                status: Some(404),
            },
            tracker_api::Error::Api { status, message } => CoreError::Api {
                message,
                status: Some(status),
            },
            tracker_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}
