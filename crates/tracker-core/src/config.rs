// ── Runtime connection configuration ──
//
// Describes *where* the issue tracker lives and how to talk to it.
// Never touches disk: the CLI builds a `TrackerConfig` from its profile
// files and flags and hands it in.

use std::time::Duration;

use url::Url;

/// Base URL used when no profile or flag names one.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Rows per page used when no profile or flag names one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (self-signed development servers).
    DangerAcceptInvalid,
}

/// Configuration for one issue tracker endpoint.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// API base URL (e.g., `http://localhost:8000`).
    pub api_url: Url,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Request timeout.
    pub timeout: Duration,
    /// Rows requested per list page. Always at least 1.
    pub page_size: u32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL
                .parse()
                .expect("default API URL is a valid URL"),
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl TrackerConfig {
    /// Config pointing at `api_url` with every other field at its default.
    pub fn for_url(api_url: Url) -> Self {
        Self {
            api_url,
            ..Self::default()
        }
    }
}
