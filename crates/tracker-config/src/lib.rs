//! Configuration for the issue tracker client.
//!
//! TOML profiles merged with `TRACKER_*` environment variables, and
//! translation to `tracker_core::TrackerConfig`. The CLI layers its
//! flag overrides on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use tracker_core::{DEFAULT_API_URL, DEFAULT_PAGE_SIZE, TlsVerification, TrackerConfig};

/// Prefix for environment overrides, e.g. `TRACKER_DEFAULTS__PAGE_SIZE=25`.
pub const ENV_PREFIX: &str = "TRACKER_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found in config")]
    UnknownProfile { name: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level `config.toml`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when `--profile` is not given.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named API endpoints.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
            page_size: default_page_size(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

/// A named issue tracker endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    /// API base URL (e.g., "http://localhost:8000").
    pub api_url: String,

    /// Path to a custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Accept invalid TLS certificates.
    pub insecure: Option<bool>,

    /// Override the default timeout (seconds).
    pub timeout: Option<u64>,

    /// Override the default page size.
    pub page_size: Option<u32>,
}

impl Profile {
    pub fn for_url(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            ca_cert: None,
            insecure: None,
            timeout: None,
            page_size: None,
        }
    }
}

impl Config {
    /// Look up a profile by name, falling back to `default_profile`.
    pub fn profile(&self, name: Option<&str>) -> Result<(&str, &Profile), ConfigError> {
        let name = name
            .or(self.default_profile.as_deref())
            .unwrap_or("default");
        self.profiles
            .get_key_value(name)
            .map(|(k, v)| (k.as_str(), v))
            .ok_or_else(|| ConfigError::UnknownProfile { name: name.into() })
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("dev", "tracker", "tracker").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("tracker");
    p
}

// ── Config loading ──────────────────────────────────────────────────

fn figment_for(path: &Path) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
}

/// Load the full config from the canonical file plus environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config from `path` plus environment. A missing file is not an error.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    Ok(figment_for(path).extract()?)
}

/// Load config, returning a default if the file is missing or unreadable.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to the canonical path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Translation ─────────────────────────────────────────────────────

/// Build a `TrackerConfig` from a profile, with `defaults` filling gaps.
pub fn profile_to_tracker_config(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<TrackerConfig, ConfigError> {
    let api_url = parse_api_url(&profile.api_url)?;

    let tls = if profile.insecure.unwrap_or(false) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    let page_size = profile.page_size.unwrap_or(defaults.page_size);
    if page_size == 0 {
        return Err(ConfigError::Validation {
            field: "page_size".into(),
            reason: "must be at least 1".into(),
        });
    }

    Ok(TrackerConfig {
        api_url,
        tls,
        timeout: Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout)),
        page_size,
    })
}

/// Parse and check an API base URL.
pub fn parse_api_url(raw: &str) -> Result<url::Url, ConfigError> {
    let url: url::Url = raw.parse().map_err(|_| ConfigError::Validation {
        field: "api_url".into(),
        reason: format!("invalid URL: {raw}"),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Validation {
            field: "api_url".into(),
            reason: format!("expected http or https, got '{}'", url.scheme()),
        });
    }
    Ok(url)
}

/// Profile used when no config file names one.
pub fn fallback_profile() -> Profile {
    Profile::for_url(DEFAULT_API_URL)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"
default_profile = "staging"

[defaults]
output = "json"
page_size = 20

[profiles.staging]
api_url = "https://tracker.example.com/api"
timeout = 5

[profiles.local]
api_url = "http://localhost:8000"
insecure = true
page_size = 50
"#;

    fn parse(toml_src: &str) -> Config {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::string(toml_src))
            .extract()
            .unwrap()
    }

    #[test]
    fn defaults_fill_missing_sections() {
        let cfg = parse("");
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.defaults.page_size, 10);
        assert_eq!(cfg.defaults.output, "table");
    }

    #[test]
    fn profile_lookup_uses_default_profile() {
        let cfg = parse(SAMPLE);
        let (name, profile) = cfg.profile(None).unwrap();
        assert_eq!(name, "staging");
        assert_eq!(profile.timeout, Some(5));

        let (name, _) = cfg.profile(Some("local")).unwrap();
        assert_eq!(name, "local");

        assert!(matches!(
            cfg.profile(Some("prod")),
            Err(ConfigError::UnknownProfile { .. })
        ));
    }

    #[test]
    fn profile_translates_with_defaults() {
        let cfg = parse(SAMPLE);
        let (_, staging) = cfg.profile(Some("staging")).unwrap();
        let tc = profile_to_tracker_config(staging, &cfg.defaults).unwrap();
        assert_eq!(tc.api_url.as_str(), "https://tracker.example.com/api");
        assert_eq!(tc.timeout, Duration::from_secs(5));
        assert_eq!(tc.page_size, 20);
        assert_eq!(tc.tls, TlsVerification::SystemDefaults);

        let (_, local) = cfg.profile(Some("local")).unwrap();
        let tc = profile_to_tracker_config(local, &cfg.defaults).unwrap();
        assert_eq!(tc.page_size, 50);
        assert_eq!(tc.timeout, Duration::from_secs(30));
        assert_eq!(tc.tls, TlsVerification::DangerAcceptInvalid);
    }

    #[test]
    fn bad_url_and_zero_page_size_are_rejected() {
        let defaults = Defaults::default();
        for raw in ["not a url", "ftp://host"] {
            let err = profile_to_tracker_config(&Profile::for_url(raw), &defaults).unwrap_err();
            assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "api_url"));
        }

        let mut profile = fallback_profile();
        profile.page_size = Some(0);
        assert!(matches!(
            profile_to_tracker_config(&profile, &defaults),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn save_then_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.profiles
            .insert("default".into(), Profile::for_url("http://127.0.0.1:9000"));
        save_config_to(&cfg, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.profiles["default"].api_url, "http://127.0.0.1:9000");
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.default_profile.as_deref(), Some("default"));
    }
}
