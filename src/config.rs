use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;

/// Application-level constants
pub const APP_NAME: &str = "Carequeue";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Backend used when `CAREQUEUE_API_URL` is unset.
pub const DEFAULT_API_URL: &str = "http://localhost:4000";

/// Per-request timeout used when `CAREQUEUE_TIMEOUT_SECS` is unset.
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

const ENV_API_URL: &str = "CAREQUEUE_API_URL";
const ENV_TOKEN_FILE: &str = "CAREQUEUE_TOKEN_FILE";
const ENV_TIMEOUT_SECS: &str = "CAREQUEUE_TIMEOUT_SECS";
const ENV_LOG: &str = "CAREQUEUE_LOG";

/// Log filter applied when `RUST_LOG` is not set.
pub fn default_log_filter() -> String {
    std::env::var(ENV_LOG).unwrap_or_else(|_| "carequeue=info".to_string())
}

/// Directory holding local client state (~/.carequeue).
pub fn app_data_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".carequeue"))
}

/// Default bearer token location, written by the login flow.
pub fn default_token_file() -> Option<PathBuf> {
    app_data_dir().map(|dir| dir.join("token"))
}

// ═══════════════════════════════════════════════════════════
// ClientConfig
// ═══════════════════════════════════════════════════════════

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("Invalid timeout '{0}': expected a positive number of seconds")]
    InvalidTimeout(String),
    #[error("Cannot determine home directory for the token file")]
    NoHomeDir,
}

/// Connection settings for the hospital REST backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientConfig {
    /// Base URL without trailing slash, e.g. `https://hms.example.org`.
    pub base_url: String,
    /// File the bearer token is re-read from on every request.
    pub token_file: PathBuf,
    pub request_timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: &str, token_file: PathBuf) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            token_file,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Build from `CAREQUEUE_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. `from_env` delegates here so
    /// parsing can be tested without touching the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup(ENV_API_URL).unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let token_file = match lookup(ENV_TOKEN_FILE) {
            Some(path) if !path.trim().is_empty() => PathBuf::from(path),
            _ => default_token_file().ok_or(ConfigError::NoHomeDir)?,
        };

        let request_timeout = match lookup(ENV_TIMEOUT_SECS) {
            Some(raw) => parse_timeout(&raw)?,
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self {
            base_url: normalize_base_url(&base_url)?,
            token_file,
            request_timeout,
        })
    }
}

fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let host = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"));
    match host {
        Some(host) if !host.is_empty() => Ok(trimmed.to_string()),
        _ => Err(ConfigError::InvalidBaseUrl(raw.to_string())),
    }
}

fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidTimeout(raw.to_string())),
    }
}

// ═══════════════════════════════════════════════════════════
// Page cadence
// ═══════════════════════════════════════════════════════════

/// The four queue pages that embed the polling pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageKind {
    PatientQueueList,
    PatientQueueDetail,
    ReceptionistDashboard,
    ReceptionistQueueDetail,
}

impl PageKind {
    /// Fixed background refresh cadence for the page.
    pub fn poll_interval(self) -> Duration {
        match self {
            Self::PatientQueueList => Duration::from_secs(30),
            Self::PatientQueueDetail => Duration::from_secs(20),
            Self::ReceptionistDashboard => Duration::from_secs(60),
            Self::ReceptionistQueueDetail => Duration::from_secs(30),
        }
    }
}

impl std::fmt::Display for PageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PatientQueueList => write!(f, "patient queue list"),
            Self::PatientQueueDetail => write!(f, "patient queue detail"),
            Self::ReceptionistDashboard => write!(f, "receptionist dashboard"),
            Self::ReceptionistQueueDetail => write!(f, "receptionist queue detail"),
        }
    }
}
