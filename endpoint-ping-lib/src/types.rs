//! Core data types for endpoint checking.
//!
//! This module defines the per-endpoint outcome, the fetcher configuration
//! and the report formats understood by the writer.

use crate::error::{FailureKind, PingError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default report path used when nothing else is configured.
pub const DEFAULT_OUTPUT: &str = "result.txt";

/// Largest accepted in-flight cap, the most permits a tokio semaphore holds.
pub const MAX_CONCURRENCY: usize = tokio::sync::Semaphore::MAX_PERMITS;

/// What happened when an endpoint was probed.
///
/// Inside an [`Outcome`] this serializes as a `"status"` or an `"error"` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// The server answered with this HTTP status code
    #[serde(rename = "status")]
    Code(u16),
    /// No HTTP response was obtained
    Error(FailureKind),
}

impl Status {
    /// The HTTP status code, if the endpoint answered at all.
    pub fn code(&self) -> Option<u16> {
        match self {
            Status::Code(code) => Some(*code),
            Status::Error(_) => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Status::Error(_))
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Code(code) => write!(f, "{}", code),
            Status::Error(kind) => write!(f, "ERROR({})", kind),
        }
    }
}

/// Result of probing a single endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    /// The endpoint string exactly as it was submitted
    pub url: String,

    /// Status code or failure marker
    #[serde(flatten)]
    pub status: Status,
}

impl Outcome {
    pub fn new<U: Into<String>>(url: U, status: Status) -> Self {
        Self {
            url: url.into(),
            status,
        }
    }

    pub fn code<U: Into<String>>(url: U, code: u16) -> Self {
        Self::new(url, Status::Code(code))
    }

    pub fn failed<U: Into<String>>(url: U, kind: FailureKind) -> Self {
        Self::new(url, Status::Error(kind))
    }
}

/// Configuration for a fetch run.
///
/// Defaults match the classic behaviour: 30 second timeout and one in-flight
/// request per endpoint with no cap.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchConfig {
    /// Timeout applied by the shared client to every request
    pub timeout: Duration,

    /// Optional cap on in-flight requests. `None` means unbounded.
    pub concurrency: Option<usize>,

    /// User-Agent header sent with every probe
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            concurrency: None,
            user_agent: format!("endpoint-ping/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl FetchConfig {
    /// Set a custom per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Cap in-flight requests, clamped to `1..=MAX_CONCURRENCY`.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = Some(concurrency.clamp(1, MAX_CONCURRENCY));
        self
    }

    pub fn with_user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Layout of the persisted report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// `<status-or-error>   -   <url>` per line
    #[default]
    Text,
    /// Pretty-printed JSON array
    Json,
    /// `status,url` with a header row
    Csv,
}

impl FromStr for ReportFormat {
    type Err = PingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" | "txt" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            "csv" => Ok(ReportFormat::Csv),
            other => Err(PingError::config(format!(
                "Unknown report format '{}'. Use text, json or csv",
                other
            ))),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportFormat::Text => write!(f, "text"),
            ReportFormat::Json => write!(f, "json"),
            ReportFormat::Csv => write!(f, "csv"),
        }
    }
}
