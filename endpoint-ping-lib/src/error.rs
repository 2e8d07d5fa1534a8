//! Error handling for endpoint checking runs.
//!
//! `PingError` covers the failures that stop a run: unreadable endpoint
//! lists, unwritable reports, bad configuration and HTTP client setup.
//! Transport failures of individual endpoints are not errors at this level;
//! they are recorded as [`FailureKind`] values inside an outcome.

use std::fmt;

/// Main error type for setup and output failures.
#[derive(Debug, Clone)]
pub enum PingError {
    /// The endpoint list could not be opened or read
    FileError { path: String, message: String },

    /// The report could not be created, written or synced
    OutputError { path: String, message: String },

    /// Configuration errors (invalid settings, unparsable files)
    ConfigError { message: String },

    /// The shared HTTP client could not be built
    ClientError { message: String },
}

impl PingError {
    /// Create a new endpoint list file error.
    pub fn file_error<P: Into<String>, M: Into<String>>(path: P, message: M) -> Self {
        Self::FileError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new report output error.
    pub fn output_error<P: Into<String>, M: Into<String>>(path: P, message: M) -> Self {
        Self::OutputError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new configuration error.
    pub fn config<M: Into<String>>(message: M) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create a new HTTP client construction error.
    pub fn client<M: Into<String>>(message: M) -> Self {
        Self::ClientError {
            message: message.into(),
        }
    }
}

impl fmt::Display for PingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileError { path, message } => {
                write!(f, "Endpoint list error at '{}': {}", path, message)
            }
            Self::OutputError { path, message } => {
                write!(f, "Report error at '{}': {}", path, message)
            }
            Self::ConfigError { message } => {
                write!(f, "Configuration error: {}", message)
            }
            Self::ClientError { message } => {
                write!(f, "HTTP client error: {}", message)
            }
        }
    }
}

impl std::error::Error for PingError {}

impl From<toml::de::Error> for PingError {
    fn from(err: toml::de::Error) -> Self {
        Self::ConfigError {
            message: format!("Failed to parse TOML configuration: {}", err),
        }
    }
}

/// Why a single endpoint produced no HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureKind {
    /// The request did not finish within the client timeout
    Timeout,
    /// DNS resolution or TCP/TLS connect failed
    Connect,
    /// The endpoint string could not be turned into a request
    InvalidUrl,
    /// Any other transport failure while sending or reading headers
    Request,
    /// The probe task panicked before recording a result
    Panicked,
}

impl FailureKind {
    /// Short lowercase label used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::Connect => "connect",
            Self::InvalidUrl => "invalid-url",
            Self::Request => "request",
            Self::Panicked => "panicked",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&reqwest::Error> for FailureKind {
    fn from(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_builder() {
            Self::InvalidUrl
        } else if err.is_connect() {
            Self::Connect
        } else {
            Self::Request
        }
    }
}
