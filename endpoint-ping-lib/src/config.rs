//! Configuration file parsing and management.
//!
//! This module handles loading configuration from TOML files and the
//! `EP_*` environment variables, and merging them with proper precedence.

use crate::error::PingError;
use crate::types::{ReportFormat, MAX_CONCURRENCY};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// Configuration loaded from TOML files.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct FileConfig {
    /// Default values for CLI options
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,
}

/// Default configuration values that map to CLI options.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DefaultsConfig {
    /// Per-request timeout (as string, e.g., "5s", "30s", "2m")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,

    /// Cap on in-flight requests
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concurrency: Option<usize>,

    /// Report path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,

    /// Report format: text, json or csv
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    /// User-Agent header for probes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

/// Configuration discovery and loading functionality.
pub struct ConfigManager {
    /// Directory searched for local config files
    local_dir: PathBuf,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    /// Create a manager that looks for local files in the current directory.
    pub fn new() -> Self {
        Self {
            local_dir: PathBuf::from("."),
        }
    }

    /// Create a manager that looks for local files in `dir`.
    pub fn with_local_dir<P: Into<PathBuf>>(dir: P) -> Self {
        Self {
            local_dir: dir.into(),
        }
    }

    /// Load configuration from a specific file.
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<FileConfig, PingError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(PingError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            PingError::config(format!(
                "Failed to read configuration file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let config: FileConfig = toml::from_str(&content)?;
        validate_config(&config)?;

        debug!(path = %path.display(), "loaded configuration file");
        Ok(config)
    }

    /// Discover and load configuration files in precedence order.
    ///
    /// The XDG config is loaded first and a local file in the working
    /// directory overrides it field by field. Missing files are skipped;
    /// a file that exists but fails to parse is an error.
    pub fn discover_and_load(&self) -> Result<FileConfig, PingError> {
        let mut merged = FileConfig::default();

        if let Some(xdg_path) = get_xdg_config_path() {
            merged = merge_configs(merged, self.load_file(&xdg_path)?);
        }

        if let Some(local_path) = self.get_local_config_path() {
            merged = merge_configs(merged, self.load_file(&local_path)?);
        }

        Ok(merged)
    }

    fn get_local_config_path(&self) -> Option<PathBuf> {
        ["endpoint-ping.toml", ".endpoint-ping.toml"]
            .iter()
            .map(|candidate| self.local_dir.join(candidate))
            .find(|path| path.exists())
    }
}

fn get_xdg_config_path() -> Option<PathBuf> {
    let config_dir = env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| env::var_os("HOME").map(|home| Path::new(&home).join(".config")))?;

    let path = config_dir.join("endpoint-ping").join("config.toml");
    if path.exists() {
        Some(path)
    } else {
        None
    }
}

/// Merge two configurations. Values from `higher` take precedence.
pub fn merge_configs(lower: FileConfig, higher: FileConfig) -> FileConfig {
    FileConfig {
        defaults: match (lower.defaults, higher.defaults) {
            (Some(lower), Some(higher)) => Some(DefaultsConfig {
                timeout: higher.timeout.or(lower.timeout),
                concurrency: higher.concurrency.or(lower.concurrency),
                output: higher.output.or(lower.output),
                format: higher.format.or(lower.format),
                user_agent: higher.user_agent.or(lower.user_agent),
            }),
            (lower, higher) => higher.or(lower),
        },
    }
}

fn validate_config(config: &FileConfig) -> Result<(), PingError> {
    let Some(defaults) = &config.defaults else {
        return Ok(());
    };

    if let Some(timeout) = &defaults.timeout {
        parse_timeout(timeout)?;
    }

    if let Some(concurrency) = defaults.concurrency {
        if !(1..=MAX_CONCURRENCY).contains(&concurrency) {
            return Err(PingError::config(format!(
                "Concurrency must be between 1 and {}",
                MAX_CONCURRENCY
            )));
        }
    }

    if let Some(format) = &defaults.format {
        format.parse::<ReportFormat>()?;
    }

    if let Some(output) = &defaults.output {
        if output.trim().is_empty() {
            return Err(PingError::config("Output path cannot be empty"));
        }
    }

    Ok(())
}

/// Environment variable configuration that mirrors CLI options.
///
/// Values come from the `EP_*` variables. Invalid values are logged and
/// ignored rather than failing the run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvConfig {
    pub timeout: Option<Duration>,
    pub concurrency: Option<usize>,
    pub output: Option<String>,
    pub format: Option<ReportFormat>,
    pub config: Option<String>,
}

/// Load configuration from the process environment.
pub fn load_env_config() -> EnvConfig {
    env_config_from(|key| env::var(key).ok())
}

/// Build an [`EnvConfig`] from an arbitrary variable lookup.
pub fn env_config_from<F>(lookup: F) -> EnvConfig
where
    F: Fn(&str) -> Option<String>,
{
    let mut env_config = EnvConfig::default();

    if let Some(val) = lookup("EP_TIMEOUT") {
        match parse_timeout(&val) {
            Ok(timeout) => env_config.timeout = Some(timeout),
            Err(_) => warn!(value = %val, "ignoring invalid EP_TIMEOUT, use '5s', '30s', '2m'"),
        }
    }

    if let Some(val) = lookup("EP_CONCURRENCY") {
        match val.trim().parse::<usize>() {
            Ok(n) if (1..=MAX_CONCURRENCY).contains(&n) => env_config.concurrency = Some(n),
            _ => warn!(value = %val, "ignoring invalid EP_CONCURRENCY, must be a positive number"),
        }
    }

    if let Some(val) = lookup("EP_OUTPUT") {
        if !val.trim().is_empty() {
            env_config.output = Some(val);
        }
    }

    if let Some(val) = lookup("EP_FORMAT") {
        match val.parse::<ReportFormat>() {
            Ok(format) => env_config.format = Some(format),
            Err(_) => warn!(value = %val, "ignoring invalid EP_FORMAT, use text/json/csv"),
        }
    }

    if let Some(val) = lookup("EP_CONFIG") {
        if !val.trim().is_empty() {
            env_config.config = Some(val);
        }
    }

    env_config
}

/// Parse a timeout string like "5s", "30s", "2m", "1500ms" or bare seconds.
///
/// Zero durations are rejected.
pub fn parse_timeout(timeout_str: &str) -> Result<Duration, PingError> {
    let s = timeout_str.trim().to_lowercase();
    let invalid = || {
        PingError::config(format!(
            "Invalid timeout format '{}'. Use format like '5s', '30s', '2m'",
            timeout_str
        ))
    };

    let parsed = if let Some(ms) = s.strip_suffix("ms") {
        ms.trim().parse::<u64>().ok().map(Duration::from_millis)
    } else if let Some(secs) = s.strip_suffix('s') {
        secs.trim().parse::<u64>().ok().map(Duration::from_secs)
    } else if let Some(mins) = s.strip_suffix('m') {
        mins.trim()
            .parse::<u64>()
            .ok()
            .and_then(|m| m.checked_mul(60))
            .map(Duration::from_secs)
    } else {
        s.parse::<u64>().ok().map(Duration::from_secs)
    };
    let duration = parsed.ok_or_else(invalid)?;

    if duration.is_zero() {
        return Err(PingError::config("Timeout must be greater than zero"));
    }
    Ok(duration)
}
